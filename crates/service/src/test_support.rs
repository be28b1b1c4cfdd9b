#![cfg(test)]
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use models::employee::NewEmployee;
use models::package::NewPackage;
use models::{client, company, employee, office, package, Role};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Cheapest cost bcrypt accepts; keeps hashing out of test timings.
pub const TEST_COST: u32 = 4;

/// Fresh in-memory database with migrations applied. Each call is isolated.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn placeholder_hash() -> String {
    "$2b$04$7o5qf5aA2b4qmV0KcO7eUe3m4G3i7mQv0bV2wz8b9v2gq4bQ1mF1e".into()
}

pub async fn company(db: &DatabaseConnection, name: &str) -> anyhow::Result<company::Model> {
    Ok(company::create(db, name, 0.0).await?)
}

pub async fn office(db: &DatabaseConnection, company_id: Uuid, location: &str) -> anyhow::Result<office::Model> {
    Ok(office::create(db, company_id, location).await?)
}

pub async fn employee(
    db: &DatabaseConnection,
    role: Role,
    company_id: Option<Uuid>,
    office_id: Option<Uuid>,
) -> anyhow::Result<employee::Model> {
    let tag = Uuid::new_v4().simple().to_string();
    Ok(employee::create(
        db,
        NewEmployee {
            name: format!("{role} {}", &tag[..6]),
            email: format!("{role}-{tag}@example.com"),
            phone: "+359000000".into(),
            password_hash: placeholder_hash(),
            role,
            company_id,
            office_id,
        },
    )
    .await?)
}

pub async fn client(db: &DatabaseConnection, favorite_office_id: Option<Uuid>) -> anyhow::Result<client::Model> {
    let tag = Uuid::new_v4().simple().to_string();
    Ok(client::create(
        db,
        client::NewClient {
            name: format!("client {}", &tag[..6]),
            email: format!("client-{tag}@example.com"),
            phone: "+359111111".into(),
            password_hash: placeholder_hash(),
            favorite_office_id,
        },
    )
    .await?)
}

/// Office-to-office package between two fresh clients.
pub async fn package(
    db: &DatabaseConnection,
    accepted_at: Uuid,
    delivered_at: Uuid,
    courier_id: Option<Uuid>,
    registered_by_id: Option<Uuid>,
) -> anyhow::Result<package::Model> {
    let sender = client(db, None).await?;
    let receiver = client(db, None).await?;
    Ok(package::create(
        db,
        NewPackage {
            sender_id: sender.id,
            receiver_id: receiver.id,
            courier_id,
            registered_by_id,
            office_accepted_at_id: accepted_at,
            office_delivered_at_id: Some(delivered_at),
            is_delivered_to_office: true,
            delivery_location: None,
            weight: 1.5,
        },
    )
    .await?)
}
