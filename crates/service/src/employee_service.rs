use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::employee::NewEmployee;
use models::{client, company, employee, office, package, validate, Role};
use crate::auth::password::hash_password;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::reassignment::{settle, DeletionReport, Reassignment};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    pub company_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub company_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
}

/// Fails with `Conflict` when any employee or client already uses `email`.
pub(crate) async fn ensure_email_free<C: ConnectionTrait>(db: &C, email: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
    let email = email.trim().to_lowercase();
    let staff = employee::Entity::find()
        .filter(employee::Column::Email.eq(email.clone()))
        .one(db)
        .await?;
    let customer = client::Entity::find()
        .filter(client::Column::Email.eq(email))
        .one(db)
        .await?;
    let taken = staff.map(|e| e.id).into_iter().chain(customer.map(|c| c.id)).any(|id| Some(id) != except);
    if taken {
        return Err(ServiceError::Conflict("email already registered".into()));
    }
    Ok(())
}

/// Resolve the `(company, office)` pair of an employee. An office implies
/// its company; a mismatching company is rejected.
async fn resolve_placement<C: ConnectionTrait>(
    db: &C,
    company_id: Option<Uuid>,
    office_id: Option<Uuid>,
) -> Result<(Option<Uuid>, Option<Uuid>), ServiceError> {
    if let Some(office_id) = office_id {
        let o = office::Entity::find_by_id(office_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::Validation("unknown office_id".into()))?;
        if company_id.is_some_and(|c| c != o.company_id) {
            return Err(ServiceError::Validation("office belongs to another company".into()));
        }
        return Ok((Some(o.company_id), Some(office_id)));
    }
    if let Some(company_id) = company_id {
        if company::Entity::find_by_id(company_id).one(db).await?.is_none() {
            return Err(ServiceError::Validation("unknown company_id".into()));
        }
    }
    Ok((company_id, None))
}

/// Create an employee; the password is bcrypt-hashed at `cost`.
#[instrument(skip(db, input), fields(email = %input.email, role = %input.role))]
pub async fn create_employee(db: &DatabaseConnection, input: CreateEmployee, cost: u32) -> Result<employee::Model, ServiceError> {
    validate::email(&input.email)?;
    ensure_email_free(db, &input.email, None).await?;
    let (company_id, office_id) = resolve_placement(db, input.company_id, input.office_id).await?;
    let password_hash = hash_password(&input.password, cost)?;
    let created = employee::create(
        db,
        NewEmployee {
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
            role: input.role,
            company_id,
            office_id,
        },
    )
    .await?;
    info!(employee_id = %created.id, "employee_created");
    Ok(created)
}

/// Create the first admin unless an account with `email` already exists.
pub async fn ensure_admin(db: &DatabaseConnection, name: &str, email: &str, password: &str, cost: u32) -> Result<employee::Model, ServiceError> {
    let email = email.trim().to_lowercase();
    if let Some(existing) = employee::Entity::find()
        .filter(employee::Column::Email.eq(email.clone()))
        .one(db)
        .await?
    {
        return Ok(existing);
    }
    create_employee(
        db,
        CreateEmployee {
            name: name.to_string(),
            email,
            phone: "-".into(),
            password: password.to_string(),
            role: Role::Admin,
            company_id: None,
            office_id: None,
        },
        cost,
    )
    .await
}

/// Get an employee by id.
pub async fn get_employee(db: &DatabaseConnection, id: Uuid) -> Result<Option<employee::Model>, ServiceError> {
    let found = employee::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

pub async fn list_employees(db: &DatabaseConnection, page: Pagination) -> Result<Vec<employee::Model>, ServiceError> {
    let rows = page
        .apply(employee::Entity::find().order_by_asc(employee::Column::Name))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn list_employees_by_company(db: &DatabaseConnection, company_id: Uuid, page: Pagination) -> Result<Vec<employee::Model>, ServiceError> {
    let rows = page
        .apply(
            employee::Entity::find()
                .filter(employee::Column::CompanyId.eq(company_id))
                .order_by_asc(employee::Column::Name),
        )
        .all(db)
        .await?;
    Ok(rows)
}

/// Employees whose name contains `name`.
pub async fn search_employees(db: &DatabaseConnection, name: &str, page: Pagination) -> Result<Vec<employee::Model>, ServiceError> {
    let rows = page
        .apply(
            employee::Entity::find()
                .filter(employee::Column::Name.contains(name.trim()))
                .order_by_asc(employee::Column::Name),
        )
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_employee(db: &DatabaseConnection, id: Uuid, input: UpdateEmployee, cost: u32) -> Result<employee::Model, ServiceError> {
    let current = employee::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("employee"))?;
    let (company_id, office_id) = match (input.company_id, input.office_id) {
        (None, None) => (current.company_id, current.office_id),
        (company, Some(office_id)) => resolve_placement(db, company, Some(office_id)).await?,
        // Changing company without naming an office leaves the employee unplaced.
        (Some(company), None) => {
            let keep = current.office_id.filter(|_| current.company_id == Some(company));
            resolve_placement(db, Some(company), keep).await?
        }
    };

    let mut am: employee::ActiveModel = current.into();
    if let Some(name) = input.name {
        validate::required("name", &name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(email) = input.email {
        validate::email(&email)?;
        ensure_email_free(db, &email, Some(id)).await?;
        am.email = Set(email.trim().to_lowercase());
    }
    if let Some(phone) = input.phone {
        validate::required("phone", &phone)?;
        am.phone = Set(phone.trim().to_string());
    }
    if let Some(password) = input.password {
        am.password_hash = Set(hash_password(&password, cost)?);
    }
    if let Some(role) = input.role {
        am.role = Set(role);
    }
    am.company_id = Set(company_id);
    am.office_id = Set(office_id);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(models::errors::ModelError::from)?;
    Ok(updated)
}

/// Delete a non-admin employee, first handing its packages to colleagues
/// with the same role in the same company. All or nothing.
#[instrument(skip(db))]
pub async fn delete_employee(db: &DatabaseConnection, id: Uuid) -> Result<DeletionReport, ServiceError> {
    let txn = db.begin().await?;
    let result = remove_employee(&txn, id).await;
    let report = settle(txn, result).await.inspect_err(|e| {
        warn!(employee_id = %id, error = %e, "employee_delete_rejected");
    })?;
    info!(employee_id = %id, reassigned = report.reassigned, "employee_deleted");
    Ok(report)
}

/// Employees interchangeable with `target`: same role, same company.
/// Employees without a company only pool with each other.
fn colleagues(target: &employee::Model) -> Condition {
    let company = match target.company_id {
        Some(company_id) => employee::Column::CompanyId.eq(company_id),
        None => employee::Column::CompanyId.is_null(),
    };
    Condition::all()
        .add(employee::Column::Role.eq(target.role))
        .add(company)
}

async fn remove_employee<C: ConnectionTrait>(txn: &C, id: Uuid) -> Result<DeletionReport, ServiceError> {
    let target = employee::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("employee"))?;

    const COURIER: (package::Column, &str) = (package::Column::CourierId, "packages.courier_id");
    const REGISTRAR: (package::Column, &str) = (package::Column::RegisteredById, "packages.registered_by_id");
    // The column matching the role goes first; the other is still cleared.
    let sets = match target.role {
        Role::Admin => return Err(ServiceError::ProtectedEntity(format!("admin {id}"))),
        Role::Courier => [COURIER, REGISTRAR],
        Role::Employee | Role::Client => [REGISTRAR, COURIER],
    };

    let candidates = colleagues(&target);
    let mut reassigned = 0;
    for (foreign_key, dependents) in sets {
        reassigned += Reassignment::<package::Entity, employee::Entity> {
            entity: "employee",
            dependents,
            dependent_id: package::Column::Id,
            foreign_key,
            target_id: employee::Column::Id,
            candidates: candidates.clone(),
        }
        .run(txn, id)
        .await?;
    }

    employee::Entity::delete_by_id(id).exec(txn).await?;
    Ok(DeletionReport { id, reassigned })
}
