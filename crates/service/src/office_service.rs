use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::{company, employee, office, package, validate};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::reassignment::{settle, DeletionReport, Reassignment};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOffice {
    pub company_id: Uuid,
    pub location: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOffice {
    pub location: Option<String>,
}

/// Create an office under an existing company.
pub async fn create_office(db: &DatabaseConnection, input: CreateOffice) -> Result<office::Model, ServiceError> {
    if company::Entity::find_by_id(input.company_id).one(db).await?.is_none() {
        return Err(ServiceError::Validation("unknown company_id".into()));
    }
    let created = office::create(db, input.company_id, &input.location).await?;
    info!(office_id = %created.id, company_id = %created.company_id, "office_created");
    Ok(created)
}

pub async fn get_office(db: &DatabaseConnection, id: Uuid) -> Result<Option<office::Model>, ServiceError> {
    let found = office::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

pub async fn list_offices(db: &DatabaseConnection, page: Pagination) -> Result<Vec<office::Model>, ServiceError> {
    let rows = page
        .apply(office::Entity::find().order_by_asc(office::Column::CreatedAt))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn list_offices_by_company(db: &DatabaseConnection, company_id: Uuid, page: Pagination) -> Result<Vec<office::Model>, ServiceError> {
    let rows = page
        .apply(
            office::Entity::find()
                .filter(office::Column::CompanyId.eq(company_id))
                .order_by_asc(office::Column::CreatedAt),
        )
        .all(db)
        .await?;
    Ok(rows)
}

/// Offices whose location contains `location`.
pub async fn search_offices_by_location(db: &DatabaseConnection, location: &str, page: Pagination) -> Result<Vec<office::Model>, ServiceError> {
    let rows = page
        .apply(
            office::Entity::find()
                .filter(office::Column::Location.contains(location.trim()))
                .order_by_asc(office::Column::Location),
        )
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_office(db: &DatabaseConnection, id: Uuid, input: UpdateOffice) -> Result<office::Model, ServiceError> {
    let mut am: office::ActiveModel = office::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("office"))?
        .into();
    if let Some(location) = input.location {
        validate::required("location", &location)?;
        am.location = Set(location.trim().to_string());
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete an office after moving its employees and packages to sibling
/// offices of the same company. All or nothing.
#[instrument(skip(db))]
pub async fn delete_office(db: &DatabaseConnection, id: Uuid) -> Result<DeletionReport, ServiceError> {
    let txn = db.begin().await?;
    let result = remove_office(&txn, id).await;
    let report = settle(txn, result).await.inspect_err(|e| {
        warn!(office_id = %id, error = %e, "office_delete_rejected");
    })?;
    info!(office_id = %id, reassigned = report.reassigned, "office_deleted");
    Ok(report)
}

async fn remove_office<C: ConnectionTrait>(txn: &C, id: Uuid) -> Result<DeletionReport, ServiceError> {
    let target = office::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("office"))?;
    let siblings = Condition::all().add(office::Column::CompanyId.eq(target.company_id));

    let mut reassigned = Reassignment::<employee::Entity, office::Entity> {
        entity: "office",
        dependents: "employees.office_id",
        dependent_id: employee::Column::Id,
        foreign_key: employee::Column::OfficeId,
        target_id: office::Column::Id,
        candidates: siblings.clone(),
    }
    .run(txn, id)
    .await?;

    for (foreign_key, dependents) in [
        (package::Column::OfficeAcceptedAtId, "packages.office_accepted_at_id"),
        (package::Column::OfficeDeliveredAtId, "packages.office_delivered_at_id"),
    ] {
        reassigned += Reassignment::<package::Entity, office::Entity> {
            entity: "office",
            dependents,
            dependent_id: package::Column::Id,
            foreign_key,
            target_id: office::Column::Id,
            candidates: siblings.clone(),
        }
        .run(txn, id)
        .await?;
    }

    office::Entity::delete_by_id(id).exec(txn).await?;
    Ok(DeletionReport { id, reassigned })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};
    use models::Role;

    #[tokio::test]
    async fn office_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::company(&db, "Acme").await?;

        let o = create_office(&db, CreateOffice { company_id: c.id, location: "Sofia, Center".into() }).await?;
        assert_eq!(get_office(&db, o.id).await?.unwrap().location, "Sofia, Center");

        let moved = update_office(&db, o.id, UpdateOffice { location: Some("Sofia, Lozenets".into()) }).await?;
        assert_eq!(moved.location, "Sofia, Lozenets");

        assert_eq!(search_offices_by_location(&db, "Lozenets", Pagination::default()).await?.len(), 1);
        assert_eq!(list_offices_by_company(&db, c.id, Pagination::default()).await?.len(), 1);

        let unknown = create_office(&db, CreateOffice { company_id: Uuid::new_v4(), location: "X".into() }).await;
        assert!(matches!(unknown, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_office_moves_employees_and_packages_to_siblings() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::company(&db, "Acme").await?;
        let doomed = test_support::office(&db, c.id, "Doomed").await?;
        let s1 = test_support::office(&db, c.id, "S1").await?;
        let s2 = test_support::office(&db, c.id, "S2").await?;
        let other = test_support::company(&db, "Other").await?;
        let foreign = test_support::office(&db, other.id, "Foreign").await?;

        let mut staff = Vec::new();
        for _ in 0..4 {
            staff.push(test_support::employee(&db, Role::Employee, Some(c.id), Some(doomed.id)).await?.id);
        }
        let p1 = test_support::package(&db, doomed.id, s1.id, None, None).await?;
        let p2 = test_support::package(&db, s2.id, doomed.id, None, None).await?;

        let report = delete_office(&db, doomed.id).await?;
        assert_eq!(report.reassigned, 6);
        assert!(get_office(&db, doomed.id).await?.is_none());

        let mut counts = std::collections::HashMap::new();
        for id in staff {
            let e = employee::Entity::find_by_id(id).one(&db).await?.unwrap();
            let office_id = e.office_id.expect("still placed");
            assert!(office_id == s1.id || office_id == s2.id);
            assert_ne!(office_id, foreign.id);
            *counts.entry(office_id).or_insert(0) += 1;
        }
        // 4 employees over 2 siblings: exactly 2 each.
        assert!(counts.values().all(|n| *n == 2));

        let p1 = package::Entity::find_by_id(p1.id).one(&db).await?.unwrap();
        assert!(p1.office_accepted_at_id == s1.id || p1.office_accepted_at_id == s2.id);
        let p2 = package::Entity::find_by_id(p2.id).one(&db).await?.unwrap();
        let delivered_at = p2.office_delivered_at_id.unwrap();
        assert!(delivered_at == s1.id || delivered_at == s2.id);
        Ok(())
    }

    #[tokio::test]
    async fn delete_last_office_with_employees_changes_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c2 = test_support::company(&db, "C2").await?;
        let only = test_support::office(&db, c2.id, "Only").await?;
        let e1 = test_support::employee(&db, Role::Employee, Some(c2.id), Some(only.id)).await?;
        let e2 = test_support::employee(&db, Role::Courier, Some(c2.id), Some(only.id)).await?;
        // An office of another company is never a candidate.
        let other = test_support::company(&db, "Elsewhere").await?;
        test_support::office(&db, other.id, "Elsewhere HQ").await?;

        let res = delete_office(&db, only.id).await;
        assert!(matches!(res, Err(ServiceError::NoReplacementAvailable { entity: "office", .. })));

        assert!(get_office(&db, only.id).await?.is_some());
        for e in [e1, e2] {
            let row = employee::Entity::find_by_id(e.id).one(&db).await?.unwrap();
            assert_eq!(row.office_id, Some(only.id));
        }
        Ok(())
    }

    #[tokio::test]
    async fn office_with_only_packages_and_no_sibling_is_kept() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::company(&db, "Parcels").await?;
        let only = test_support::office(&db, c.id, "Only").await?;
        let p = test_support::package(&db, only.id, only.id, None, None).await?;

        let res = delete_office(&db, only.id).await;
        assert!(matches!(
            res,
            Err(ServiceError::NoReplacementAvailable { entity: "office", dependents: "packages.office_accepted_at_id", .. })
        ));
        assert!(get_office(&db, only.id).await?.is_some());
        let after = package::Entity::find_by_id(p.id).one(&db).await?.unwrap();
        assert_eq!(after, p);
        Ok(())
    }

    #[tokio::test]
    async fn failed_office_delete_rolls_back_moved_staff() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::company(&db, "Pinned").await?;
        let doomed = test_support::office(&db, c.id, "Doomed").await?;
        let sibling = test_support::office(&db, c.id, "Sibling").await?;
        let e = test_support::employee(&db, Role::Employee, Some(c.id), Some(doomed.id)).await?;
        let p = test_support::package(&db, doomed.id, doomed.id, None, None).await?;
        db.execute_unprepared(
            "CREATE TRIGGER pin_office BEFORE DELETE ON office BEGIN SELECT RAISE(ABORT, 'office pinned'); END;",
        )
        .await?;

        let res = delete_office(&db, doomed.id).await;
        assert!(matches!(res, Err(ServiceError::Db(_))), "{res:?}");
        assert!(get_office(&db, doomed.id).await?.is_some());
        let row = employee::Entity::find_by_id(e.id).one(&db).await?.unwrap();
        assert_eq!(row.office_id, Some(doomed.id));
        let p = package::Entity::find_by_id(p.id).one(&db).await?.unwrap();
        assert_eq!(p.office_accepted_at_id, doomed.id);
        assert_eq!(p.office_delivered_at_id, Some(doomed.id));
        assert_ne!(p.office_accepted_at_id, sibling.id);
        Ok(())
    }

    #[tokio::test]
    async fn empty_office_deletes_without_candidates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::company(&db, "Lonely").await?;
        let o = test_support::office(&db, c.id, "Empty").await?;
        let report = delete_office(&db, o.id).await?;
        assert_eq!(report.reassigned, 0);
        assert!(matches!(delete_office(&db, o.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn single_sibling_takes_every_dependent() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::company(&db, "Pair").await?;
        let a = test_support::office(&db, c.id, "A").await?;
        let b = test_support::office(&db, c.id, "B").await?;
        let e = test_support::employee(&db, Role::Employee, Some(c.id), Some(a.id)).await?;
        let p = test_support::package(&db, a.id, a.id, None, None).await?;

        let report = delete_office(&db, a.id).await?;
        assert_eq!(report.reassigned, 3);
        let row = employee::Entity::find_by_id(e.id).one(&db).await?.unwrap();
        assert_eq!(row.office_id, Some(b.id));
        let p = package::Entity::find_by_id(p.id).one(&db).await?.unwrap();
        assert_eq!(p.office_accepted_at_id, b.id);
        assert_eq!(p.office_delivered_at_id, Some(b.id));
        Ok(())
    }
}
