use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{company, employee, office, package, validate};
use crate::{errors::ServiceError, pagination::Pagination};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub revenue: Option<f64>,
}

/// Inclusive date range, `YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct RevenuePeriod {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRevenue {
    pub company_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub packages: u64,
    pub revenue: f64,
}

/// Create a new company.
pub async fn create_company(db: &DatabaseConnection, input: CreateCompany) -> Result<company::Model, ServiceError> {
    let created = company::create(db, &input.name, input.revenue).await?;
    info!(company_id = %created.id, "company_created");
    Ok(created)
}

/// Get a company by id.
pub async fn get_company(db: &DatabaseConnection, id: Uuid) -> Result<Option<company::Model>, ServiceError> {
    let found = company::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

pub async fn list_companies(db: &DatabaseConnection, page: Pagination) -> Result<Vec<company::Model>, ServiceError> {
    let rows = page
        .apply(company::Entity::find().order_by_asc(company::Column::Name))
        .all(db)
        .await?;
    Ok(rows)
}

/// Companies whose name contains `name`.
pub async fn search_companies(db: &DatabaseConnection, name: &str, page: Pagination) -> Result<Vec<company::Model>, ServiceError> {
    let rows = page
        .apply(
            company::Entity::find()
                .filter(company::Column::Name.contains(name.trim()))
                .order_by_asc(company::Column::Name),
        )
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_company(db: &DatabaseConnection, id: Uuid, input: UpdateCompany) -> Result<company::Model, ServiceError> {
    let mut am: company::ActiveModel = company::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("company"))?
        .into();
    if let Some(name) = input.name {
        validate::required("name", &name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(revenue) = input.revenue {
        validate::non_negative("revenue", revenue)?;
        am.revenue = Set(revenue);
    }
    let updated = am.update(db).await.map_err(models::errors::ModelError::from)?;
    Ok(updated)
}

/// Delete a company that no longer owns offices or employees.
#[instrument(skip(db))]
pub async fn delete_company(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if get_company(db, id).await?.is_none() {
        return Err(ServiceError::not_found("company"));
    }
    let offices = office::Entity::find().filter(office::Column::CompanyId.eq(id)).count(db).await?;
    let staff = employee::Entity::find().filter(employee::Column::CompanyId.eq(id)).count(db).await?;
    if offices > 0 || staff > 0 {
        return Err(ServiceError::Conflict(format!(
            "company still has {offices} offices and {staff} employees"
        )));
    }
    company::Entity::delete_by_id(id).exec(db).await?;
    info!(company_id = %id, "company_deleted");
    Ok(())
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::Validation(format!("{field} must be YYYY-MM-DD")))
}

/// Sum of prices of packages accepted at the company's offices and created
/// within the period. Both ends are inclusive.
pub async fn revenue_for_period(
    db: &DatabaseConnection,
    id: Uuid,
    period: RevenuePeriod,
) -> Result<CompanyRevenue, ServiceError> {
    let start_date = parse_date("start_date", &period.start_date)?;
    let end_date = parse_date("end_date", &period.end_date)?;
    if end_date < start_date {
        return Err(ServiceError::Validation("end_date is before start_date".into()));
    }
    if get_company(db, id).await?.is_none() {
        return Err(ServiceError::not_found("company"));
    }

    let offices: Vec<Uuid> = office::Entity::find()
        .select_only()
        .column(office::Column::Id)
        .filter(office::Column::CompanyId.eq(id))
        .into_tuple()
        .all(db)
        .await?;

    let mut result = CompanyRevenue { company_id: id, start_date, end_date, packages: 0, revenue: 0.0 };
    if offices.is_empty() {
        return Ok(result);
    }

    let from = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
    let until = Utc.from_utc_datetime(&(end_date + Duration::days(1)).and_time(NaiveTime::MIN));
    let prices: Vec<f64> = package::Entity::find()
        .select_only()
        .column(package::Column::Price)
        .filter(package::Column::OfficeAcceptedAtId.is_in(offices))
        .filter(package::Column::CreatedAt.gte(from.fixed_offset()))
        .filter(package::Column::CreatedAt.lt(until.fixed_offset()))
        .into_tuple()
        .all(db)
        .await?;
    result.packages = prices.len() as u64;
    result.revenue = (prices.iter().sum::<f64>() * 100.0).round() / 100.0;
    Ok(result)
}
