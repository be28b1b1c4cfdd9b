//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Owns the reassignment performed before employee and office deletes.

pub mod errors;
pub mod pagination;
pub mod reassignment;
pub mod auth;
pub mod company_service;
pub mod office_service;
pub mod employee_service;
pub mod client_service;
pub mod package_service;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use pagination::Pagination;
pub use reassignment::DeletionReport;
