//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod test_request_flow_repo;
pub mod test_request_repo;
pub mod user_repo;


use sea_orm::{DbErr, SqlErr};

use crate::domain::ports::Backend;
use crate::error::DomainError;

pub use test_request_flow_repo::PostgresTestRequestFlowRepository;
pub use test_request_repo::PostgresTestRequestRepository;
pub use user_repo::PostgresUserRepository;

/// Production wiring: every repository backed by PostgreSQL
pub struct PostgresBackend;

impl Backend for PostgresBackend {
    type Users = PostgresUserRepository;
    type Requests = PostgresTestRequestRepository;
    type Flows = PostgresTestRequestFlowRepository;
}

/// Unique violations become `AlreadyExists`; everything else is a database error
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => DomainError::AlreadyExists(detail),
        _ => DomainError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_constraint_errors_are_database_errors() {
        let err = db_err(DbErr::RecordNotFound("test_requests".to_string()));
        assert!(matches!(err, DomainError::Database(_)));

        let err = db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, DomainError::Database(_)));
    }
}
