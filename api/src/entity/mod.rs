//! SeaORM table models
//!
//! Row-level representations of the PostgreSQL schema in `migrations/`.
//! Conversion into domain entities happens in the postgres adapters.

pub mod consultations;
pub mod lab_results;
pub mod test_request_flows;
pub mod test_requests;
pub mod users;
