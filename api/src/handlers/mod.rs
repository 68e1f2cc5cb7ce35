//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod auth;
pub mod consultations;
mod extract;
pub mod lab_requests;
pub mod test_requests;

pub use auth::register;
pub use consultations::{
    assign_for_consultation, list_for_doctor, list_in_queue, update_consultation,
};
pub use lab_requests::{assign_for_lab_test, list_for_tester, list_to_be_tested, update_lab_test};
pub use test_requests::{create_test_request, get_flow, get_my_request, list_my_requests};
