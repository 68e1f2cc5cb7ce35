//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod consultation;
pub mod lab_result;
pub mod test_request;
pub mod test_request_flow;
pub mod user;

pub use consultation::{Consultation, CreateConsultationRequest, DoctorSuggestion};
pub use lab_result::{CreateLabResult, LabResult, TestStatus};
pub use test_request::{
    CreateTestRequest, NewTestRequest, RequestStatus, TestRequest, TestRequestId,
};
#[cfg(test)]
pub use test_request::Gender;
pub use test_request_flow::{NewTestRequestFlow, TestRequestFlow};
pub use user::{NewUser, Role, User, UserId};
