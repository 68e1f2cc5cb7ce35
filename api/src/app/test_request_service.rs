//! Test request service
//!
//! Patient-facing creation of test requests.

use std::sync::Arc;

use crate::app::flow_service::record_flow;
use crate::app::validation::{
    required, required_text, validate_email, validate_phone_number, validate_pin_code,
};
use crate::domain::entities::{
    CreateTestRequest, NewTestRequest, RequestStatus, Role, TestRequest, User,
};
use crate::domain::ports::{TestRequestFlowRepository, TestRequestRepository};
use crate::error::{AppError, DomainError};

const MAX_NAME_LEN: usize = 100;
const MAX_AGE: i32 = 120;

pub struct TestRequestService<TR, FR>
where
    TR: TestRequestRepository,
    FR: TestRequestFlowRepository,
{
    requests: Arc<TR>,
    flows: Arc<FR>,
}

impl<TR, FR> TestRequestService<TR, FR>
where
    TR: TestRequestRepository,
    FR: TestRequestFlowRepository,
{
    pub fn new(requests: Arc<TR>, flows: Arc<FR>) -> Self {
        Self { requests, flows }
    }

    /// Raise a new request in INITIATED status.
    ///
    /// Rejected while another request with the same email or phone number is
    /// still open.
    pub async fn create_test_request(
        &self,
        patient: &User,
        payload: &CreateTestRequest,
    ) -> Result<TestRequest, AppError> {
        if !patient.has_role(Role::User) {
            return Err(AppError::Domain(DomainError::Forbidden(format!(
                "Role {} cannot raise test requests",
                patient.role
            ))));
        }

        let new_request = validate(patient, payload)?;

        let open = self
            .requests
            .find_open_by_email_or_phone(&new_request.email, &new_request.phone_number)
            .await?;
        if !open.is_empty() {
            return Err(AppError::Domain(DomainError::AlreadyExists(
                "A request with the same phone number or email is already in progress".to_string(),
            )));
        }

        let request = self.requests.create(&new_request).await?;
        tracing::info!(request_id = %request.id, user_id = %patient.id, "Test request created");

        record_flow(
            self.flows.as_ref(),
            request.id,
            RequestStatus::Initiated,
            RequestStatus::Initiated,
            patient.id,
        )
        .await;

        Ok(request)
    }
}

fn validate(patient: &User, payload: &CreateTestRequest) -> Result<NewTestRequest, DomainError> {
    let name = required_text(payload.name.as_deref(), "name")?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    let gender = required(payload.gender, "gender")?;
    let address = required_text(payload.address.as_deref(), "address")?;

    let age = required(payload.age, "age")?;
    if !(1..=MAX_AGE).contains(&age) {
        return Err(DomainError::Validation(format!(
            "age must be between 1 and {}",
            MAX_AGE
        )));
    }

    let email = required_text(payload.email.as_deref(), "email")?;
    validate_email(&email)?;

    let phone_number = required_text(payload.phone_number.as_deref(), "phoneNumber")?;
    validate_phone_number(&phone_number)?;

    let pin_code = required(payload.pin_code, "pinCode")?;
    validate_pin_code(pin_code)?;

    Ok(NewTestRequest {
        created_by: patient.id,
        name,
        gender,
        address,
        age,
        email,
        phone_number,
        pin_code,
    })
}
