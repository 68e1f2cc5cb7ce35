//! Test request query service
//!
//! Read-only access to test requests by id, status or owner.

use std::sync::Arc;

use crate::domain::entities::{RequestStatus, TestRequest, TestRequestId, User};
use crate::domain::ports::TestRequestRepository;
use crate::error::{AppError, DomainError};

pub struct TestRequestQueryService<TR>
where
    TR: TestRequestRepository,
{
    requests: Arc<TR>,
}

impl<TR> TestRequestQueryService<TR>
where
    TR: TestRequestRepository,
{
    pub fn new(requests: Arc<TR>) -> Self {
        Self { requests }
    }

    /// Load a request, failing with `NotFound` ("Invalid ID") for unknown or
    /// non-positive ids
    pub async fn find_by_id(&self, id: TestRequestId) -> Result<TestRequest, AppError> {
        Ok(load_request(self.requests.as_ref(), id).await?)
    }

    /// Requests currently in `status`
    pub async fn find_by(&self, status: RequestStatus) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_status(status).await?)
    }

    /// Requests whose consultation belongs to `doctor`
    pub async fn find_by_doctor(&self, doctor: &User) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_doctor(&doctor.id).await?)
    }

    /// Requests whose lab result belongs to `tester`
    pub async fn find_by_tester(&self, tester: &User) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_tester(&tester.id).await?)
    }

    /// Requests raised by `patient`
    pub async fn find_by_patient(&self, patient: &User) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_patient(&patient.id).await?)
    }

    /// One of `patient`'s own requests. Other patients' ids look unknown.
    pub async fn find_for_patient(
        &self,
        id: TestRequestId,
        patient: &User,
    ) -> Result<TestRequest, AppError> {
        let request = self.find_by_id(id).await?;
        if !request.is_owned_by(&patient.id) {
            return Err(not_found(id).into());
        }
        Ok(request)
    }
}

pub(crate) fn not_found(id: TestRequestId) -> DomainError {
    DomainError::NotFound(format!("test request {} does not exist", id))
}

/// Shared lookup used by every service touching a single request
pub(crate) async fn load_request<TR>(
    requests: &TR,
    id: TestRequestId,
) -> Result<TestRequest, DomainError>
where
    TR: TestRequestRepository + ?Sized,
{
    if !id.is_valid() {
        return Err(not_found(id));
    }

    requests.find_by_id(&id).await?.ok_or_else(|| not_found(id))
}
