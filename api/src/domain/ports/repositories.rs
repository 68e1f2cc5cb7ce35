//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    NewTestRequest, NewTestRequestFlow, NewUser, RequestStatus, TestRequest, TestRequestFlow,
    TestRequestId, User, UserId,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Update the last seen timestamp
    async fn update_last_seen(&self, id: &UserId) -> Result<(), DomainError>;
}

/// Repository for TestRequest aggregates (request + lab result + consultation)
#[async_trait]
pub trait TestRequestRepository: Send + Sync {
    /// Find a request by ID
    async fn find_by_id(&self, id: &TestRequestId) -> Result<Option<TestRequest>, DomainError>;

    /// Find all requests currently in `status`
    async fn find_by_status(&self, status: RequestStatus) -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests raised by a patient
    async fn find_by_patient(&self, patient: &UserId) -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests whose lab result belongs to a tester
    async fn find_by_tester(&self, tester: &UserId) -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests whose consultation belongs to a doctor
    async fn find_by_doctor(&self, doctor: &UserId) -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests that are not completed yet and share the email or phone number
    async fn find_open_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Vec<TestRequest>, DomainError>;

    /// Create a new request in INITIATED status
    async fn create(&self, request: &NewTestRequest) -> Result<TestRequest, DomainError>;

    /// Persist a transitioned request (status, lab result, consultation).
    ///
    /// The write only applies if the stored status is still `expected`;
    /// otherwise `InvalidStateTransition` is returned and nothing changes.
    async fn save_transition(
        &self,
        request: &TestRequest,
        expected: RequestStatus,
    ) -> Result<TestRequest, DomainError>;
}

/// Repository for the status change audit trail
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestRequestFlowRepository: Send + Sync {
    /// Record a status change
    async fn record(&self, flow: &NewTestRequestFlow) -> Result<TestRequestFlow, DomainError>;

    /// All status changes of a request, oldest first
    async fn find_by_request(
        &self,
        request_id: &TestRequestId,
    ) -> Result<Vec<TestRequestFlow>, DomainError>;
}
