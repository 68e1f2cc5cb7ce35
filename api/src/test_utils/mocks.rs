//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    NewTestRequest, NewTestRequestFlow, NewUser, RequestStatus, TestRequest, TestRequestFlow,
    TestRequestId, User, UserId,
};
use crate::domain::ports::{
    Backend, TestRequestFlowRepository, TestRequestRepository, UserRepository,
};
use crate::error::DomainError;

/// Backend wiring the in-memory repositories, for router tests
pub struct InMemoryBackend;

impl Backend for InMemoryBackend {
    type Users = InMemoryUserRepository;
    type Requests = InMemoryTestRequestRepository;
    type Flows = InMemoryTestRequestFlowRepository;
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.api_key_hash == hash).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let user = User {
            id: UserId::new(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            role: new_user.role,
            api_key_hash: new_user.api_key_hash.clone(),
            created_at: Utc::now(),
            last_seen_at: None,
        };

        self.users.write().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_last_seen(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        if let Some(user) = users.get_mut(id) {
            user.last_seen_at = Some(Utc::now());
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("user {} does not exist", id)))
        }
    }
}

// ============================================================================
// In-Memory Test Request Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTestRequestRepository {
    requests: Arc<RwLock<BTreeMap<TestRequestId, TestRequest>>>,
    last_id: Arc<RwLock<i64>>,
}

impl InMemoryTestRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a request for testing
    pub fn with_request(self, request: TestRequest) -> Self {
        {
            let mut last_id = self.last_id.write().unwrap();
            *last_id = (*last_id).max(request.id.0);
            self.requests.write().unwrap().insert(request.id, request);
        }
        self
    }

    pub fn get(&self, id: TestRequestId) -> Option<TestRequest> {
        self.requests.read().unwrap().get(&id).cloned()
    }

    /// Change a stored status behind the services' back (simulates a concurrent writer)
    pub fn set_status(&self, id: TestRequestId, status: RequestStatus) {
        if let Some(request) = self.requests.write().unwrap().get_mut(&id) {
            request.status = status;
        }
    }

    fn filter(&self, predicate: impl Fn(&TestRequest) -> bool) -> Vec<TestRequest> {
        self.requests
            .read()
            .unwrap()
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TestRequestRepository for InMemoryTestRequestRepository {
    async fn find_by_id(&self, id: &TestRequestId) -> Result<Option<TestRequest>, DomainError> {
        Ok(self.get(*id))
    }

    async fn find_by_status(&self, status: RequestStatus) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filter(|r| r.status == status))
    }

    async fn find_by_patient(&self, patient: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        // Newest first, like the PostgreSQL adapter
        let mut requests = self.filter(|r| r.created_by == *patient);
        requests.reverse();
        Ok(requests)
    }

    async fn find_by_tester(&self, tester: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filter(|r| r.tester() == Some(*tester)))
    }

    async fn find_by_doctor(&self, doctor: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filter(|r| r.doctor() == Some(*doctor)))
    }

    async fn find_open_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filter(|r| {
            r.status != RequestStatus::Completed
                && (r.email == email || r.phone_number == phone_number)
        }))
    }

    async fn create(&self, new_request: &NewTestRequest) -> Result<TestRequest, DomainError> {
        let id = {
            let mut last_id = self.last_id.write().unwrap();
            *last_id += 1;
            TestRequestId(*last_id)
        };

        let request = TestRequest {
            id,
            created_by: new_request.created_by,
            name: new_request.name.clone(),
            gender: new_request.gender,
            address: new_request.address.clone(),
            age: new_request.age,
            email: new_request.email.clone(),
            phone_number: new_request.phone_number.clone(),
            pin_code: new_request.pin_code,
            created: Utc::now(),
            status: RequestStatus::Initiated,
            lab_result: None,
            consultation: None,
        };

        self.requests.write().unwrap().insert(id, request.clone());
        Ok(request)
    }

    async fn save_transition(
        &self,
        request: &TestRequest,
        expected: RequestStatus,
    ) -> Result<TestRequest, DomainError> {
        let mut requests = self.requests.write().unwrap();
        let stored = requests.get_mut(&request.id).ok_or_else(|| {
            DomainError::NotFound(format!("test request {} does not exist", request.id))
        })?;

        if stored.status != expected {
            return Err(DomainError::InvalidStateTransition(format!(
                "test request {} is {}, expected {}",
                request.id, stored.status, expected
            )));
        }

        *stored = request.clone();
        Ok(stored.clone())
    }
}

// ============================================================================
// In-Memory Test Request Flow Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTestRequestFlowRepository {
    flows: Arc<RwLock<Vec<TestRequestFlow>>>,
}

impl InMemoryTestRequestFlowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded entry, in insertion order
    pub fn all(&self) -> Vec<TestRequestFlow> {
        self.flows.read().unwrap().clone()
    }
}

#[async_trait]
impl TestRequestFlowRepository for InMemoryTestRequestFlowRepository {
    async fn record(&self, flow: &NewTestRequestFlow) -> Result<TestRequestFlow, DomainError> {
        let mut flows = self.flows.write().unwrap();
        let entry = TestRequestFlow {
            id: flows.len() as i64 + 1,
            request_id: flow.request_id,
            from_status: flow.from_status,
            to_status: flow.to_status,
            changed_by: flow.changed_by,
            happened_on: Utc::now(),
        };
        flows.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_request(
        &self,
        request_id: &TestRequestId,
    ) -> Result<Vec<TestRequestFlow>, DomainError> {
        Ok(self
            .flows
            .read()
            .unwrap()
            .iter()
            .filter(|f| f.request_id == *request_id)
            .cloned()
            .collect())
    }
}
