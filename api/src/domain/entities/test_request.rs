//! Test request domain entity
//!
//! A patient's request for a COVID-19 test, tracked through the lab and
//! consultation stages until it is completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consultation::Consultation;
use super::lab_result::LabResult;
use super::user::UserId;

/// Unique identifier for a test request (database sequence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestRequestId(pub i64);

impl TestRequestId {
    /// Sequence ids start at 1; zero and negative ids can never exist
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for TestRequestId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TestRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow stage of a test request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Initiated,
    LabTestInProgress,
    LabTestCompleted,
    DiagnosisInProcess,
    Completed,
}

impl RequestStatus {
    /// Successor on the workflow path, `None` once completed
    pub fn next(&self) -> Option<RequestStatus> {
        match self {
            RequestStatus::Initiated => Some(RequestStatus::LabTestInProgress),
            RequestStatus::LabTestInProgress => Some(RequestStatus::LabTestCompleted),
            RequestStatus::LabTestCompleted => Some(RequestStatus::DiagnosisInProcess),
            RequestStatus::DiagnosisInProcess => Some(RequestStatus::Completed),
            RequestStatus::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Initiated => write!(f, "INITIATED"),
            RequestStatus::LabTestInProgress => write!(f, "LAB_TEST_IN_PROGRESS"),
            RequestStatus::LabTestCompleted => write!(f, "LAB_TEST_COMPLETED"),
            RequestStatus::DiagnosisInProcess => write!(f, "DIAGNOSIS_IN_PROCESS"),
            RequestStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INITIATED" => Ok(RequestStatus::Initiated),
            "LAB_TEST_IN_PROGRESS" => Ok(RequestStatus::LabTestInProgress),
            "LAB_TEST_COMPLETED" => Ok(RequestStatus::LabTestCompleted),
            "DIAGNOSIS_IN_PROCESS" => Ok(RequestStatus::DiagnosisInProcess),
            "COMPLETED" => Ok(RequestStatus::Completed),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
            Gender::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// A COVID-19 test request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    #[serde(rename = "requestId")]
    pub id: TestRequestId,
    /// Patient who raised the request
    pub created_by: UserId,
    pub name: String,
    pub gender: Gender,
    pub address: String,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub pin_code: i32,
    pub created: DateTime<Utc>,
    pub status: RequestStatus,
    pub lab_result: Option<LabResult>,
    pub consultation: Option<Consultation>,
}

impl TestRequest {
    /// Tester who took the request for the lab stage, if any
    pub fn tester(&self) -> Option<UserId> {
        self.lab_result.as_ref().map(|l| l.tester_id)
    }

    /// Doctor who took the request for consultation, if any
    pub fn doctor(&self) -> Option<UserId> {
        self.consultation.as_ref().map(|c| c.doctor_id)
    }

    pub fn is_owned_by(&self, patient: &UserId) -> bool {
        &self.created_by == patient
    }
}

/// Payload a patient submits to raise a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRequest {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub pin_code: Option<i32>,
}

/// Validated data needed to insert a new test request
#[derive(Debug, Clone)]
pub struct NewTestRequest {
    pub created_by: UserId,
    pub name: String,
    pub gender: Gender,
    pub address: String,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub pin_code: i32,
}
