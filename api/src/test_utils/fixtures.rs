//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use uuid::Uuid;

use crate::app::hash_api_key;
use crate::domain::entities::{
    Consultation, CreateConsultationRequest, CreateLabResult, CreateTestRequest, DoctorSuggestion,
    Gender, LabResult, RequestStatus, Role, TestRequest, TestRequestId, TestStatus, User, UserId,
};

/// Create a test user with the given role and a unique username
pub fn test_user(role: Role) -> User {
    test_user_with_key(role).0
}

/// Create a test user together with the plain API key that authenticates it
pub fn test_user_with_key(role: Role) -> (User, String) {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_string();
    let username = format!("{}-{}", role.to_string().to_lowercase(), suffix);
    let api_key = format!("sk-test-{}", suffix);

    let user = User {
        id: UserId::new(),
        email: format!("{}@upstac.test", username),
        username,
        role,
        api_key_hash: hash_api_key(&api_key),
        created_at: Utc::now(),
        last_seen_at: None,
    };

    (user, api_key)
}

/// Create a request in `status` without any sub-records
pub fn test_request(id: i64, status: RequestStatus, patient: &User) -> TestRequest {
    TestRequest {
        id: TestRequestId(id),
        created_by: patient.id,
        name: "Jane Patient".to_string(),
        gender: Gender::Female,
        address: "12 Main Road, Bengaluru".to_string(),
        age: 34,
        email: format!("patient{}@example.com", id),
        phone_number: format!("98{:08}", id),
        pin_code: 560001,
        created: Utc::now(),
        status,
        lab_result: None,
        consultation: None,
    }
}

/// Create a request in `status` with the sub-records that stage implies.
///
/// From LAB_TEST_COMPLETED onwards the lab result is filled with NEGATIVE.
/// The consultation is attached only when a doctor is given.
pub fn test_request_assigned(
    id: i64,
    status: RequestStatus,
    patient: &User,
    tester: &User,
    doctor: Option<&User>,
) -> TestRequest {
    let mut request = test_request(id, status, patient);

    if status >= RequestStatus::LabTestInProgress {
        let mut lab_result = LabResult::assigned_to(tester.id);
        if status >= RequestStatus::LabTestCompleted {
            lab_result.record(&lab_result_request(TestStatus::Negative));
        }
        request.lab_result = Some(lab_result);
    }

    if let Some(doctor) = doctor {
        let mut consultation = Consultation::assigned_to(doctor.id);
        if status == RequestStatus::Completed {
            consultation.record(&consultation_request_for(&request));
        }
        request.consultation = Some(consultation);
    }

    request
}

/// Lab readings a tester submits
pub fn lab_result_request(result: TestStatus) -> CreateLabResult {
    CreateLabResult {
        blood_pressure: Some("170".to_string()),
        heart_beat: Some("90".to_string()),
        temperature: Some("100".to_string()),
        oxygen_level: Some("99".to_string()),
        comments: Some("Taken all relevant data".to_string()),
        result: Some(result),
    }
}

/// Consultation a doctor would give for the request's lab result
pub fn consultation_request_for(request: &TestRequest) -> CreateConsultationRequest {
    match request.lab_result.as_ref().and_then(|l| l.result) {
        Some(TestStatus::Positive) => CreateConsultationRequest {
            comments: Some("Take Rest".to_string()),
            suggestion: Some(DoctorSuggestion::HomeQuarantine),
        },
        _ => CreateConsultationRequest {
            comments: Some("Ok".to_string()),
            suggestion: Some(DoctorSuggestion::NoIssues),
        },
    }
}

/// A valid patient payload
pub fn create_test_request_payload() -> CreateTestRequest {
    CreateTestRequest {
        name: Some("New Patient".to_string()),
        gender: Some(Gender::Male),
        address: Some("221B Baker Street".to_string()),
        age: Some(41),
        email: Some("new.patient@example.com".to_string()),
        phone_number: Some("9123456789".to_string()),
        pin_code: Some(110001),
    }
}
