//! Patient-facing test request handlers

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};

use super::extract::{ApiJson, ApiPath};
use crate::auth::require_role;
use crate::domain::entities::{
    CreateTestRequest, Role, TestRequest, TestRequestFlow, TestRequestId, User,
};
use crate::domain::ports::Backend;
use crate::error::AppError;
use crate::AppState;

/// POST /api/testrequests
///
/// Raise a new test request for the caller.
pub async fn create_test_request<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<CreateTestRequest>,
) -> Result<(StatusCode, Json<TestRequest>), AppError> {
    require_role(&user, &[Role::User])?;

    let request = state
        .test_request_service
        .create_test_request(&user, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/testrequests
///
/// The caller's own requests.
pub async fn list_my_requests<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, &[Role::User])?;

    let requests = state.query_service.find_by_patient(&user).await?;
    Ok(Json(requests))
}

/// GET /api/testrequests/:id
pub async fn get_my_request<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, &[Role::User])?;

    let request = state
        .query_service
        .find_for_patient(TestRequestId(id), &user)
        .await?;
    Ok(Json(request))
}

/// GET /api/testrequests/:id/flow
///
/// Status history, oldest first.
pub async fn get_flow<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<TestRequestFlow>>, AppError> {
    let history = state.flow_service.history(TestRequestId(id), &user).await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::{CreateTestRequest, Gender};

    #[test]
    fn parse_create_test_request() {
        let json = r#"{
            "name": "Jane Patient",
            "gender": "FEMALE",
            "address": "12 Main Road",
            "age": 34,
            "email": "jane@example.com",
            "phoneNumber": "9876543210",
            "pinCode": 560001
        }"#;
        let payload: CreateTestRequest = serde_json::from_str(json).unwrap();
        assert_eq!(payload.gender, Some(Gender::Female));
        assert_eq!(payload.phone_number.as_deref(), Some("9876543210"));
        assert_eq!(payload.pin_code, Some(560001));
    }

    #[test]
    fn parse_create_test_request_partial() {
        // Missing fields are reported by validation, not by the JSON extractor
        let payload: CreateTestRequest = serde_json::from_str(r#"{"name": "Jane"}"#).unwrap();
        assert!(payload.email.is_none());
    }

    #[test]
    fn parse_create_test_request_bad_gender() {
        let result: Result<CreateTestRequest, _> =
            serde_json::from_str(r#"{"gender": "UNKNOWN"}"#);
        assert!(result.is_err());
    }
}
