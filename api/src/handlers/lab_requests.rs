//! Tester handlers
//!
//! Picking up INITIATED requests and recording lab results.

use axum::{
    extract::State,
    Extension, Json,
};

use super::extract::{ApiJson, ApiPath};
use crate::auth::require_role;
use crate::domain::entities::{
    CreateLabResult, RequestStatus, Role, TestRequest, TestRequestId, User,
};
use crate::domain::ports::Backend;
use crate::error::AppError;
use crate::AppState;

/// GET /api/labrequests/to-be-tested
///
/// Requests waiting for a tester.
pub async fn list_to_be_tested<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, &[Role::Tester])?;

    let requests = state.query_service.find_by(RequestStatus::Initiated).await?;
    Ok(Json(requests))
}

/// GET /api/labrequests
///
/// Requests whose lab result belongs to the caller.
pub async fn list_for_tester<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, &[Role::Tester])?;

    let requests = state.query_service.find_by_tester(&user).await?;
    Ok(Json(requests))
}

/// PUT /api/labrequests/assign/:id
pub async fn assign_for_lab_test<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, &[Role::Tester])?;

    let request = state
        .update_service
        .assign_for_lab_test(TestRequestId(id), &user)
        .await?;
    Ok(Json(request))
}

/// PUT /api/labrequests/update/:id
pub async fn update_lab_test<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(details): ApiJson<CreateLabResult>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, &[Role::Tester])?;

    let request = state
        .update_service
        .update_lab_test(TestRequestId(id), &details, &user)
        .await?;
    Ok(Json(request))
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::{CreateLabResult, TestStatus};

    #[test]
    fn parse_lab_result() {
        let json = r#"{
            "bloodPressure": "120/80",
            "heartBeat": "72",
            "temperature": "98.6",
            "oxygenLevel": "99",
            "comments": "Taken all relevant data",
            "result": "NEGATIVE"
        }"#;
        let details: CreateLabResult = serde_json::from_str(json).unwrap();
        assert_eq!(details.result, Some(TestStatus::Negative));
        assert_eq!(details.blood_pressure.as_deref(), Some("120/80"));
    }

    #[test]
    fn parse_lab_result_with_null_result() {
        let details: CreateLabResult = serde_json::from_str(r#"{"result": null}"#).unwrap();
        assert!(details.result.is_none());
    }
}
