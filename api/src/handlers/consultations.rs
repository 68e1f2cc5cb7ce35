//! Doctor handlers
//!
//! Picking up tested requests and recording the diagnosis.

use axum::{
    extract::State,
    Extension, Json,
};

use super::extract::{ApiJson, ApiPath};
use crate::auth::require_role;
use crate::domain::entities::{
    CreateConsultationRequest, RequestStatus, Role, TestRequest, TestRequestId, User,
};
use crate::domain::ports::Backend;
use crate::error::AppError;
use crate::AppState;

/// GET /api/consultations/in-queue
///
/// Requests with a completed lab test and no doctor yet.
pub async fn list_in_queue<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let requests = state
        .query_service
        .find_by(RequestStatus::LabTestCompleted)
        .await?;
    Ok(Json(requests))
}

/// GET /api/consultations
///
/// Requests whose consultation belongs to the caller.
pub async fn list_for_doctor<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let requests = state.query_service.find_by_doctor(&user).await?;
    Ok(Json(requests))
}

/// PUT /api/consultations/assign/:id
pub async fn assign_for_consultation<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let request = state
        .update_service
        .assign_for_consultation(TestRequestId(id), &user)
        .await?;
    Ok(Json(request))
}

/// PUT /api/consultations/update/:id
pub async fn update_consultation<B: Backend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(details): ApiJson<CreateConsultationRequest>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let request = state
        .update_service
        .update_consultation(TestRequestId(id), &details, &user)
        .await?;
    Ok(Json(request))
}
