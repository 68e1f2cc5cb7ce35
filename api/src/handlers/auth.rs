//! Registration handler
//!
//! Self-service account creation. The response carries the only copy of the
//! API key.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use super::extract::ApiJson;
use crate::domain::entities::Role;
use crate::domain::ports::Backend;
use crate::error::AppError;
use crate::AppState;

/// Request body for registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    /// Defaults to `USER` (patient)
    #[serde(default)]
    pub role: Option<Role>,
    /// Required for DOCTOR, TESTER and GOVERNMENT_AUTHORITY accounts
    #[serde(default)]
    pub registration_secret: Option<String>,
}

/// Response body for registration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// API key for all /api calls (Authorization: Bearer <api_key>)
    pub api_key: String,
    pub message: String,
}

/// POST /auth/register
pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let role = request.role.unwrap_or(Role::User);

    let (user, api_key) = state
        .user_service
        .register(
            &request.username,
            &request.email,
            role,
            request.registration_secret.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            role: user.role,
            message: format!(
                "Save this API key - it won't be shown again.\n\
                 Use it as: Authorization: Bearer {}",
                api_key
            ),
            api_key,
        }),
    ))
}
