use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::auth::PublicLoginRequest;
use crate::entities::common::{ApiResponse, LoginResponse, PublicErrorResponse};

/// Password login for doctors and administrators
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = PublicLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing field, unknown user type or malformed email", body = PublicErrorResponse),
        (status = 401, description = "Unknown user or wrong password", body = PublicErrorResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<PublicLoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let session = state.auth.login(request.into()).await?;

    info!("Login succeeded");
    Ok(ApiResponse::new(session, "Login successful").into_response())
}
