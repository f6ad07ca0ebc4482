use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};

use dhadkan_domain::entities::Category;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::common::{ApiResponse, PublicErrorResponse, ReceiptResponse};
use crate::entities::screening::PublicScreeningRequest;

/// Validate and store one screening of `category`
pub(crate) async fn submit_screening(
    state: &AppState,
    category: Category,
    request: PublicScreeningRequest,
    message: &str,
) -> Result<Response, ApiError> {
    let receipt = state.screenings.submit(category, request.into()).await?;

    info!("Stored {} screening {}", category.as_str(), receipt.id);
    Ok((StatusCode::CREATED, ApiResponse::new(receipt, message)).into_response())
}

/// Submit a child screening form
#[utoipa::path(
    post,
    path = "/api/add-child-report",
    request_body = PublicScreeningRequest,
    responses(
        (status = 201, description = "Screening stored", body = ReceiptResponse),
        (status = 400, description = "Body is not valid JSON", body = PublicErrorResponse),
        (status = 409, description = "Mobile number already registered", body = PublicErrorResponse),
        (status = 422, description = "Missing or invalid field, or unknown doctor", body = PublicErrorResponse),
        (status = 500, description = "Database or storage failure", body = PublicErrorResponse),
    ),
    tag = "screening"
)]
#[instrument(skip(state, payload))]
pub async fn add_child_report(
    State(state): State<AppState>,
    payload: Result<Json<PublicScreeningRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    submit_screening(
        &state,
        Category::Child,
        request,
        "Form submitted and saved to DB successfully",
    )
    .await
}

/// Submit a teacher or employee screening form
#[utoipa::path(
    post,
    path = "/api/add-teacher-emp-report",
    request_body = PublicScreeningRequest,
    responses(
        (status = 201, description = "Screening stored", body = ReceiptResponse),
        (status = 400, description = "Body is not valid JSON", body = PublicErrorResponse),
        (status = 409, description = "Mobile number already registered", body = PublicErrorResponse),
        (status = 422, description = "Missing or invalid field, unknown category or unknown doctor", body = PublicErrorResponse),
        (status = 500, description = "Database or storage failure", body = PublicErrorResponse),
    ),
    tag = "screening"
)]
#[instrument(skip(state, payload))]
pub async fn add_teacher_emp_report(
    State(state): State<AppState>,
    payload: Result<Json<PublicScreeningRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let category = Category::parse_staff(request.category.as_deref())
        .ok_or_else(|| ApiError::Unprocessable("Invalid category value".to_string()))?;
    let message = match category {
        Category::Employee => "Employee report added successfully",
        _ => "Teacher report added successfully",
    };

    submit_screening(&state, category, request, message).await
}
