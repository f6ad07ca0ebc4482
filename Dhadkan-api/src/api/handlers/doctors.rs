use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use utoipa::IntoParams;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::common::{
    ApiResponse, DeletedDoctorResponse, DoctorResponse, PublicErrorResponse,
};
use crate::entities::doctor::{PublicDoctorRequest, PublicDoctorUpdateRequest};

/// Query parameters of the doctor management endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DoctorManagementQuery {
    /// GET: `stats`, `list`, `detail`, `search` or empty for the full listing.
    /// POST: `add`. PUT: `update`. DELETE: `delete`.
    pub action: Option<String>,

    /// Doctor id for `detail` and `delete`
    pub id: Option<i64>,

    /// Search term over name, hospital and email
    pub q: Option<String>,

    /// Exact hospital type for `search`
    pub hospital_type: Option<String>,
}

/// Read views of the doctor management endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagementView {
    All,
    Stats,
    List,
    Detail,
    Search,
}

impl ManagementView {
    /// Unknown actions fall back to the full listing
    fn parse(action: Option<&str>) -> Self {
        match action.map(str::trim) {
            Some("stats") => ManagementView::Stats,
            Some("list") => ManagementView::List,
            Some("detail") => ManagementView::Detail,
            Some("search") => ManagementView::Search,
            _ => ManagementView::All,
        }
    }
}

/// Reject any write action other than `expected`
fn expect_action(query: &DoctorManagementQuery, expected: &str, method: &str) -> Result<(), ApiError> {
    match query.action.as_deref().map(str::trim) {
        Some(action) if action == expected => Ok(()),
        _ => Err(ApiError::BadRequest(format!("Invalid {} action", method))),
    }
}

/// Blank query values count as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn register(state: &AppState, request: PublicDoctorRequest, message: &str) -> Result<Response, ApiError> {
    let registration = request.into_registration()?;
    let doctor = state.doctors.register(registration).await?;

    info!("Doctor {} registered", doctor.id);
    Ok((StatusCode::CREATED, ApiResponse::new(doctor, message)).into_response())
}

/// Register a new doctor
#[utoipa::path(
    post,
    path = "/api/add-doctor",
    request_body = PublicDoctorRequest,
    responses(
        (status = 201, description = "Doctor registered", body = DoctorResponse),
        (status = 400, description = "Missing or invalid field", body = PublicErrorResponse),
        (status = 409, description = "Email or phone number already registered", body = PublicErrorResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "doctors"
)]
#[instrument(skip(state, payload))]
pub async fn add_doctor(
    State(state): State<AppState>,
    payload: Result<Json<PublicDoctorRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    register(&state, request, "Doctor registered successfully").await
}

/// Doctor listings, search, detail and statistics
#[utoipa::path(
    get,
    path = "/api/doctor-management",
    params(DoctorManagementQuery),
    responses(
        (status = 200, description = "Doctors, one doctor or the management statistics"),
        (status = 400, description = "Invalid doctor id", body = PublicErrorResponse),
        (status = 404, description = "Doctor not found", body = PublicErrorResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "doctors"
)]
#[instrument(skip(state, query))]
pub async fn get_doctors(
    State(state): State<AppState>,
    query: Result<Query<DoctorManagementQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let view = ManagementView::parse(query.action.as_deref());
    debug!("Doctor management view {:?}", view);

    let response = match view {
        ManagementView::All => {
            let doctors = state.doctors.list_with_activity(None, None).await?;
            ApiResponse::new(doctors, "All doctors retrieved successfully").into_response()
        }
        ManagementView::List => {
            let doctors = state.doctors.list_summaries().await?;
            ApiResponse::new(doctors, "Doctors list retrieved successfully").into_response()
        }
        ManagementView::Detail => {
            let detail = state.doctors.detail(query.id.unwrap_or(0)).await?;
            ApiResponse::new(detail, "Doctor details retrieved successfully").into_response()
        }
        ManagementView::Search => {
            let doctors = state
                .doctors
                .list_with_activity(non_blank(query.q), non_blank(query.hospital_type))
                .await?;
            ApiResponse::new(doctors, "Search results retrieved successfully").into_response()
        }
        ManagementView::Stats => {
            let stats = state.reports.doctor_management_stats().await?;
            ApiResponse::new(stats, "Doctor statistics retrieved successfully").into_response()
        }
    };

    Ok(response)
}

/// Register a doctor through the management screen (`action=add`)
#[utoipa::path(
    post,
    path = "/api/doctor-management",
    params(DoctorManagementQuery),
    request_body = PublicDoctorRequest,
    responses(
        (status = 201, description = "Doctor added", body = DoctorResponse),
        (status = 400, description = "Missing or invalid field, or unknown action", body = PublicErrorResponse),
        (status = 409, description = "Email or phone number already registered", body = PublicErrorResponse),
    ),
    tag = "doctors"
)]
#[instrument(skip(state, query, payload))]
pub async fn create_doctor(
    State(state): State<AppState>,
    query: Result<Query<DoctorManagementQuery>, QueryRejection>,
    payload: Result<Json<PublicDoctorRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    expect_action(&query, "add", "POST")?;

    let Json(request) = payload?;
    register(&state, request, "Doctor added successfully").await
}

/// Rewrite the provided profile fields of a doctor (`action=update`)
#[utoipa::path(
    put,
    path = "/api/doctor-management",
    params(DoctorManagementQuery),
    request_body = PublicDoctorUpdateRequest,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorResponse),
        (status = 400, description = "Invalid field or nothing to update", body = PublicErrorResponse),
        (status = 404, description = "Doctor not found", body = PublicErrorResponse),
        (status = 409, description = "Email or phone number used by another doctor", body = PublicErrorResponse),
    ),
    tag = "doctors"
)]
#[instrument(skip(state, query, payload))]
pub async fn update_doctor(
    State(state): State<AppState>,
    query: Result<Query<DoctorManagementQuery>, QueryRejection>,
    payload: Result<Json<PublicDoctorUpdateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    expect_action(&query, "update", "PUT")?;

    let Json(request) = payload?;
    let doctor = state.doctors.update(request.into_update()?).await?;

    info!("Doctor {} updated", doctor.id);
    Ok(ApiResponse::new(doctor, "Doctor updated successfully").into_response())
}

/// Delete a doctor without screening records (`action=delete&id=N`)
#[utoipa::path(
    delete,
    path = "/api/doctor-management",
    params(DoctorManagementQuery),
    responses(
        (status = 200, description = "Doctor deleted", body = DeletedDoctorResponse),
        (status = 400, description = "Invalid doctor id", body = PublicErrorResponse),
        (status = 404, description = "Doctor not found", body = PublicErrorResponse),
        (status = 409, description = "Doctor still has screening records", body = PublicErrorResponse),
    ),
    tag = "doctors"
)]
#[instrument(skip(state, query))]
pub async fn delete_doctor(
    State(state): State<AppState>,
    query: Result<Query<DoctorManagementQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    expect_action(&query, "delete", "DELETE")?;

    let deleted = state.doctors.delete(query.id.unwrap_or(0)).await?;

    info!("Doctor {} deleted", deleted.doctor_id);
    Ok(ApiResponse::new(deleted, "Doctor deleted successfully").into_response())
}
