use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use utoipa::IntoParams;

use dhadkan_domain::clock::{Clock, SystemClock};
use dhadkan_domain::entities::report::DoctorProfile;
use dhadkan_domain::entities::screening::ListingQuery;
use dhadkan_domain::entities::Category;

use super::screening::submit_screening;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::common::{
    ApiResponse, DoctorProfileResponse, PublicErrorResponse, PublicTimestamp, ReceiptResponse,
};
use crate::entities::screening::PublicScreeningRequest;

/// Rows per page of the doctor's own listings
const PORTAL_PAGE_SIZE: i64 = 50;

/// Query parameters of the doctor portal
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PortalQuery {
    /// `get_doctor_profile`, `get_doctor_stats`, `get_children_list`,
    /// `get_teacher_employee_list`, `add_child_report` (POST), `get_all_doctors` or `test`
    pub action: Option<String>,
    /// Logged in doctor
    pub doctor_id: Option<i64>,
    /// 1-based page, default 1
    pub page: Option<i64>,
    /// Rows per page, default 50, clamped to 1-100
    pub limit: Option<i64>,
}

impl PortalQuery {
    fn doctor_id(&self) -> Result<i64, ApiError> {
        match self.doctor_id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(ApiError::BadRequest("Invalid doctor ID".to_string())),
        }
    }

    fn listing(&self, doctor_id: i64) -> ListingQuery {
        ListingQuery {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(PORTAL_PAGE_SIZE),
            doctor_id: Some(doctor_id),
            ..Default::default()
        }
    }
}

/// Actions of the doctor portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PortalAction {
    GetDoctorProfile,
    GetDoctorStats,
    GetChildrenList,
    GetTeacherEmployeeList,
    AddChildReport,
    GetAllDoctors,
    Test,
}

impl PortalAction {
    fn parse(action: Option<&str>) -> Result<Self, ApiError> {
        match action.map(str::trim) {
            Some("get_doctor_profile") => Ok(PortalAction::GetDoctorProfile),
            Some("get_doctor_stats") => Ok(PortalAction::GetDoctorStats),
            Some("get_children_list") => Ok(PortalAction::GetChildrenList),
            Some("get_teacher_employee_list") => Ok(PortalAction::GetTeacherEmployeeList),
            Some("add_child_report") => Ok(PortalAction::AddChildReport),
            Some("get_all_doctors") => Ok(PortalAction::GetAllDoctors),
            Some("test") => Ok(PortalAction::Test),
            _ => Err(ApiError::invalid_action()),
        }
    }
}

/// Every read action of the portal
async fn read_action(state: &AppState, action: PortalAction, query: &PortalQuery) -> Result<Response, ApiError> {
    let response = match action {
        PortalAction::GetDoctorProfile => {
            let doctor = state.doctors.profile(query.doctor_id()?).await?;
            ApiResponse::new(doctor, "Doctor profile fetched successfully").into_response()
        }
        PortalAction::GetDoctorStats => {
            let stats = state.reports.doctor_portal_stats(query.doctor_id()?).await?;
            ApiResponse::new(stats, "Statistics fetched successfully").into_response()
        }
        PortalAction::GetChildrenList => {
            let listing = query.listing(query.doctor_id()?);
            let page = state.screenings.list_children(listing).await?;
            ApiResponse::new(page.entries, "Children list fetched successfully")
                .with_pagination(page.pagination)
                .into_response()
        }
        PortalAction::GetTeacherEmployeeList => {
            let listing = query.listing(query.doctor_id()?);
            let page = state.screenings.list_staff(listing).await?;
            ApiResponse::new(page.entries, "Teacher and employee list fetched successfully")
                .with_pagination(page.pagination)
                .into_response()
        }
        PortalAction::GetAllDoctors => {
            let doctors = state.doctors.list_all().await?;
            ApiResponse::new(doctors, "All doctors fetched successfully").into_response()
        }
        PortalAction::Test => {
            let body = PublicTimestamp {
                timestamp: SystemClock.timestamp(),
            };
            ApiResponse::new(body, "API is working correctly").into_response()
        }
        PortalAction::AddChildReport => {
            return Err(ApiError::MethodNotAllowed("Method not allowed".to_string()));
        }
    };

    Ok(response)
}

/// Read actions of the doctor portal
#[utoipa::path(
    get,
    path = "/api/doctor",
    params(PortalQuery),
    responses(
        (status = 200, description = "Profile, statistics, listing page or doctor list"),
        (status = 400, description = "Unknown action or invalid doctor id", body = PublicErrorResponse),
        (status = 404, description = "Doctor not found", body = PublicErrorResponse),
        (status = 405, description = "Action needs POST", body = PublicErrorResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "doctor portal"
)]
#[instrument(skip(state, query))]
pub async fn doctor_portal(
    State(state): State<AppState>,
    query: Result<Query<PortalQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let action = PortalAction::parse(query.action.as_deref())?;
    debug!("Doctor portal action {:?}", action);

    read_action(&state, action, &query).await
}

/// Submit a child screening on behalf of the logged in doctor (`action=add_child_report`)
#[utoipa::path(
    post,
    path = "/api/doctor",
    params(PortalQuery),
    request_body = PublicScreeningRequest,
    responses(
        (status = 201, description = "Child screening stored", body = ReceiptResponse),
        (status = 400, description = "Unknown action, invalid doctor id or invalid JSON", body = PublicErrorResponse),
        (status = 409, description = "Mobile number already registered", body = PublicErrorResponse),
        (status = 422, description = "Missing or invalid field", body = PublicErrorResponse),
    ),
    tag = "doctor portal"
)]
#[instrument(skip(state, query, payload))]
pub async fn doctor_portal_submit(
    State(state): State<AppState>,
    query: Result<Query<PortalQuery>, QueryRejection>,
    payload: Result<Json<PublicScreeningRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let action = PortalAction::parse(query.action.as_deref())?;
    if action != PortalAction::AddChildReport {
        return read_action(&state, action, &query).await;
    }

    let doctor_id = query.doctor_id()?;
    let Json(mut request) = payload?;
    request.doctor_id = Some(Value::from(doctor_id));

    submit_screening(&state, Category::Child, request, "Child report added successfully").await
}

/// Query parameters of the profile endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProfileQuery {
    pub doctor_id: Option<i64>,
}

/// Doctor profile with the counters shown on the profile page
#[utoipa::path(
    get,
    path = "/api/doctor-profile",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Profile and statistics", body = DoctorProfileResponse),
        (status = 400, description = "Invalid doctor id", body = PublicErrorResponse),
        (status = 404, description = "Doctor not found", body = PublicErrorResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "doctor portal"
)]
#[instrument(skip(state, query))]
pub async fn doctor_profile(
    State(state): State<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let doctor_id = query
        .doctor_id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest("Invalid doctor ID provided".to_string()))?;

    let profile = state.doctors.profile(doctor_id).await?;
    let statistics = state.reports.doctor_portal_stats(doctor_id).await?;

    let body = DoctorProfile { profile, statistics };
    Ok(ApiResponse::new(body, "Doctor profile fetched successfully").into_response())
}
