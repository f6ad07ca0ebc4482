use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::IntoParams;

use dhadkan_domain::entities::screening::ListingQuery;
use dhadkan_domain::entities::Category;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::common::{ApiResponse, DashboardResponse, PublicErrorResponse};

/// Rows per page when the client does not ask
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Query parameters of the reports endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportsQuery {
    /// `getReports` (default), `getStaffReports`, `getReportDetails`, `getStats` or `getStaffStats`
    pub action: Option<String>,
    /// 1-based page, default 1
    pub page: Option<i64>,
    /// Rows per page, default 10, clamped to 1-100
    pub limit: Option<i64>,
    /// Case-insensitive substring of name, school or father name
    pub search: Option<String>,
    /// Exact heart status
    pub heart_status: Option<String>,
    /// Screening doctor; ignored unless positive
    pub doctor_id: Option<i64>,
    /// `teacher` or `employee`; both when absent
    pub staff_type: Option<String>,
    /// Child id for `getReportDetails`
    pub id: Option<i64>,
}

impl ReportsQuery {
    fn listing(&self) -> ListingQuery {
        ListingQuery {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            search: non_blank(self.search.as_deref()),
            heart_status: non_blank(self.heart_status.as_deref()),
            doctor_id: self.doctor_id.filter(|id| *id > 0),
            staff_type: match self.staff_type.as_deref().map(str::trim) {
                Some("teacher") => Some(Category::Teacher),
                Some("employee") => Some(Category::Employee),
                _ => None,
            },
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Actions of the reports endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportAction {
    GetReports,
    GetStaffReports,
    GetReportDetails,
    GetStats,
    GetStaffStats,
}

impl ReportAction {
    fn parse(action: Option<&str>) -> Result<Self, ApiError> {
        match action.map(str::trim) {
            None | Some("") | Some("getReports") => Ok(ReportAction::GetReports),
            Some("getStaffReports") => Ok(ReportAction::GetStaffReports),
            Some("getReportDetails") => Ok(ReportAction::GetReportDetails),
            Some("getStats") => Ok(ReportAction::GetStats),
            Some("getStaffStats") => Ok(ReportAction::GetStaffStats),
            Some(_) => Err(ApiError::invalid_action()),
        }
    }
}

/// Filtered screening listings, single child reports and report statistics
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportsQuery),
    responses(
        (status = 200, description = "Listing page, child report or statistics"),
        (status = 400, description = "Unknown action or invalid id", body = PublicErrorResponse),
        (status = 404, description = "Child report not found", body = PublicErrorResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(state, query))]
pub async fn get_reports(
    State(state): State<AppState>,
    query: Result<Query<ReportsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let action = ReportAction::parse(query.action.as_deref())?;
    debug!("Reports action {:?}", action);

    let response = match action {
        ReportAction::GetReports => {
            let page = state.screenings.list_children(query.listing()).await?;
            ApiResponse::new(page.entries, "Children reports fetched successfully")
                .with_pagination(page.pagination)
                .into_response()
        }
        ReportAction::GetStaffReports => {
            let page = state.screenings.list_staff(query.listing()).await?;
            ApiResponse::new(page.entries, "Staff reports fetched successfully")
                .with_pagination(page.pagination)
                .into_response()
        }
        ReportAction::GetReportDetails => {
            let report = state.screenings.child_report(query.id.unwrap_or(0)).await?;
            ApiResponse::new(report, "Child report fetched successfully").into_response()
        }
        ReportAction::GetStats => {
            let stats = state.reports.children_statistics().await?;
            ApiResponse::new(stats, "Statistics fetched successfully").into_response()
        }
        ReportAction::GetStaffStats => {
            let stats = state.reports.staff_statistics().await?;
            ApiResponse::new(stats, "Staff statistics fetched successfully").into_response()
        }
    };

    Ok(response)
}

/// Every admin dashboard figure, computed on demand
#[utoipa::path(
    get,
    path = "/api/admin-dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(state))]
pub async fn admin_dashboard(State(state): State<AppState>) -> Result<Response, ApiError> {
    let dashboard = state.reports.admin_dashboard().await?;
    Ok(ApiResponse::new(dashboard, "Dashboard statistics retrieved successfully").into_response())
}
