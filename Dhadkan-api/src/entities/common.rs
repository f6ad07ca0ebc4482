use axum::{response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use dhadkan_domain::clock::{Clock, SystemClock};
use dhadkan_domain::entities::auth::LoginSession;
use dhadkan_domain::entities::doctor::{DeletedDoctor, Doctor, DoctorDetail};
use dhadkan_domain::entities::report::{
    AdminDashboard, ChildrenStatistics, DoctorManagementStats, DoctorPortalStats, DoctorProfile,
    StaffStatistics,
};
use dhadkan_domain::entities::screening::{ChildReport, Pagination, ScreeningReceipt};

/// Envelope wrapped around every JSON response
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    DoctorResponse = ApiResponse<Doctor>,
    DoctorDetailResponse = ApiResponse<DoctorDetail>,
    DeletedDoctorResponse = ApiResponse<DeletedDoctor>,
    LoginResponse = ApiResponse<LoginSession>,
    ReceiptResponse = ApiResponse<ScreeningReceipt>,
    ChildReportResponse = ApiResponse<ChildReport>,
    DashboardResponse = ApiResponse<AdminDashboard>,
    ChildrenStatisticsResponse = ApiResponse<ChildrenStatistics>,
    StaffStatisticsResponse = ApiResponse<StaffStatistics>,
    ManagementStatsResponse = ApiResponse<DoctorManagementStats>,
    PortalStatsResponse = ApiResponse<DoctorPortalStats>,
    DoctorProfileResponse = ApiResponse<DoctorProfile>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    /// Present on paged listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope stamped with the current time
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            pagination: None,
            timestamp: Some(SystemClock.timestamp()),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Envelope of a failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicErrorResponse {
    /// Always false
    pub success: bool,
    /// Always null
    #[schema(value_type = Object)]
    pub data: Option<Value>,
    /// Human-readable reason
    pub message: String,
    pub timestamp: String,
}

impl PublicErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            timestamp: SystemClock.timestamp(),
        }
    }
}

/// Request body that cannot be turned into a domain value
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    Invalid(String),
}

/// Trimmed value of a required text field
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, RequestError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(RequestError::MissingField(field))
}

/// Body of the doctor portal liveness check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicTimestamp {
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::new(vec![1, 2], "ok")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["message"], "ok");
        assert!(json.get("pagination").is_none());
        assert_eq!(json["timestamp"].as_str().map(str::len), Some(19));
    }

    #[test]
    fn test_paged_envelope() {
        let json = serde_json::to_value(
            ApiResponse::new(Vec::<i64>::new(), "ok").with_pagination(Pagination::new(2, 10, 21)),
        )
        .unwrap();
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert_eq!(json["pagination"]["currentPage"], 2);
    }

    #[test]
    fn test_required_trims_and_names_field() {
        assert_eq!(required(Some(" a ".to_string()), "name"), Ok("a".to_string()));
        assert_eq!(
            required(Some("   ".to_string()), "email").unwrap_err().to_string(),
            "Missing required field: email"
        );
        assert_eq!(required(None, "phoneNo"), Err(RequestError::MissingField("phoneNo")));
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let json = serde_json::to_value(PublicErrorResponse::new("Doctor not found")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "Doctor not found");
    }
}
