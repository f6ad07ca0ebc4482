use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use dhadkan_domain::services::{
    AuthError, DoctorServiceError, ReportServiceError, ScreeningServiceError,
};

use crate::entities::common::{PublicErrorResponse, RequestError};

/// Error returned by every handler, rendered as the failure envelope
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, bad id or unknown action
    #[error("{0}")]
    BadRequest(String),

    /// Bad credentials
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    /// Uniqueness clash or dependent records
    #[error("{0}")]
    Conflict(String),

    /// Screening form rejected at intake
    #[error("{0}")]
    Unprocessable(String),

    /// Database or storage failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid_action() -> Self {
        ApiError::BadRequest("Invalid action specified".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(PublicErrorResponse::new(self.to_string()))).into_response()
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        warn!("Unreadable JSON body: {}", err.body_text());
        ApiError::BadRequest("Invalid JSON input".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        warn!("Unreadable query string: {}", err.body_text());
        ApiError::BadRequest("Invalid query parameters".to_string())
    }
}

impl From<DoctorServiceError> for ApiError {
    fn from(err: DoctorServiceError) -> Self {
        match err {
            DoctorServiceError::ValidationError(msg) => ApiError::BadRequest(msg),
            DoctorServiceError::NotFound(msg) => ApiError::NotFound(msg),
            DoctorServiceError::Conflict(msg) => ApiError::Conflict(msg),
            DoctorServiceError::RepositoryError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ValidationError(msg) => ApiError::BadRequest(msg),
            AuthError::UserNotFound | AuthError::InvalidPassword => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::RepositoryError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ScreeningServiceError> for ApiError {
    fn from(err: ScreeningServiceError) -> Self {
        match err {
            ScreeningServiceError::ValidationError(msg) => ApiError::Unprocessable(msg),
            ScreeningServiceError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            ScreeningServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ScreeningServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ScreeningServiceError::RepositoryError(_) | ScreeningServiceError::StorageError(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ReportServiceError> for ApiError {
    fn from(err: ReportServiceError) -> Self {
        match err {
            ReportServiceError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            ReportServiceError::RepositoryError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                DoctorServiceError::ValidationError("Invalid email format".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                DoctorServiceError::Conflict("Doctor with this email already exists".into()).into(),
                StatusCode::CONFLICT,
            ),
            (AuthError::InvalidPassword.into(), StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound.into(), StatusCode::UNAUTHORIZED),
            (
                ScreeningServiceError::ValidationError("Invalid gender value".into()).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ScreeningServiceError::NotFound("Child report not found".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ReportServiceError::RepositoryError("disk I/O error".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RequestError::MissingField("email").into(), StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status, "{}", err);
        }
    }

    #[test]
    fn test_internal_errors_keep_driver_message() {
        let err: ApiError = DoctorServiceError::RepositoryError("database is locked".into()).into();
        assert_eq!(err.to_string(), "Database error: database is locked");
    }

    #[tokio::test]
    async fn test_error_renders_envelope() {
        let response = ApiError::NotFound("Doctor not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Doctor not found");
    }
}
