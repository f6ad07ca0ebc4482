use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::handlers::{
    add_child_report, add_doctor, add_teacher_emp_report, admin_dashboard, create_doctor,
    delete_doctor, doctor_portal, doctor_portal_submit, doctor_profile, get_doctors, get_reports,
    health_check, login, update_doctor,
};
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Browsers may cache a preflight answer this long
const CORS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/login", post(login))
        .route("/add-doctor", post(add_doctor))
        .route(
            "/doctor-management",
            get(get_doctors)
                .post(create_doctor)
                .put(update_doctor)
                .delete(delete_doctor),
        )
        .route("/add-child-report", post(add_child_report))
        .route("/add-teacher-emp-report", post(add_teacher_emp_report))
        .route("/reports", get(get_reports))
        .route("/admin-dashboard", get(admin_dashboard))
        .route("/doctor", get(doctor_portal).post(doctor_portal_submit))
        .route("/doctor-profile", get(doctor_profile));

    debug!("API routes configured");

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .fallback(not_found)
        .with_state(state);

    // Add Swagger UI to the router
    let app = app.merge(configure_swagger_routes());

    debug!("Swagger UI merged");

    configure_http_layers(app)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

/// Permissive CORS, response hardening headers and request tracing
fn configure_http_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(CORS_MAX_AGE);

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    app.layer(security_headers)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
