pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;

use crate::api::state::AppState;

/// Create the application router
pub fn create_application(state: AppState) -> Router {
    routes::create_app(state)
}
