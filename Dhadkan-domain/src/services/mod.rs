// Domain services
// This module contains business logic implementations.

pub mod auth;
pub mod doctor;
pub mod photos;
pub mod reports;
pub mod screening;

#[cfg(test)]
pub(crate) mod mock_repositories;

use validator::ValidationErrors;

// Re-export service traits and factory functions
pub use auth::{create_default_auth_service, AuthError, AuthServiceTrait};
pub use doctor::{create_default_doctor_service, DoctorServiceError, DoctorServiceTrait};
pub use photos::{PhotoError, PhotoStore};
pub use reports::{create_default_report_service, ReportServiceError, ReportServiceTrait};
pub use screening::{create_default_screening_service, ScreeningServiceError, ScreeningServiceTrait};

/// Flatten `validator` errors into one message, fields in name order
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .map(|(field, errors)| {
            errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect::<Vec<String>>()
                .join(", ")
        })
        .collect::<Vec<String>>()
        .join("; ")
}
