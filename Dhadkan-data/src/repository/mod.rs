// Repository module structure
pub mod errors;
mod admin;
mod doctor;
mod query;
mod reports;
mod screening;

// Re-export commonly used types
pub use admin::{AdminRepository, AdminRepositoryTrait};
pub use doctor::{DoctorRepository, DoctorRepositoryTrait};
pub use errors::RepositoryError;
pub use reports::{ReportRepository, ReportRepositoryTrait};
pub use screening::{ScreeningRepository, ScreeningRepositoryTrait};
