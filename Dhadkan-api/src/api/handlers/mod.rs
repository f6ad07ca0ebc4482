pub mod auth;
pub mod doctor_portal;
pub mod doctors;
pub mod health;
pub mod reports;
pub mod screening;


// Re-export handlers for easier imports
pub use auth::login;
pub use doctor_portal::{doctor_portal, doctor_portal_submit, doctor_profile};
pub use doctors::{add_doctor, create_doctor, delete_doctor, get_doctors, update_doctor};
pub use health::health_check;
pub use reports::{admin_dashboard, get_reports};
pub use screening::{add_child_report, add_teacher_emp_report};
