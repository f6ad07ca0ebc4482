use serde::{Deserialize, Serialize};
#[cfg(feature = "with-api")]
use utoipa::ToSchema;
use validator::Validate;

/// Status shown for a doctor with a screening in the last 30 days
pub const STATUS_ACTIVE: &str = "सक्रिय";

/// Status shown for every other doctor
pub const STATUS_INACTIVE: &str = "निष्क्रिय";

/// A complete, presence-checked registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DoctorRegistration {
    #[validate(length(min = 2, max = 100, message = "Doctor name must be between 2 and 100 characters"))]
    pub doctor_name: String,

    pub hospital_type: Option<String>,

    pub hospital_name: Option<String>,

    /// Checked separately: exactly ten ASCII digits
    pub phone_no: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,

    #[validate(range(min = 0, max = 50, message = "Experience must be between 0 and 50 years"))]
    pub experience: i64,
}

/// Sparse profile update. Empty name, phone, email or password count as absent;
/// hospital fields are written even when empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorUpdate {
    pub id: i64,
    pub doctor_name: Option<String>,
    pub hospital_type: Option<String>,
    pub hospital_name: Option<String>,
    pub phone_no: Option<String>,
    pub experience: Option<i64>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a doctor; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub doctor_name: String,
    pub hospital_type: Option<String>,
    #[serde(rename = "hospitalname")]
    pub hospital_name: Option<String>,
    pub phone_no: String,
    pub experience: i64,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Doctor row of the management listing and search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorListing {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub total_screenings: i64,
    pub healthy_found: i64,
    pub suspicious_found: i64,
    /// `dd/mm/YYYY` or `कभी नहीं`
    pub last_screening: String,
    /// `सक्रिय` or `निष्क्रिय`
    pub status: String,
    // Aliases kept for the admin app's doctor cards
    pub name: String,
    pub specialization: String,
    pub hospital: String,
    pub phone: String,
    pub joining_date: String,
}

/// Entry of the by-name doctor list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: i64,
    pub doctor_name: String,
    #[serde(rename = "hospitalname")]
    pub hospital_name: Option<String>,
    pub email: String,
    pub phone_no: String,
}

/// A child recently screened by a doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecentScreening {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub heart_status: String,
    /// `dd/mm/YYYY`
    #[serde(rename = "createdat")]
    pub created_at: String,
}

/// One doctor with their children screening history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetail {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub total_screenings: i64,
    pub healthy_found: i64,
    pub suspicious_found: i64,
    /// `dd/mm/YYYY HH:MM` or `कभी नहीं`
    pub last_screening: String,
    pub recent_screenings: Vec<RecentScreening>,
}

/// Result of a successful delete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeletedDoctor {
    pub doctor_id: i64,
    pub doctor_name: String,
}
