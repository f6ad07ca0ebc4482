use serde::{Deserialize, Serialize};

/// Storage model for a registered doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: i64,
    pub doctor_name: String,
    pub hospital_type: Option<String>,
    pub hospital_name: Option<String>,
    pub phone_no: String,
    pub experience: i64,
    pub email: String,
    /// bcrypt hash, never leaves the domain layer
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Input data for inserting a doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDoctor {
    pub doctor_name: String,
    pub hospital_type: Option<String>,
    pub hospital_name: Option<String>,
    pub phone_no: String,
    pub experience: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Sparse set of profile changes; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorChanges {
    pub doctor_name: Option<String>,
    pub hospital_type: Option<String>,
    pub hospital_name: Option<String>,
    pub phone_no: Option<String>,
    pub experience: Option<i64>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl DoctorChanges {
    pub fn is_empty(&self) -> bool {
        self.doctor_name.is_none()
            && self.hospital_type.is_none()
            && self.hospital_name.is_none()
            && self.phone_no.is_none()
            && self.experience.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }
}

/// Filters for the doctor search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearch {
    /// Substring of name, hospital or email
    pub term: Option<String>,
    /// Exact hospital type
    pub hospital_type: Option<String>,
}

impl DoctorSearch {
    pub fn is_empty(&self) -> bool {
        self.term.is_none() && self.hospital_type.is_none()
    }
}

/// Children screening counts for one doctor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningSummary {
    pub total: i64,
    pub healthy: i64,
    pub suspicious: i64,
    pub last_screening: Option<String>,
}

/// A doctor together with their screening activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorActivityRow {
    pub doctor: DoctorRecord,
    pub summary: ScreeningSummary,
    /// Screened someone inside the activity window
    pub active: bool,
}

/// Minimal doctor listing used by dropdowns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorBrief {
    pub id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub email: String,
    pub phone_no: String,
}

/// A child recently screened by a doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentScreeningRow {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub heart_status: String,
    pub created_at: String,
}
