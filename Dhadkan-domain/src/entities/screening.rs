use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::values::{Category, Gender, HeartStatus, YesNo};

/// Optional base64 photo attached to a screening form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct PhotoUpload {
    /// Original file name; only its extension is kept
    pub name: Option<String>,
    /// Base64 encoded file content
    pub data: String,
}

/// Screening form exactly as submitted; nothing is trusted yet
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningForm {
    pub name: Option<String>,
    /// Number or numeric string
    pub age: Option<Value>,
    pub gender: Option<String>,
    pub father_name: Option<String>,
    pub mobile_no: Option<String>,
    pub school_name: Option<String>,
    pub heart_status: Option<String>,
    /// Number or numeric string
    #[serde(rename = "dr_id")]
    pub doctor_id: Option<Value>,
    pub have_aadhar: Option<String>,
    pub have_shramik: Option<String>,
    pub notes: Option<String>,
    pub aadhar_photo: Option<PhotoUpload>,
    pub shramik_photo: Option<PhotoUpload>,
}

/// A form that passed intake validation
#[derive(Debug, Clone)]
pub struct ValidScreening {
    pub category: Category,
    pub doctor_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub father_name: Option<String>,
    pub mobile_no: String,
    pub school_name: String,
    pub heart_status: HeartStatus,
    pub have_aadhar: YesNo,
    pub have_shramik: YesNo,
    pub notes: Option<String>,
}

/// Returned after a screening is stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ScreeningReceipt {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub mobile_no: String,
    pub school_name: String,
    pub heart_status: HeartStatus,
    pub category: Category,
}

/// One row of a screening listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ScreeningEntry {
    pub id: i64,
    #[serde(rename = "dr_id")]
    pub doctor_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    pub mobile_no: String,
    pub school_name: String,
    pub have_aadhar: String,
    pub have_shramik: String,
    pub aadhar_photo: Option<String>,
    pub shramik_photo: Option<String>,
    pub heart_status: String,
    pub notes: Option<String>,
    /// `dd/mm/YYYY`
    pub screening_date: String,
    pub category: Category,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub hospital_type: Option<String>,
    /// True when the heart status is suspicious
    pub disease_found: bool,
    /// `असामान्य` or `स्वस्थ`
    pub health_status: String,
}

/// Contact details of the screening doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorInfo {
    pub name: String,
    pub hospital: Option<String>,
    pub hospital_type: Option<String>,
    pub email: String,
    pub phone: String,
}

/// A single child report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChildReport {
    pub id: i64,
    #[serde(rename = "dr_id")]
    pub doctor_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub father_name: Option<String>,
    pub mobile_no: String,
    pub school_name: String,
    pub have_aadhar: String,
    pub have_shramik: String,
    pub aadhar_photo: Option<String>,
    pub shramik_photo: Option<String>,
    pub heart_status: String,
    pub notes: Option<String>,
    /// `dd/mm/YYYY HH:MM`
    pub screening_date: String,
    pub doctor_info: DoctorInfo,
}

/// Listing filters as received from the query string
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub heart_status: Option<String>,
    pub doctor_id: Option<i64>,
    pub staff_type: Option<Category>,
}

/// Page bookkeeping attached to listing responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_records: i64,
    pub records_per_page: i64,
}

impl Pagination {
    pub fn new(current_page: i64, limit: i64, total_records: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_records + limit - 1) / limit
        } else {
            0
        };
        Self {
            current_page,
            total_pages,
            total_records,
            records_per_page: limit,
        }
    }
}

/// One page of listing rows
#[derive(Debug, Clone)]
pub struct ScreeningPage {
    pub entries: Vec<ScreeningEntry>,
    pub pagination: Pagination,
}
