use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use dhadkan_domain::entities::screening::{PhotoUpload, ScreeningForm};

/// Screening form for a child, teacher or employee.
///
/// Every field is optional on the wire so that a missing one can be
/// reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicScreeningRequest {
    pub name: Option<String>,

    /// 1 to 100; number or numeric string
    #[schema(value_type = Option<i64>)]
    pub age: Option<Value>,

    /// `पुरुष` or `महिला`
    pub gender: Option<String>,

    /// Children only
    pub father_name: Option<String>,

    /// Exactly ten digits, unique per category
    pub mobile_no: Option<String>,

    pub school_name: Option<String>,

    /// `संदिग्ध` or `संदेह नहीं`
    pub heart_status: Option<String>,

    /// Screening doctor; number or numeric string
    #[serde(rename = "dr_id")]
    #[schema(value_type = Option<i64>)]
    pub doctor_id: Option<Value>,

    /// `yes` or `no`
    pub have_aadhar: Option<String>,

    /// `yes` or `no`
    pub have_shramik: Option<String>,

    pub notes: Option<String>,

    pub aadhar_photo: Option<PhotoUpload>,

    pub shramik_photo: Option<PhotoUpload>,

    /// Staff form only: `teacher` (default) or `employee`
    pub category: Option<String>,
}

impl From<PublicScreeningRequest> for ScreeningForm {
    fn from(request: PublicScreeningRequest) -> Self {
        ScreeningForm {
            name: request.name,
            age: request.age,
            gender: request.gender,
            father_name: request.father_name,
            mobile_no: request.mobile_no,
            school_name: request.school_name,
            heart_status: request.heart_status,
            doctor_id: request.doctor_id,
            have_aadhar: request.have_aadhar,
            have_shramik: request.have_shramik,
            notes: request.notes,
            aadhar_photo: request.aadhar_photo,
            shramik_photo: request.shramik_photo,
        }
    }
}
