use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use dhadkan_domain::entities::doctor::{DoctorRegistration, DoctorUpdate};
use dhadkan_domain::entities::lenient_i64;

use super::common::{required, RequestError};

const EXPERIENCE_MESSAGE: &str = "Experience must be between 0 and 50 years";

/// Doctor registration payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicDoctorRequest {
    /// 2 to 100 characters
    pub doctor_name: Option<String>,

    pub email: Option<String>,

    /// Exactly ten digits
    pub phone_no: Option<String>,

    /// At least 6 characters; stored only as a bcrypt hash
    pub password: Option<String>,

    pub hospital_type: Option<String>,

    #[serde(rename = "hospitalname")]
    pub hospital_name: Option<String>,

    /// Years of practice, 0 to 50; number or numeric string
    #[schema(value_type = Option<i64>)]
    pub experience: Option<Value>,
}

impl PublicDoctorRequest {
    /// Presence checks, in the order the admin app lists the fields
    pub fn into_registration(self) -> Result<DoctorRegistration, RequestError> {
        let doctor_name = required(self.doctor_name, "doctorName")?;
        let email = required(self.email, "email")?;
        let phone_no = required(self.phone_no, "phoneNo")?;
        let password = self
            .password
            .filter(|p| !p.trim().is_empty())
            .ok_or(RequestError::MissingField("password"))?;

        let experience = match self.experience {
            None | Some(Value::Null) => 0,
            Some(value) => lenient_i64(&value)
                .ok_or_else(|| RequestError::Invalid(EXPERIENCE_MESSAGE.to_string()))?,
        };

        Ok(DoctorRegistration {
            doctor_name,
            hospital_type: trimmed(self.hospital_type),
            hospital_name: trimmed(self.hospital_name),
            phone_no,
            email,
            password,
            experience,
        })
    }
}

/// Sparse doctor update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicDoctorUpdateRequest {
    /// Doctor to update
    #[schema(value_type = i64)]
    pub id: Option<Value>,
    pub doctor_name: Option<String>,
    pub hospital_type: Option<String>,
    #[serde(rename = "hospitalname")]
    pub hospital_name: Option<String>,
    pub phone_no: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub experience: Option<Value>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl PublicDoctorUpdateRequest {
    pub fn into_update(self) -> Result<DoctorUpdate, RequestError> {
        let id = match self.id {
            None | Some(Value::Null) => return Err(RequestError::Invalid("Doctor ID is required".to_string())),
            Some(value) => lenient_i64(&value).unwrap_or(0),
        };

        let experience = match self.experience {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                lenient_i64(&value)
                    .ok_or_else(|| RequestError::Invalid(EXPERIENCE_MESSAGE.to_string()))?,
            ),
        };

        Ok(DoctorUpdate {
            id,
            doctor_name: self.doctor_name,
            hospital_type: self.hospital_type.map(|v| v.trim().to_string()),
            hospital_name: self.hospital_name.map(|v| v.trim().to_string()),
            phone_no: self.phone_no,
            experience,
            email: self.email,
            password: self.password,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
