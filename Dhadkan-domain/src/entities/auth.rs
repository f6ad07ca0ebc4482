use serde::{Deserialize, Serialize};
#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Which account table a login targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum UserType {
    Doctor,
    Admin,
}

impl UserType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "doctor" => Some(UserType::Doctor),
            "admin" => Some(UserType::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Doctor => "doctor",
            UserType::Admin => "admin",
        }
    }
}

/// Credentials as submitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_type: Option<String>,
}

/// Profile returned to a logged in doctor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub hospital_type: Option<String>,
    #[serde(rename = "hospitalname")]
    pub hospital_name: Option<String>,
    pub phone_no: String,
    pub experience: i64,
    pub user_type: UserType,
}

/// Profile returned to a logged in administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(untagged)]
pub enum LoginUser {
    Doctor(DoctorUser),
    Admin(AdminUser),
}

/// Successful login. The token is opaque and not checked by any endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LoginSession {
    pub token: String,
    pub user: LoginUser,
}
