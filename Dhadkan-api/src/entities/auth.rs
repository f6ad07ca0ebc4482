use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use dhadkan_domain::entities::auth::Credentials;

/// Login request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicLoginRequest {
    /// Email address
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,

    /// `doctor` or `admin`
    pub user_type: Option<String>,
}

impl From<PublicLoginRequest> for Credentials {
    fn from(request: PublicLoginRequest) -> Self {
        Credentials {
            email: request.email,
            password: request.password,
            user_type: request.user_type,
        }
    }
}
