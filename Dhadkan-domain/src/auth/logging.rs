use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of account events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthEventType {
    /// Successful login
    Login,
    /// Rejected login attempt
    FailedLogin,
    /// Doctor account created
    Registration,
    /// Doctor profile or password changed
    ProfileUpdate,
    /// Doctor account removed
    AccountDeletion,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::Login => write!(f, "LOGIN"),
            AuthEventType::FailedLogin => write!(f, "FAILED_LOGIN"),
            AuthEventType::Registration => write!(f, "REGISTRATION"),
            AuthEventType::ProfileUpdate => write!(f, "PROFILE_UPDATE"),
            AuthEventType::AccountDeletion => write!(f, "ACCOUNT_DELETION"),
        }
    }
}

/// Account event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    pub event_type: AuthEventType,
    /// `doctor` or `admin`
    pub user_type: Option<String>,
    /// Account id or submitted email
    pub subject: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub details: Option<String>,
    /// Authentication method used
    pub auth_method: Option<String>,
}

impl AuthEvent {
    pub fn new(event_type: AuthEventType, subject: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user_type: None,
            subject: subject.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            auth_method: None,
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }
}

/// Log an account event; failures go out at `warn`
pub fn log_auth_event(event: AuthEvent) {
    let subject = event.subject.as_deref().unwrap_or("anonymous");
    let user_type = event.user_type.as_deref().unwrap_or("-");
    let details = event.details.as_deref().unwrap_or("");

    if event.success {
        info!(
            "AUTH-LOG [{}] [{}:{}] [SUCCESS] [{}] {}",
            event.event_type,
            user_type,
            subject,
            event.timestamp.to_rfc3339(),
            details
        );
    } else {
        warn!(
            "AUTH-LOG [{}] [{}:{}] [FAILURE] [{}] {}",
            event.event_type,
            user_type,
            subject,
            event.timestamp.to_rfc3339(),
            details
        );
    }
}

/// Log a successful login
pub fn log_successful_login(user_type: &str, user_id: i64) {
    let event = AuthEvent::new(AuthEventType::Login, Some(&user_id.to_string()), true)
        .with_user_type(user_type)
        .with_auth_method("password");
    log_auth_event(event);
}

/// Log a rejected login attempt
pub fn log_failed_login(user_type: &str, email: &str, reason: &str) {
    let event = AuthEvent::new(AuthEventType::FailedLogin, Some(email), false)
        .with_user_type(user_type)
        .with_details(reason)
        .with_auth_method("password");
    log_auth_event(event);
}

/// Log a doctor account change
pub fn log_account_change(event_type: AuthEventType, doctor_id: i64) {
    let event = AuthEvent::new(event_type, Some(&doctor_id.to_string()), true)
        .with_user_type("doctor");
    log_auth_event(event);
}
