use async_trait::async_trait;
use thiserror::Error;
use tracing::error;

use crate::auth::logging::{log_failed_login, log_successful_login};
use crate::auth::{generate_token, verify_password, PasswordError};
use crate::entities::auth::{AdminUser, Credentials, DoctorUser, LoginSession, LoginUser, UserType};
use dhadkan_data::database::DatabasePool;
use dhadkan_data::repository::{
    AdminRepository, AdminRepositoryTrait, DoctorRepository, DoctorRepositoryTrait,
    RepositoryError,
};

/// Login errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed credentials
    #[error("{0}")]
    ValidationError(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Database error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        error!("Account lookup failed: {}", err);
        AuthError::RepositoryError(err.to_string())
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::RepositoryError(err.to_string())
    }
}

/// Trait for the password login
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    /// Check credentials against the doctor or admin accounts
    async fn login(&self, credentials: Credentials) -> Result<LoginSession, AuthError>;
}

/// Password login over the doctor and admin tables
pub struct AuthService<D: DoctorRepositoryTrait, A: AdminRepositoryTrait> {
    doctors: D,
    admins: A,
}

impl<D: DoctorRepositoryTrait, A: AdminRepositoryTrait> AuthService<D, A> {
    pub fn new(doctors: D, admins: A) -> Self {
        Self { doctors, admins }
    }

    async fn login_doctor(&self, email: &str, password: &str) -> Result<LoginUser, AuthError> {
        let doctor = self
            .doctors
            .get_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &doctor.password_hash).await? {
            return Err(AuthError::InvalidPassword);
        }

        Ok(LoginUser::Doctor(DoctorUser {
            id: doctor.id,
            name: doctor.doctor_name,
            email: doctor.email,
            hospital_type: doctor.hospital_type,
            hospital_name: doctor.hospital_name,
            phone_no: doctor.phone_no,
            experience: doctor.experience,
            user_type: UserType::Doctor,
        }))
    }

    async fn login_admin(&self, email: &str, password: &str) -> Result<LoginUser, AuthError> {
        let admin = self
            .admins
            .get_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &admin.password_hash).await? {
            return Err(AuthError::InvalidPassword);
        }

        Ok(LoginUser::Admin(AdminUser {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
            user_type: UserType::Admin,
        }))
    }
}

/// Present and non-empty after trimming
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<D, A> AuthServiceTrait for AuthService<D, A>
where
    D: DoctorRepositoryTrait + Send + Sync,
    A: AdminRepositoryTrait + Send + Sync,
{
    async fn login(&self, credentials: Credentials) -> Result<LoginSession, AuthError> {
        let (email, password, user_type) = match (
            required(credentials.email),
            credentials.password.filter(|p| !p.is_empty()),
            required(credentials.user_type),
        ) {
            (Some(email), Some(password), Some(user_type)) => (email, password, user_type),
            _ => {
                return Err(AuthError::ValidationError(
                    "Email, password and user type are required".to_string(),
                ))
            }
        };

        let user_type = UserType::parse(&user_type)
            .ok_or_else(|| AuthError::ValidationError("Invalid user type".to_string()))?;

        if !validator::validate_email(email.as_str()) {
            return Err(AuthError::ValidationError("Invalid email format".to_string()));
        }

        let outcome = match user_type {
            UserType::Doctor => self.login_doctor(&email, &password).await,
            UserType::Admin => self.login_admin(&email, &password).await,
        };

        match outcome {
            Ok(user) => {
                let id = match &user {
                    LoginUser::Doctor(doctor) => doctor.id,
                    LoginUser::Admin(admin) => admin.id,
                };
                log_successful_login(user_type.as_str(), id);
                Ok(LoginSession {
                    token: generate_token(),
                    user,
                })
            }
            Err(err) => {
                log_failed_login(user_type.as_str(), &email, &err.to_string());
                Err(err)
            }
        }
    }
}

/// Create an auth service backed by the SQLite repositories
pub fn create_default_auth_service(pool: DatabasePool) -> impl AuthServiceTrait {
    AuthService::new(DoctorRepository::new(pool.clone()), AdminRepository::new(pool))
}
