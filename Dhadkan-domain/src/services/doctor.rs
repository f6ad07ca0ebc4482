use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::Validate;

use crate::auth::logging::{log_account_change, AuthEventType};
use crate::auth::{hash_password, PasswordError};
use crate::clock::{format_timestamp, Clock};
use crate::entities::conversions;
use crate::entities::doctor::{
    DeletedDoctor, Doctor, DoctorDetail, DoctorListing, DoctorRegistration, DoctorSummary,
    DoctorUpdate,
};
use crate::entities::values::is_ten_digits;
use crate::services::validation_message;
use dhadkan_data::database::DatabasePool;
use dhadkan_data::models::{DoctorChanges, DoctorSearch, NewDoctor};
use dhadkan_data::repository::{DoctorRepository, DoctorRepositoryTrait, RepositoryError};

/// Screenings shown on the doctor detail view
const RECENT_SCREENINGS: i64 = 10;

/// Days without a screening before a doctor counts as inactive
const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Doctor service errors
#[derive(Debug, Error)]
pub enum DoctorServiceError {
    /// Rejected input
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness clash or dependent records
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    RepositoryError(String),
}

impl From<PasswordError> for DoctorServiceError {
    fn from(err: PasswordError) -> Self {
        DoctorServiceError::RepositoryError(err.to_string())
    }
}

/// Trait for doctor registration and profile management
#[async_trait]
pub trait DoctorServiceTrait: Send + Sync {
    /// Check a registration before anything is written
    fn validate_registration(&self, registration: &DoctorRegistration)
        -> Result<(), DoctorServiceError>;

    async fn register(&self, registration: DoctorRegistration) -> Result<Doctor, DoctorServiceError>;

    /// Rewrite the present fields of `update`
    async fn update(&self, update: DoctorUpdate) -> Result<Doctor, DoctorServiceError>;

    /// Remove a doctor with no screening records
    async fn delete(&self, id: i64) -> Result<DeletedDoctor, DoctorServiceError>;

    /// Doctors with screening activity; blank filters list everyone newest first
    async fn list_with_activity(
        &self,
        term: Option<String>,
        hospital_type: Option<String>,
    ) -> Result<Vec<DoctorListing>, DoctorServiceError>;

    /// Doctors ordered by name
    async fn list_summaries(&self) -> Result<Vec<DoctorSummary>, DoctorServiceError>;

    /// Every doctor, newest first
    async fn list_all(&self) -> Result<Vec<Doctor>, DoctorServiceError>;

    async fn detail(&self, id: i64) -> Result<DoctorDetail, DoctorServiceError>;

    async fn profile(&self, id: i64) -> Result<Doctor, DoctorServiceError>;
}

/// Doctor service for domain logic
pub struct DoctorService<R: DoctorRepositoryTrait> {
    repository: R,
    clock: Arc<dyn Clock>,
    bcrypt_cost: u32,
}

impl<R: DoctorRepositoryTrait> DoctorService<R> {
    pub fn new(repository: R, clock: Arc<dyn Clock>, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            clock,
            bcrypt_cost,
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> DoctorServiceError {
        match err {
            RepositoryError::NotFound(_) => DoctorServiceError::NotFound("Doctor not found".to_string()),
            RepositoryError::Validation(msg) => DoctorServiceError::ValidationError(msg),
            RepositoryError::Conflict { field } => match field.as_str() {
                "email" => DoctorServiceError::Conflict(
                    "Doctor with this email already exists".to_string(),
                ),
                "phone_no" => DoctorServiceError::Conflict(
                    "Doctor with this phone number already exists".to_string(),
                ),
                _ => DoctorServiceError::Conflict(format!("Conflicting value for {}", field)),
            },
            _ => {
                error!("Doctor repository failure: {}", err);
                DoctorServiceError::RepositoryError(err.to_string())
            }
        }
    }

    fn require_id(id: i64) -> Result<(), DoctorServiceError> {
        if id <= 0 {
            return Err(DoctorServiceError::ValidationError(
                "Valid doctor ID is required".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_update(update: &DoctorUpdate) -> Result<(), DoctorServiceError> {
        if let Some(name) = &update.doctor_name {
            let length = name.chars().count();
            if !(2..=100).contains(&length) {
                return Err(DoctorServiceError::ValidationError(
                    "Doctor name must be between 2 and 100 characters".to_string(),
                ));
            }
        }
        if let Some(email) = &update.email {
            if !validator::validate_email(email.as_str()) {
                return Err(DoctorServiceError::ValidationError(
                    "Invalid email format".to_string(),
                ));
            }
        }
        if let Some(phone) = &update.phone_no {
            if !is_ten_digits(phone) {
                return Err(DoctorServiceError::ValidationError(
                    "Phone number must be exactly 10 digits".to_string(),
                ));
            }
        }
        if let Some(password) = &update.password {
            if password.chars().count() < 6 {
                return Err(DoctorServiceError::ValidationError(
                    "Password must be at least 6 characters long".to_string(),
                ));
            }
        }
        if let Some(experience) = update.experience {
            if !(0..=50).contains(&experience) {
                return Err(DoctorServiceError::ValidationError(
                    "Experience must be between 0 and 50 years".to_string(),
                ));
            }
        }
        Ok(())
    }

    async fn existing(&self, id: i64) -> Result<dhadkan_data::models::DoctorRecord, DoctorServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| DoctorServiceError::NotFound("Doctor not found".to_string()))
    }
}

/// Blank strings count as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<R: DoctorRepositoryTrait + Send + Sync> DoctorServiceTrait for DoctorService<R> {
    fn validate_registration(
        &self,
        registration: &DoctorRegistration,
    ) -> Result<(), DoctorServiceError> {
        if let Err(validation_errors) = registration.validate() {
            return Err(DoctorServiceError::ValidationError(validation_message(
                &validation_errors,
            )));
        }

        if !is_ten_digits(&registration.phone_no) {
            return Err(DoctorServiceError::ValidationError(
                "Phone number must be exactly 10 digits".to_string(),
            ));
        }

        Ok(())
    }

    async fn register(&self, registration: DoctorRegistration) -> Result<Doctor, DoctorServiceError> {
        self.validate_registration(&registration)?;

        let taken = self
            .repository
            .get_by_email(&registration.email)
            .await
            .map_err(|e| self.map_repo_error(e))?;
        if taken.is_some() {
            warn!("Registration rejected, email already registered");
            return Err(DoctorServiceError::Conflict(
                "Doctor with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&registration.password, self.bcrypt_cost).await?;
        let new_doctor = NewDoctor {
            doctor_name: registration.doctor_name,
            hospital_type: registration.hospital_type,
            hospital_name: registration.hospital_name,
            phone_no: registration.phone_no,
            experience: registration.experience,
            email: registration.email,
            password_hash,
            created_at: self.clock.timestamp(),
        };

        let record = self
            .repository
            .create(new_doctor)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Registered doctor {}", record.id);
        log_account_change(AuthEventType::Registration, record.id);
        Ok(conversions::convert_to_domain_doctor(record))
    }

    async fn update(&self, update: DoctorUpdate) -> Result<Doctor, DoctorServiceError> {
        Self::require_id(update.id)?;

        let update = DoctorUpdate {
            doctor_name: non_blank(update.doctor_name),
            phone_no: non_blank(update.phone_no),
            email: non_blank(update.email),
            password: update.password.filter(|p| !p.is_empty()),
            ..update
        };
        Self::validate_update(&update)?;

        self.existing(update.id).await?;

        if let Some(email) = &update.email {
            let in_use = self
                .repository
                .email_in_use(email, update.id)
                .await
                .map_err(|e| self.map_repo_error(e))?;
            if in_use {
                return Err(DoctorServiceError::Conflict(
                    "Email is already used by another doctor".to_string(),
                ));
            }
        }

        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password, self.bcrypt_cost).await?),
            None => None,
        };

        let changes = DoctorChanges {
            doctor_name: update.doctor_name,
            hospital_type: update.hospital_type,
            hospital_name: update.hospital_name,
            phone_no: update.phone_no,
            experience: update.experience,
            email: update.email,
            password_hash,
        };
        if changes.is_empty() {
            return Err(DoctorServiceError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        let record = self
            .repository
            .update(update.id, changes, &self.clock.timestamp())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict { field } if field == "email" => {
                    DoctorServiceError::Conflict("Email is already used by another doctor".to_string())
                }
                RepositoryError::Conflict { field } if field == "phone_no" => {
                    DoctorServiceError::Conflict(
                        "Phone number is already used by another doctor".to_string(),
                    )
                }
                other => self.map_repo_error(other),
            })?;

        info!("Updated doctor {}", record.id);
        log_account_change(AuthEventType::ProfileUpdate, record.id);
        Ok(conversions::convert_to_domain_doctor(record))
    }

    async fn delete(&self, id: i64) -> Result<DeletedDoctor, DoctorServiceError> {
        Self::require_id(id)?;
        let doctor = self.existing(id).await?;

        let dependents = self
            .repository
            .count_dependents(id)
            .await
            .map_err(|e| self.map_repo_error(e))?;
        let blocked = || {
            DoctorServiceError::Conflict(format!(
                "Cannot delete doctor {} as they have {} screening records. \
                 Please transfer or delete the records first.",
                doctor.doctor_name, dependents
            ))
        };
        if dependents > 0 {
            return Err(blocked());
        }

        let removed = self.repository.delete(id).await.map_err(|e| match e {
            RepositoryError::Conflict { .. } => blocked(),
            other => self.map_repo_error(other),
        })?;
        if !removed {
            return Err(DoctorServiceError::NotFound("Doctor not found".to_string()));
        }

        info!("Deleted doctor {}", id);
        log_account_change(AuthEventType::AccountDeletion, id);
        Ok(DeletedDoctor {
            doctor_id: id,
            doctor_name: doctor.doctor_name,
        })
    }

    async fn list_with_activity(
        &self,
        term: Option<String>,
        hospital_type: Option<String>,
    ) -> Result<Vec<DoctorListing>, DoctorServiceError> {
        let search = DoctorSearch {
            term: non_blank(term),
            hospital_type: non_blank(hospital_type),
        };
        let active_since = format_timestamp(self.clock.now() - Duration::days(ACTIVE_WINDOW_DAYS));

        let rows = self
            .repository
            .list_with_activity(&search, &active_since)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(rows
            .into_iter()
            .map(conversions::convert_to_domain_listing)
            .collect())
    }

    async fn list_summaries(&self) -> Result<Vec<DoctorSummary>, DoctorServiceError> {
        let doctors = self
            .repository
            .list_brief()
            .await
            .map_err(|e| self.map_repo_error(e))?;
        Ok(doctors
            .into_iter()
            .map(conversions::convert_to_domain_summary)
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Doctor>, DoctorServiceError> {
        let doctors = self
            .repository
            .list_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;
        Ok(doctors
            .into_iter()
            .map(conversions::convert_to_domain_doctor)
            .collect())
    }

    async fn detail(&self, id: i64) -> Result<DoctorDetail, DoctorServiceError> {
        Self::require_id(id)?;
        let doctor = self.existing(id).await?;

        let summary = self
            .repository
            .screening_summary(id)
            .await
            .map_err(|e| self.map_repo_error(e))?;
        let recent = self
            .repository
            .recent_screenings(id, RECENT_SCREENINGS)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(conversions::convert_to_domain_detail(doctor, summary, recent))
    }

    async fn profile(&self, id: i64) -> Result<Doctor, DoctorServiceError> {
        if id <= 0 {
            return Err(DoctorServiceError::ValidationError(
                "Invalid doctor ID".to_string(),
            ));
        }
        let doctor = self.existing(id).await?;
        Ok(conversions::convert_to_domain_doctor(doctor))
    }
}

/// Create a doctor service backed by the SQLite repository
pub fn create_default_doctor_service(
    pool: DatabasePool,
    clock: Arc<dyn Clock>,
    bcrypt_cost: u32,
) -> impl DoctorServiceTrait {
    DoctorService::new(DoctorRepository::new(pool), clock, bcrypt_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::services::mock_repositories::MockDoctorRepo;
    use chrono::{TimeZone, Utc};
    use dhadkan_data::models::{DoctorRecord, ScreeningSummary};

    fn service(repo: MockDoctorRepo) -> DoctorService<MockDoctorRepo> {
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
        DoctorService::new(repo, Arc::new(FixedClock(now)), 4)
    }

    fn record(id: i64) -> DoctorRecord {
        DoctorRecord {
            id,
            doctor_name: "A. Singh".to_string(),
            hospital_type: Some("Government".to_string()),
            hospital_name: Some("District Hospital".to_string()),
            phone_no: "9876543210".to_string(),
            experience: 5,
            email: "a@x.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            created_at: "2025-03-12 10:00:00".to_string(),
            updated_at: "2025-03-12 10:00:00".to_string(),
        }
    }

    fn registration() -> DoctorRegistration {
        DoctorRegistration {
            doctor_name: "A. Singh".to_string(),
            hospital_type: None,
            hospital_name: None,
            phone_no: "9876543210".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            experience: 0,
        }
    }

    #[test]
    fn test_validate_registration_phone() {
        let service = service(MockDoctorRepo::new());

        let mut short = registration();
        short.phone_no = "98765".to_string();
        let err = service.validate_registration(&short).unwrap_err();
        assert!(err.to_string().contains("10 digits"));

        let mut letters = registration();
        letters.phone_no = "98765abcde".to_string();
        assert!(service.validate_registration(&letters).is_err());

        assert!(service.validate_registration(&registration()).is_ok());
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_stamps_time() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|doctor: &NewDoctor| {
                doctor.password_hash != "secret1"
                    && doctor.password_hash.starts_with("$2")
                    && doctor.created_at == "2025-03-12 10:00:00"
            })
            .returning(|doctor| {
                let mut created = record(7);
                created.email = doctor.email;
                Ok(created)
            });

        let doctor = service(repo).register(registration()).await.unwrap();
        assert_eq!(doctor.id, 7);
        assert_eq!(doctor.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_email().returning(|_| Ok(Some(record(1))));
        repo.expect_create().never();

        let err = service(repo).register(registration()).await.unwrap_err();
        assert!(matches!(err, DoctorServiceError::Conflict(_)));
        assert_eq!(err.to_string(), "Doctor with this email already exists");
    }

    #[tokio::test]
    async fn test_register_duplicate_phone_conflicts() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|_| {
            Err(RepositoryError::Conflict {
                field: "phone_no".to_string(),
            })
        });

        let err = service(repo).register(registration()).await.unwrap_err();
        assert_eq!(err.to_string(), "Doctor with this phone number already exists");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_change_set() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(record(id))));
        repo.expect_update().never();

        let update = DoctorUpdate {
            id: 3,
            doctor_name: Some("   ".to_string()),
            ..Default::default()
        };
        let err = service(repo).update(update).await.unwrap_err();
        assert_eq!(err.to_string(), "No fields to update");
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_doctor() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(record(id))));
        repo.expect_email_in_use().returning(|_, _| Ok(true));

        let update = DoctorUpdate {
            id: 3,
            email: Some("b@x.com".to_string()),
            ..Default::default()
        };
        let err = service(repo).update(update).await.unwrap_err();
        assert!(matches!(err, DoctorServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_doctor() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let update = DoctorUpdate {
            id: 99,
            experience: Some(3),
            ..Default::default()
        };
        let err = service(repo).update(update).await.unwrap_err();
        assert!(matches!(err, DoctorServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_writes_present_fields() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(record(id))));
        repo.expect_update()
            .withf(|id, changes, updated_at| {
                *id == 3
                    && changes.experience == Some(9)
                    && changes.doctor_name.is_none()
                    && changes.password_hash.is_none()
                    && updated_at == "2025-03-12 10:00:00"
            })
            .returning(|id, _, _| {
                let mut updated = record(id);
                updated.experience = 9;
                Ok(updated)
            });

        let update = DoctorUpdate {
            id: 3,
            experience: Some(9),
            ..Default::default()
        };
        let doctor = service(repo).update(update).await.unwrap();
        assert_eq!(doctor.experience, 9);
    }

    #[tokio::test]
    async fn test_update_validates_experience() {
        let update = DoctorUpdate {
            id: 3,
            experience: Some(60),
            ..Default::default()
        };
        let err = service(MockDoctorRepo::new()).update(update).await.unwrap_err();
        assert!(matches!(err, DoctorServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_screenings() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(record(id))));
        repo.expect_count_dependents().returning(|_| Ok(4));
        repo.expect_delete().never();

        let err = service(repo).delete(2).await.unwrap_err();
        assert!(matches!(err, DoctorServiceError::Conflict(_)));
        assert!(err.to_string().contains("4 screening records"));
        assert!(err.to_string().contains("A. Singh"));
    }

    #[tokio::test]
    async fn test_delete_rejects_bad_id() {
        let err = service(MockDoctorRepo::new()).delete(0).await.unwrap_err();
        assert_eq!(err.to_string(), "Valid doctor ID is required");
    }

    #[tokio::test]
    async fn test_delete_returns_name() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(record(id))));
        repo.expect_count_dependents().returning(|_| Ok(0));
        repo.expect_delete().returning(|_| Ok(true));

        let deleted = service(repo).delete(2).await.unwrap();
        assert_eq!(deleted.doctor_id, 2);
        assert_eq!(deleted.doctor_name, "A. Singh");
    }

    #[tokio::test]
    async fn test_listing_uses_thirty_day_window() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_list_with_activity()
            .withf(|search, since| {
                search.term.as_deref() == Some("singh")
                    && search.hospital_type.is_none()
                    && since == "2025-02-10 10:00:00"
            })
            .returning(|_, _| Ok(vec![]));

        let listing = service(repo)
            .list_with_activity(Some(" singh ".to_string()), Some(String::new()))
            .await
            .unwrap();
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn test_detail_never_screened() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(record(id))));
        repo.expect_screening_summary()
            .returning(|_| Ok(ScreeningSummary::default()));
        repo.expect_recent_screenings()
            .withf(|_, limit| *limit == 10)
            .returning(|_, _| Ok(vec![]));

        let detail = service(repo).detail(5).await.unwrap();
        assert_eq!(detail.total_screenings, 0);
        assert_eq!(detail.last_screening, crate::clock::NEVER);
    }

    #[tokio::test]
    async fn test_profile_unknown_doctor() {
        let mut repo = MockDoctorRepo::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let err = service(repo).profile(5).await.unwrap_err();
        assert_eq!(err.to_string(), "Doctor not found");
    }
}
