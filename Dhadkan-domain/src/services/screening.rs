use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use super::photos::{PhotoError, PhotoKind, PhotoStore};
use crate::clock::Clock;
use crate::entities::conversions;
use crate::entities::screening::{
    ChildReport, ListingQuery, Pagination, ScreeningForm, ScreeningPage, ScreeningReceipt,
    ValidScreening,
};
use crate::entities::values::{is_ten_digits, lenient_i64, Category, Gender, HeartStatus, YesNo};
use dhadkan_data::database::DatabasePool;
use dhadkan_data::models::{ReportFilter, ScreeningRow};
use dhadkan_data::repository::{
    DoctorRepository, DoctorRepositoryTrait, RepositoryError, ScreeningRepository,
    ScreeningRepositoryTrait,
};

/// Listing page size bounds
pub const MAX_PAGE_SIZE: i64 = 100;

/// Screening service errors
#[derive(Debug, Error)]
pub enum ScreeningServiceError {
    /// Form failed intake checks
    #[error("{0}")]
    ValidationError(String),

    /// Malformed listing or lookup parameters
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    RepositoryError(String),

    #[error("{0}")]
    StorageError(String),
}

impl From<PhotoError> for ScreeningServiceError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::InvalidData(_) => ScreeningServiceError::ValidationError(err.to_string()),
            PhotoError::Io(_) => {
                error!("Photo storage failed: {}", err);
                ScreeningServiceError::StorageError(err.to_string())
            }
        }
    }
}

/// Trait for screening intake and listings
#[async_trait]
pub trait ScreeningServiceTrait: Send + Sync {
    /// Intake checks for a form of `category`, in the order clients rely on
    fn validate_form(
        &self,
        category: Category,
        form: &ScreeningForm,
    ) -> Result<ValidScreening, ScreeningServiceError>;

    /// Validate, store photos and insert one screening
    async fn submit(
        &self,
        category: Category,
        form: ScreeningForm,
    ) -> Result<ScreeningReceipt, ScreeningServiceError>;

    /// Page of children, newest first
    async fn list_children(&self, query: ListingQuery) -> Result<ScreeningPage, ScreeningServiceError>;

    /// Page of teachers and employees, newest first
    async fn list_staff(&self, query: ListingQuery) -> Result<ScreeningPage, ScreeningServiceError>;

    /// One child with the doctor's contact details
    async fn child_report(&self, id: i64) -> Result<ChildReport, ScreeningServiceError>;
}

/// Screening service for domain logic
pub struct ScreeningService<S: ScreeningRepositoryTrait, D: DoctorRepositoryTrait> {
    screenings: S,
    doctors: D,
    photos: PhotoStore,
    clock: Arc<dyn Clock>,
}

impl<S: ScreeningRepositoryTrait, D: DoctorRepositoryTrait> ScreeningService<S, D> {
    pub fn new(screenings: S, doctors: D, photos: PhotoStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            screenings,
            doctors,
            photos,
            clock,
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ScreeningServiceError {
        match err {
            RepositoryError::NotFound(msg) => ScreeningServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => ScreeningServiceError::ValidationError(msg),
            RepositoryError::Conflict { field } if field.ends_with("mobile_no") => {
                ScreeningServiceError::Conflict("Mobile number already exists".to_string())
            }
            RepositoryError::Conflict { .. } => {
                ScreeningServiceError::ValidationError("Doctor not found".to_string())
            }
            _ => {
                error!("Screening repository failure: {}", err);
                ScreeningServiceError::RepositoryError(err.to_string())
            }
        }
    }

    async fn store_photos(
        &self,
        category: Category,
        form: &ScreeningForm,
    ) -> Result<(Option<String>, Option<String>), ScreeningServiceError> {
        let mut stored = (None, None);
        if let Some(upload) = form.aadhar_photo.as_ref().filter(|p| !p.data.is_empty()) {
            stored.0 = Some(self.photos.save(category, PhotoKind::Aadhar, upload).await?);
        }
        if let Some(upload) = form.shramik_photo.as_ref().filter(|p| !p.data.is_empty()) {
            match self.photos.save(category, PhotoKind::Shramik, upload).await {
                Ok(path) => stored.1 = Some(path),
                Err(e) => {
                    if let Some(aadhar) = stored.0.as_deref() {
                        self.photos.discard(&[aadhar]).await;
                    }
                    return Err(e.into());
                }
            }
        }
        Ok(stored)
    }

    fn page(
        &self,
        query: &ListingQuery,
        rows: Vec<ScreeningRow>,
        total: i64,
        limit: i64,
    ) -> ScreeningPage {
        ScreeningPage {
            entries: rows
                .into_iter()
                .map(conversions::convert_to_domain_entry)
                .collect(),
            pagination: Pagination::new(query.page.max(1), limit, total),
        }
    }
}

/// Limit clamped to `1..=MAX_PAGE_SIZE` and the matching offset
pub fn page_window(page: i64, limit: i64) -> (i64, i64) {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    (limit, (page - 1).saturating_mul(limit))
}

fn listing_filter(query: &ListingQuery) -> ReportFilter {
    let non_blank = |value: &Option<String>| {
        value
            .as_ref()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    ReportFilter {
        search: non_blank(&query.search),
        heart_status: non_blank(&query.heart_status),
        doctor_id: query.doctor_id.filter(|id| *id > 0),
        staff_table: query.staff_type.map(|category| category.table()),
    }
}

fn missing(field: &str) -> ScreeningServiceError {
    ScreeningServiceError::ValidationError(format!("Missing required field: {}", field))
}

fn required_text(value: &Option<String>, field: &str) -> Result<String, ScreeningServiceError> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

fn required_value<'a>(value: &'a Option<Value>, field: &str) -> Result<&'a Value, ScreeningServiceError> {
    match value {
        None | Some(Value::Null) => Err(missing(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(missing(field)),
        Some(v) => Ok(v),
    }
}

fn invalid(message: &str) -> ScreeningServiceError {
    ScreeningServiceError::ValidationError(message.to_string())
}

#[async_trait]
impl<S, D> ScreeningServiceTrait for ScreeningService<S, D>
where
    S: ScreeningRepositoryTrait + Send + Sync,
    D: DoctorRepositoryTrait + Send + Sync,
{
    fn validate_form(
        &self,
        category: Category,
        form: &ScreeningForm,
    ) -> Result<ValidScreening, ScreeningServiceError> {
        let name = required_text(&form.name, "name")?;
        let age = required_value(&form.age, "age")?;
        let gender = required_text(&form.gender, "gender")?;
        let father_name = match category {
            Category::Child => Some(required_text(&form.father_name, "fatherName")?),
            _ => None,
        };
        let mobile_no = required_text(&form.mobile_no, "mobileNo")?;
        let school_name = required_text(&form.school_name, "schoolName")?;
        let heart_status = required_text(&form.heart_status, "heartStatus")?;
        let doctor_id = required_value(&form.doctor_id, "dr_id")?;
        let have_aadhar = required_text(&form.have_aadhar, "haveAadhar")?;
        let have_shramik = required_text(&form.have_shramik, "haveShramik")?;

        let gender = Gender::parse(&gender).ok_or_else(|| invalid("Invalid gender value"))?;
        let heart_status = HeartStatus::parse(&heart_status)
            .ok_or_else(|| invalid("Invalid heart status value"))?;
        let have_aadhar = YesNo::parse(&have_aadhar)
            .ok_or_else(|| invalid("Invalid aadhar availability value"))?;
        let have_shramik = YesNo::parse(&have_shramik)
            .ok_or_else(|| invalid("Invalid shramik availability value"))?;

        let age = lenient_i64(age)
            .filter(|age| (1..=100).contains(age))
            .ok_or_else(|| invalid("Invalid age value"))?;

        if !is_ten_digits(&mobile_no) {
            return Err(invalid("Invalid mobile number format"));
        }

        let doctor_id = lenient_i64(doctor_id)
            .filter(|id| *id > 0)
            .ok_or_else(|| invalid("Invalid doctor ID"))?;

        let notes = form
            .notes
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(ValidScreening {
            category,
            doctor_id,
            name,
            age,
            gender,
            father_name,
            mobile_no,
            school_name,
            heart_status,
            have_aadhar,
            have_shramik,
            notes,
        })
    }

    async fn submit(
        &self,
        category: Category,
        form: ScreeningForm,
    ) -> Result<ScreeningReceipt, ScreeningServiceError> {
        let screening = self.validate_form(category, &form).map_err(|e| {
            warn!("Rejected {} screening: {}", category.as_str(), e);
            e
        })?;

        let doctor = self
            .doctors
            .get_by_id(screening.doctor_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;
        if doctor.is_none() {
            warn!("Screening references unknown doctor {}", screening.doctor_id);
            return Err(invalid("Doctor not found"));
        }

        let (aadhar_photo, shramik_photo) = self.store_photos(category, &form).await?;
        let stored: Vec<String> = aadhar_photo
            .iter()
            .chain(shramik_photo.iter())
            .cloned()
            .collect();
        let row = conversions::convert_to_data_screening(
            &screening,
            aadhar_photo,
            shramik_photo,
            self.clock.timestamp(),
        );

        let id = match self.screenings.insert(category.table(), row).await {
            Ok(id) => id,
            Err(e) => {
                if !stored.is_empty() {
                    warn!("Insert failed, discarding {} stored photo(s)", stored.len());
                    let paths: Vec<&str> = stored.iter().map(String::as_str).collect();
                    self.photos.discard(&paths).await;
                }
                return Err(self.map_repo_error(e));
            }
        };

        info!("Stored {} screening {} by doctor {}", category.as_str(), id, screening.doctor_id);
        Ok(ScreeningReceipt {
            id,
            name: screening.name,
            age: screening.age,
            gender: screening.gender,
            mobile_no: screening.mobile_no,
            school_name: screening.school_name,
            heart_status: screening.heart_status,
            category,
        })
    }

    async fn list_children(&self, query: ListingQuery) -> Result<ScreeningPage, ScreeningServiceError> {
        let (limit, offset) = page_window(query.page, query.limit);
        let filter = ReportFilter {
            staff_table: None,
            ..listing_filter(&query)
        };

        let (rows, total) = self
            .screenings
            .list_children(&filter, limit, offset)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(self.page(&query, rows, total, limit))
    }

    async fn list_staff(&self, query: ListingQuery) -> Result<ScreeningPage, ScreeningServiceError> {
        if query.staff_type == Some(Category::Child) {
            return Err(ScreeningServiceError::InvalidRequest(
                "Invalid staff type".to_string(),
            ));
        }
        let (limit, offset) = page_window(query.page, query.limit);
        let filter = listing_filter(&query);

        let (rows, total) = self
            .screenings
            .list_staff(&filter, limit, offset)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(self.page(&query, rows, total, limit))
    }

    async fn child_report(&self, id: i64) -> Result<ChildReport, ScreeningServiceError> {
        if id <= 0 {
            return Err(ScreeningServiceError::InvalidRequest(
                "Valid child ID is required".to_string(),
            ));
        }

        let detail = self
            .screenings
            .get_child(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| ScreeningServiceError::NotFound("Child report not found".to_string()))?;

        Ok(conversions::convert_to_domain_child_report(detail))
    }
}

/// Create a screening service backed by the SQLite repositories
pub fn create_default_screening_service(
    pool: DatabasePool,
    photos: PhotoStore,
    clock: Arc<dyn Clock>,
) -> impl ScreeningServiceTrait {
    ScreeningService::new(
        ScreeningRepository::new(pool.clone()),
        DoctorRepository::new(pool),
        photos,
        clock,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::entities::screening::PhotoUpload;
    use crate::services::mock_repositories::{MockDoctorRepo, MockScreeningRepo};
    use chrono::{TimeZone, Utc};
    use dhadkan_data::models::{DoctorRecord, NewScreening, ScreeningTable};
    use serde_json::json;

    fn service(
        screenings: MockScreeningRepo,
        doctors: MockDoctorRepo,
    ) -> ScreeningService<MockScreeningRepo, MockDoctorRepo> {
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
        ScreeningService::new(
            screenings,
            doctors,
            PhotoStore::new(std::env::temp_dir().join("dhadkan-screening-tests")),
            Arc::new(FixedClock(now)),
        )
    }

    fn child_form() -> ScreeningForm {
        serde_json::from_value(json!({
            "name": "Asha",
            "age": "9",
            "gender": "महिला",
            "fatherName": "Ramesh",
            "mobileNo": "9876543210",
            "schoolName": "Govt School",
            "heartStatus": "संदिग्ध",
            "dr_id": 3,
            "haveAadhar": "yes",
            "haveShramik": "no"
        }))
        .unwrap()
    }

    fn doctor(id: i64) -> DoctorRecord {
        DoctorRecord {
            id,
            doctor_name: "A. Singh".to_string(),
            hospital_type: None,
            hospital_name: None,
            phone_no: "9876543210".to_string(),
            experience: 1,
            email: "a@x.com".to_string(),
            password_hash: "x".to_string(),
            created_at: "2025-01-01 00:00:00".to_string(),
            updated_at: "2025-01-01 00:00:00".to_string(),
        }
    }

    fn validate(category: Category, form: &ScreeningForm) -> Result<ValidScreening, ScreeningServiceError> {
        service(MockScreeningRepo::new(), MockDoctorRepo::new()).validate_form(category, form)
    }

    #[test]
    fn test_valid_child_form() {
        let valid = validate(Category::Child, &child_form()).unwrap();
        assert_eq!(valid.age, 9);
        assert_eq!(valid.doctor_id, 3);
        assert_eq!(valid.gender, Gender::Female);
        assert_eq!(valid.father_name.as_deref(), Some("Ramesh"));
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut form = child_form();
        form.father_name = Some(String::new());
        let err = validate(Category::Child, &form).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: fatherName");

        // staff forms do not need a father name
        assert!(validate(Category::Teacher, &form).unwrap().father_name.is_none());

        let mut form = child_form();
        form.doctor_id = None;
        let err = validate(Category::Child, &form).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: dr_id");
    }

    #[test]
    fn test_enum_and_range_checks() {
        let cases: Vec<(fn(&mut ScreeningForm), &str)> = vec![
            (|f| f.gender = Some("male".to_string()), "Invalid gender value"),
            (|f| f.heart_status = Some("ok".to_string()), "Invalid heart status value"),
            (|f| f.have_aadhar = Some("y".to_string()), "Invalid aadhar availability value"),
            (|f| f.have_shramik = Some("n".to_string()), "Invalid shramik availability value"),
            (|f| f.age = Some(json!(0)), "Invalid age value"),
            (|f| f.age = Some(json!("101")), "Invalid age value"),
            (|f| f.age = Some(json!("nine")), "Invalid age value"),
            (|f| f.mobile_no = Some("98765".to_string()), "Invalid mobile number format"),
            (|f| f.doctor_id = Some(json!("abc")), "Invalid doctor ID"),
        ];

        for (mutate, expected) in cases {
            let mut form = child_form();
            mutate(&mut form);
            let err = validate(Category::Child, &form).unwrap_err();
            assert!(matches!(err, ScreeningServiceError::ValidationError(_)));
            assert_eq!(err.to_string(), expected);
        }
    }

    #[tokio::test]
    async fn test_submit_inserts_into_category_table() {
        let mut doctors = MockDoctorRepo::new();
        doctors.expect_get_by_id().returning(|id| Ok(Some(doctor(id))));
        let mut screenings = MockScreeningRepo::new();
        screenings
            .expect_insert()
            .withf(|table, row: &NewScreening| {
                *table == ScreeningTable::Employee
                    && row.father_name.is_none()
                    && row.created_at == "2025-03-12 10:00:00"
                    && row.heart_status == "संदिग्ध"
            })
            .returning(|_, _| Ok(11));

        let mut form = child_form();
        form.father_name = None;
        let receipt = service(screenings, doctors)
            .submit(Category::Employee, form)
            .await
            .unwrap();

        assert_eq!(receipt.id, 11);
        assert_eq!(receipt.category, Category::Employee);
    }

    #[tokio::test]
    async fn test_submit_unknown_doctor() {
        let mut doctors = MockDoctorRepo::new();
        doctors.expect_get_by_id().returning(|_| Ok(None));
        let mut screenings = MockScreeningRepo::new();
        screenings.expect_insert().never();

        let err = service(screenings, doctors)
            .submit(Category::Child, child_form())
            .await
            .unwrap_err();
        assert!(matches!(err, ScreeningServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_submit_duplicate_mobile() {
        let mut doctors = MockDoctorRepo::new();
        doctors.expect_get_by_id().returning(|id| Ok(Some(doctor(id))));
        let mut screenings = MockScreeningRepo::new();
        screenings.expect_insert().returning(|_, _| {
            Err(RepositoryError::Conflict {
                field: "t_mobile_no".to_string(),
            })
        });

        let err = service(screenings, doctors)
            .submit(Category::Teacher, child_form())
            .await
            .unwrap_err();
        assert!(matches!(err, ScreeningServiceError::Conflict(_)));
        assert_eq!(err.to_string(), "Mobile number already exists");
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_no_photos() {
        let mut doctors = MockDoctorRepo::new();
        doctors.expect_get_by_id().returning(|id| Ok(Some(doctor(id))));
        let mut screenings = MockScreeningRepo::new();
        screenings.expect_insert().returning(|_, _| {
            Err(RepositoryError::Conflict {
                field: "children.mobile_no".to_string(),
            })
        });

        let root = std::env::temp_dir().join(format!("dhadkan-orphans-{}", uuid::Uuid::new_v4()));
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
        let service = ScreeningService::new(
            screenings,
            doctors,
            PhotoStore::new(&root),
            Arc::new(FixedClock(now)),
        );

        let mut form = child_form();
        form.aadhar_photo = Some(PhotoUpload {
            name: Some("card.png".to_string()),
            data: "aGk=".to_string(),
        });
        form.shramik_photo = Some(PhotoUpload {
            name: Some("card.png".to_string()),
            data: "aGk=".to_string(),
        });

        let err = service.submit(Category::Child, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Mobile number already exists");

        for kind in ["child_aadhar", "child_shramik"] {
            let files = std::fs::read_dir(root.join(kind)).unwrap().count();
            assert_eq!(files, 0, "{} still holds photos", kind);
        }
        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 10), (10, 0));
        assert_eq!(page_window(3, 20), (20, 40));
        assert_eq!(page_window(0, 500), (100, 0));
        assert_eq!(page_window(-2, 0), (1, 0));
        assert_eq!(page_window(i64::MIN, 10), (10, 0));
    }

    #[test]
    fn test_page_window_saturates_on_huge_pages() {
        let (limit, offset) = page_window(i64::MAX, 100);
        assert_eq!(limit, 100);
        assert_eq!(offset, i64::MAX);
    }

    #[tokio::test]
    async fn test_children_listing_drops_blank_filters() {
        let mut screenings = MockScreeningRepo::new();
        screenings
            .expect_list_children()
            .withf(|filter, limit, offset| {
                filter.search.is_none()
                    && filter.heart_status.as_deref() == Some("संदिग्ध")
                    && filter.doctor_id.is_none()
                    && *limit == 10
                    && *offset == 10
            })
            .returning(|_, _, _| Ok((vec![], 21)));

        let query = ListingQuery {
            page: 2,
            limit: 10,
            search: Some("  ".to_string()),
            heart_status: Some("संदिग्ध".to_string()),
            doctor_id: Some(0),
            staff_type: None,
        };
        let page = service(screenings, MockDoctorRepo::new())
            .list_children(query)
            .await
            .unwrap();

        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_records, 21);
    }

    #[tokio::test]
    async fn test_child_report_lookup_errors() {
        let mut screenings = MockScreeningRepo::new();
        screenings.expect_get_child().returning(|_| Ok(None));
        let service = service(screenings, MockDoctorRepo::new());

        let err = service.child_report(0).await.unwrap_err();
        assert!(matches!(err, ScreeningServiceError::InvalidRequest(_)));

        let err = service.child_report(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Child report not found");
    }
}
