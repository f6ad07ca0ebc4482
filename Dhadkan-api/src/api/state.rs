use std::sync::Arc;
use std::time::Instant;

use dhadkan_domain::clock::{Clock, OffsetClock};
use dhadkan_domain::database::DatabasePool;
use dhadkan_domain::health::{DatabaseHealthService, HealthServiceTrait};
use dhadkan_domain::services::{
    create_default_auth_service, create_default_doctor_service, create_default_report_service,
    create_default_screening_service, AuthServiceTrait, DoctorServiceTrait, PhotoStore,
    ReportServiceTrait, ScreeningServiceTrait,
};

use crate::config::AppConfig;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub doctors: Arc<dyn DoctorServiceTrait>,
    pub auth: Arc<dyn AuthServiceTrait>,
    pub screenings: Arc<dyn ScreeningServiceTrait>,
    pub reports: Arc<dyn ReportServiceTrait>,
    pub health: Arc<dyn HealthServiceTrait>,
    /// Reported by the health check
    pub environment: String,
    pub started_at: Instant,
}

impl AppState {
    /// Wire the default services onto one connection pool
    pub fn new(pool: DatabasePool, config: &AppConfig) -> Self {
        let photos = PhotoStore::new(&config.upload_dir);
        let clock: Arc<dyn Clock> = Arc::new(OffsetClock::new(config.utc_offset_minutes));

        Self {
            doctors: Arc::new(create_default_doctor_service(
                pool.clone(),
                clock.clone(),
                config.bcrypt_cost,
            )),
            auth: Arc::new(create_default_auth_service(pool.clone())),
            screenings: Arc::new(create_default_screening_service(
                pool.clone(),
                photos,
                clock.clone(),
            )),
            reports: Arc::new(create_default_report_service(pool.clone(), clock)),
            health: Arc::new(DatabaseHealthService::new(pool)),
            environment: config.environment.clone(),
            started_at: Instant::now(),
        }
    }

    /// Replace the health service, e.g. with a scripted one in tests
    pub fn with_health_service(mut self, health: Arc<dyn HealthServiceTrait>) -> Self {
        self.health = health;
        self
    }
}
