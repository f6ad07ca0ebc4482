use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Auth endpoints
        crate::api::handlers::auth::login,

        // Doctor management endpoints
        crate::api::handlers::doctors::add_doctor,
        crate::api::handlers::doctors::get_doctors,
        crate::api::handlers::doctors::create_doctor,
        crate::api::handlers::doctors::update_doctor,
        crate::api::handlers::doctors::delete_doctor,

        // Screening intake endpoints
        crate::api::handlers::screening::add_child_report,
        crate::api::handlers::screening::add_teacher_emp_report,

        // Reporting endpoints
        crate::api::handlers::reports::get_reports,
        crate::api::handlers::reports::admin_dashboard,

        // Doctor portal endpoints
        crate::api::handlers::doctor_portal::doctor_portal,
        crate::api::handlers::doctor_portal::doctor_portal_submit,
        crate::api::handlers::doctor_portal::doctor_profile
    ),
    components(
        schemas(
            // Request entities
            crate::entities::auth::PublicLoginRequest,
            crate::entities::doctor::PublicDoctorRequest,
            crate::entities::doctor::PublicDoctorUpdateRequest,
            crate::entities::screening::PublicScreeningRequest,

            // Envelopes
            crate::entities::common::PublicErrorResponse,
            crate::entities::common::PublicTimestamp,
            crate::entities::common::DoctorResponse,
            crate::entities::common::DoctorDetailResponse,
            crate::entities::common::DeletedDoctorResponse,
            crate::entities::common::LoginResponse,
            crate::entities::common::ReceiptResponse,
            crate::entities::common::ChildReportResponse,
            crate::entities::common::DashboardResponse,
            crate::entities::common::ChildrenStatisticsResponse,
            crate::entities::common::StaffStatisticsResponse,
            crate::entities::common::ManagementStatsResponse,
            crate::entities::common::PortalStatsResponse,
            crate::entities::common::DoctorProfileResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain entities
            dhadkan_domain::entities::Gender,
            dhadkan_domain::entities::HeartStatus,
            dhadkan_domain::entities::YesNo,
            dhadkan_domain::entities::Category,
            dhadkan_domain::entities::auth::UserType,
            dhadkan_domain::entities::auth::DoctorUser,
            dhadkan_domain::entities::auth::AdminUser,
            dhadkan_domain::entities::auth::LoginUser,
            dhadkan_domain::entities::auth::LoginSession,
            dhadkan_domain::entities::doctor::Doctor,
            dhadkan_domain::entities::doctor::DoctorListing,
            dhadkan_domain::entities::doctor::DoctorSummary,
            dhadkan_domain::entities::doctor::DoctorDetail,
            dhadkan_domain::entities::doctor::RecentScreening,
            dhadkan_domain::entities::doctor::DeletedDoctor,
            dhadkan_domain::entities::screening::PhotoUpload,
            dhadkan_domain::entities::screening::ScreeningReceipt,
            dhadkan_domain::entities::screening::ScreeningEntry,
            dhadkan_domain::entities::screening::DoctorInfo,
            dhadkan_domain::entities::screening::ChildReport,
            dhadkan_domain::entities::screening::Pagination,
            dhadkan_domain::entities::report::AdminDashboard,
            dhadkan_domain::entities::report::GenderStat,
            dhadkan_domain::entities::report::AgeGroupStat,
            dhadkan_domain::entities::report::MonthlyTrend,
            dhadkan_domain::entities::report::TopDoctor,
            dhadkan_domain::entities::report::RecentChild,
            dhadkan_domain::entities::report::HospitalStat,
            dhadkan_domain::entities::report::DayStat,
            dhadkan_domain::entities::report::ChildrenStatistics,
            dhadkan_domain::entities::report::ChildrenStats,
            dhadkan_domain::entities::report::DoctorChildrenStat,
            dhadkan_domain::entities::report::ScreeningTrend,
            dhadkan_domain::entities::report::StaffStatistics,
            dhadkan_domain::entities::report::StaffStats,
            dhadkan_domain::entities::report::DoctorStaffStat,
            dhadkan_domain::entities::report::DoctorPortalStats,
            dhadkan_domain::entities::report::DoctorProfile,
            dhadkan_domain::entities::report::DoctorManagementStats,
            dhadkan_domain::entities::report::HospitalTypeStat,
            dhadkan_domain::entities::report::RecentDoctor,
            dhadkan_domain::entities::report::RegistrationTrend
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Doctor and administrator login"),
        (name = "doctors", description = "Doctor registration and management"),
        (name = "screening", description = "Screening form intake"),
        (name = "reports", description = "Listings, statistics and the admin dashboard"),
        (name = "doctor portal", description = "Endpoints used by the doctor app")
    ),
    info(
        title = "Dhadkan API",
        version = "0.1.0",
        description = "Heart screening records for children, teachers and employees",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
