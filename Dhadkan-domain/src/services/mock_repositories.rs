//! mockall doubles for the repository traits

use async_trait::async_trait;
use mockall::mock;

use dhadkan_data::models::{
    AdminRecord, AgeCount, ChildDetailRow, DoctorActivityRow, DoctorBrief, DoctorChanges,
    DoctorChildrenCount, DoctorRecord, DoctorScreeningTotals, DoctorSearch, DoctorStaffCount,
    HospitalActivity, HospitalTypeCount, NewAdmin, NewDoctor, NewScreening, OutcomeCount,
    RecentChildRow, RecentScreeningRow, RegistrationMonth, ReportFilter, ReportWindows,
    ScreeningRow, ScreeningSummary, ScreeningTable, TableCounts, TableSummary, WeekdayCount,
};
use dhadkan_data::repository::{
    AdminRepositoryTrait, DoctorRepositoryTrait, ReportRepositoryTrait, RepositoryError,
    ScreeningRepositoryTrait,
};

mock! {
    pub DoctorRepo {}

    #[async_trait]
    impl DoctorRepositoryTrait for DoctorRepo {
        async fn create(&self, doctor: NewDoctor) -> Result<DoctorRecord, RepositoryError>;
        async fn get_by_id(&self, id: i64) -> Result<Option<DoctorRecord>, RepositoryError>;
        async fn get_by_email(&self, email: &str) -> Result<Option<DoctorRecord>, RepositoryError>;
        async fn email_in_use(&self, email: &str, exclude_id: i64) -> Result<bool, RepositoryError>;
        async fn update(
            &self,
            id: i64,
            changes: DoctorChanges,
            updated_at: &str,
        ) -> Result<DoctorRecord, RepositoryError>;
        async fn count_dependents(&self, id: i64) -> Result<i64, RepositoryError>;
        async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
        async fn list_with_activity(
            &self,
            search: &DoctorSearch,
            active_since: &str,
        ) -> Result<Vec<DoctorActivityRow>, RepositoryError>;
        async fn list_brief(&self) -> Result<Vec<DoctorBrief>, RepositoryError>;
        async fn list_all(&self) -> Result<Vec<DoctorRecord>, RepositoryError>;
        async fn screening_summary(&self, id: i64) -> Result<ScreeningSummary, RepositoryError>;
        async fn recent_screenings(
            &self,
            id: i64,
            limit: i64,
        ) -> Result<Vec<RecentScreeningRow>, RepositoryError>;
    }
}

mock! {
    pub AdminRepo {}

    #[async_trait]
    impl AdminRepositoryTrait for AdminRepo {
        async fn get_by_email(&self, email: &str) -> Result<Option<AdminRecord>, RepositoryError>;
        async fn create(&self, admin: NewAdmin) -> Result<AdminRecord, RepositoryError>;
    }
}

mock! {
    pub ScreeningRepo {}

    #[async_trait]
    impl ScreeningRepositoryTrait for ScreeningRepo {
        async fn insert(&self, table: ScreeningTable, screening: NewScreening) -> Result<i64, RepositoryError>;
        async fn list_children(
            &self,
            filter: &ReportFilter,
            limit: i64,
            offset: i64,
        ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError>;
        async fn list_staff(
            &self,
            filter: &ReportFilter,
            limit: i64,
            offset: i64,
        ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError>;
        async fn get_child(&self, id: i64) -> Result<Option<ChildDetailRow>, RepositoryError>;
    }
}

mock! {
    pub ReportRepo {}

    #[async_trait]
    impl ReportRepositoryTrait for ReportRepo {
        async fn table_counts(
            &self,
            table: ScreeningTable,
            windows: &ReportWindows,
            doctor_id: Option<i64>,
        ) -> Result<TableCounts, RepositoryError>;
        async fn total_doctors(&self) -> Result<i64, RepositoryError>;
        async fn active_doctors(&self, since: &str) -> Result<i64, RepositoryError>;
        async fn gender_breakdown(&self) -> Result<Vec<OutcomeCount>, RepositoryError>;
        async fn children_by_age(&self) -> Result<Vec<AgeCount>, RepositoryError>;
        async fn monthly_outcomes(
            &self,
            tables: &[ScreeningTable],
            since: &str,
        ) -> Result<Vec<OutcomeCount>, RepositoryError>;
        async fn top_doctors(
            &self,
            tables: &[ScreeningTable],
            limit: i64,
        ) -> Result<Vec<DoctorScreeningTotals>, RepositoryError>;
        async fn recent_children(&self, limit: i64) -> Result<Vec<RecentChildRow>, RepositoryError>;
        async fn average_child_age(&self) -> Result<Option<f64>, RepositoryError>;
        async fn most_active_hospital(&self) -> Result<Option<HospitalActivity>, RepositoryError>;
        async fn children_by_weekday(&self, since: &str) -> Result<Vec<WeekdayCount>, RepositoryError>;
        async fn table_summary(&self, table: ScreeningTable) -> Result<TableSummary, RepositoryError>;
        async fn children_per_doctor(&self) -> Result<Vec<DoctorChildrenCount>, RepositoryError>;
        async fn staff_per_doctor(&self) -> Result<Vec<DoctorStaffCount>, RepositoryError>;
        async fn hospital_types(&self) -> Result<Vec<HospitalTypeCount>, RepositoryError>;
        async fn average_experience(&self) -> Result<Option<f64>, RepositoryError>;
        async fn recent_registrations(&self, limit: i64) -> Result<Vec<DoctorRecord>, RepositoryError>;
        async fn registration_trend(&self, since: &str) -> Result<Vec<RegistrationMonth>, RepositoryError>;
    }
}
