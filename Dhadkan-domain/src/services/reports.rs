use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::clock::{display_date, display_last, Clock};
use crate::entities::report::{
    month_name, percentage, report_windows, round_to, weekday_name, weekly_growth, AdminDashboard,
    AgeBucket, AgeGroupStat, ChildrenStatistics, ChildrenStats, DayStat, DoctorChildrenStat,
    DoctorManagementStats, DoctorPortalStats, DoctorStaffStat, GenderStat, HospitalStat,
    HospitalTypeStat, MonthlyTrend, RecentChild, RecentDoctor, RegistrationTrend, ScreeningTrend,
    StaffStatistics, StaffStats, TopDoctor,
};
use crate::entities::values::HeartStatus;
use dhadkan_data::database::DatabasePool;
use dhadkan_data::models::{AgeCount, DoctorScreeningTotals, ScreeningTable, TableCounts};
use dhadkan_data::repository::{ReportRepository, ReportRepositoryTrait, RepositoryError};

const TOP_DOCTORS: i64 = 5;
const RECENT_CHILDREN: i64 = 100;
const RECENT_REGISTRATIONS: i64 = 5;

/// Reporting errors
#[derive(Debug, Error)]
pub enum ReportServiceError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for ReportServiceError {
    fn from(err: RepositoryError) -> Self {
        error!("Report query failed: {}", err);
        ReportServiceError::RepositoryError(err.to_string())
    }
}

/// Trait for the dashboards and statistics
#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    /// Everything on the admin dashboard, computed on demand
    async fn admin_dashboard(&self) -> Result<AdminDashboard, ReportServiceError>;

    /// Children totals, per-doctor counts and the 6 month trend
    async fn children_statistics(&self) -> Result<ChildrenStatistics, ReportServiceError>;

    /// Teacher and employee totals with per-doctor counts
    async fn staff_statistics(&self) -> Result<StaffStatistics, ReportServiceError>;

    /// Counters shown to one doctor
    async fn doctor_portal_stats(&self, doctor_id: i64)
        -> Result<DoctorPortalStats, ReportServiceError>;

    /// Statistics of the doctor management screen
    async fn doctor_management_stats(&self) -> Result<DoctorManagementStats, ReportServiceError>;
}

/// Report service for domain logic
pub struct ReportService<R: ReportRepositoryTrait> {
    repository: R,
    clock: Arc<dyn Clock>,
}

impl<R: ReportRepositoryTrait> ReportService<R> {
    pub fn new(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

/// Fold exact ages into the fixed buckets, skipping empty ones
pub fn age_groups(ages: &[AgeCount]) -> Vec<AgeGroupStat> {
    AgeBucket::ORDER
        .iter()
        .filter_map(|bucket| {
            let (total, suspicious, healthy) = ages
                .iter()
                .filter(|a| AgeBucket::from_age(a.age) == *bucket)
                .fold((0, 0, 0), |acc, a| {
                    (acc.0 + a.total, acc.1 + a.suspicious, acc.2 + a.healthy)
                });
            (total > 0).then(|| AgeGroupStat {
                age_group: bucket.label().to_string(),
                total,
                suspicious,
                healthy,
                suspicious_percentage: percentage(suspicious, total, 2),
            })
        })
        .collect()
}

fn top_doctor(row: DoctorScreeningTotals, never_label: bool) -> TopDoctor {
    let last_screening = match (row.last_screening.as_deref(), never_label) {
        (Some(at), _) => Some(display_date(at)),
        (None, true) => Some(display_last(None)),
        (None, false) => None,
    };
    TopDoctor {
        doctor_id: row.doctor_id,
        doctor_name: row.doctor_name,
        hospital_name: row.hospital_name,
        success_rate: percentage(row.healthy, row.total, 2),
        total_screenings: row.total,
        suspicious_found: row.suspicious,
        healthy_found: row.healthy,
        last_screening,
    }
}

fn sum(counts: &[TableCounts], field: fn(&TableCounts) -> i64) -> i64 {
    counts.iter().map(field).sum()
}

#[async_trait]
impl<R: ReportRepositoryTrait + Send + Sync> ReportServiceTrait for ReportService<R> {
    async fn admin_dashboard(&self) -> Result<AdminDashboard, ReportServiceError> {
        let windows = report_windows(self.clock.now());
        debug!("Building admin dashboard for week starting {}", windows.week_start);

        let children = self
            .repository
            .table_counts(ScreeningTable::Children, &windows, None)
            .await?;
        let teachers = self
            .repository
            .table_counts(ScreeningTable::Teacher, &windows, None)
            .await?;
        let employees = self
            .repository
            .table_counts(ScreeningTable::Employee, &windows, None)
            .await?;
        let all = [children.clone(), teachers.clone(), employees.clone()];

        let total_screenings = sum(&all, |c| c.total);
        let total_positive_cases = sum(&all, |c| c.suspicious);
        let total_healthy_cases = sum(&all, |c| c.healthy);
        let this_week_screenings = sum(&all, |c| c.this_week);
        let last_week_screenings = sum(&all, |c| c.last_week);

        let total_doctors = self.repository.total_doctors().await?;
        let active_doctors = self.repository.active_doctors(&windows.active_since).await?;

        let gender_stats = self
            .repository
            .gender_breakdown()
            .await?
            .into_iter()
            .map(|g| GenderStat {
                suspicious_percentage: percentage(g.suspicious, g.total, 2),
                gender: g.label,
                total: g.total,
                suspicious: g.suspicious,
                healthy: g.healthy,
            })
            .collect();

        let ages = self.repository.children_by_age().await?;

        let monthly_trends = self
            .repository
            .monthly_outcomes(&ScreeningTable::ALL, &windows.trend_since)
            .await?
            .into_iter()
            .map(|m| MonthlyTrend {
                month_name: month_name(&m.label),
                suspicious_percentage: percentage(m.suspicious, m.total, 2),
                month: m.label,
                total: m.total,
                suspicious: m.suspicious,
                healthy: m.healthy,
            })
            .collect();

        let top_doctors = self
            .repository
            .top_doctors(&ScreeningTable::ALL, TOP_DOCTORS)
            .await?
            .into_iter()
            .map(|row| top_doctor(row, false))
            .collect();

        let recent_children = self
            .repository
            .recent_children(RECENT_CHILDREN)
            .await?
            .into_iter()
            .map(|c| RecentChild {
                id: c.id,
                name: c.name,
                age: c.age,
                parent_name: c.father_name,
                phone: c.mobile_no,
                status: HeartStatus::label(&c.heart_status).to_string(),
                heart_status: c.heart_status,
                doctor_name: c.doctor_name,
                screening_date: display_date(&c.created_at),
            })
            .collect();

        let average_age = self
            .repository
            .average_child_age()
            .await?
            .map(|age| round_to(age, 1))
            .unwrap_or(0.0);

        let most_active_hospital = self
            .repository
            .most_active_hospital()
            .await?
            .map(|h| HospitalStat {
                name: h.hospital_name,
                screenings: h.screenings,
            });

        let screenings_by_day = self
            .repository
            .children_by_weekday(&windows.active_since)
            .await?
            .into_iter()
            .map(|d| DayStat {
                day: weekday_name(d.weekday).to_string(),
                screenings: d.screenings,
            })
            .collect();

        Ok(AdminDashboard {
            total_children_screened: children.total,
            children_positive_cases: children.suspicious,
            children_healthy_cases: children.healthy,
            total_teachers_screened: teachers.total,
            teachers_positive_cases: teachers.suspicious,
            teachers_healthy_cases: teachers.healthy,
            total_employees_screened: employees.total,
            employees_positive_cases: employees.suspicious,
            employees_healthy_cases: employees.healthy,
            total_screenings,
            total_positive_cases,
            total_healthy_cases,
            today_screenings: sum(&all, |c| c.today),
            total_doctors,
            active_doctors,
            this_week_screenings,
            this_month_screenings: sum(&all, |c| c.this_month),
            last_week_screenings,
            weekly_growth: weekly_growth(this_week_screenings, last_week_screenings),
            healthy_percentage: percentage(total_healthy_cases, total_screenings, 2),
            suspicious_percentage: percentage(total_positive_cases, total_screenings, 2),
            gender_stats,
            age_groups: age_groups(&ages),
            monthly_trends,
            top_doctors,
            recent_children,
            average_age,
            most_active_hospital,
            screenings_by_day,
        })
    }

    async fn children_statistics(&self) -> Result<ChildrenStatistics, ReportServiceError> {
        let windows = report_windows(self.clock.now());
        let summary = self.repository.table_summary(ScreeningTable::Children).await?;

        let doctor_stats = self
            .repository
            .children_per_doctor()
            .await?
            .into_iter()
            .map(|d| DoctorChildrenStat {
                doctor_id: d.doctor_id,
                doctor_name: d.doctor_name,
                hospital_name: d.hospital_name,
                total_screenings: d.total,
                suspicious_found: d.suspicious,
            })
            .collect();

        let trends = self
            .repository
            .monthly_outcomes(&[ScreeningTable::Children], &windows.trend_since)
            .await?
            .into_iter()
            .map(|m| ScreeningTrend {
                month: m.label,
                screenings: m.total,
                suspicious: m.suspicious,
            })
            .collect();

        Ok(ChildrenStatistics {
            stats: ChildrenStats {
                total_children: summary.total,
                normal_cases: summary.normal,
                suspicious_cases: summary.suspicious,
                total_doctors: summary.distinct_doctors,
                total_schools: summary.distinct_schools,
                with_aadhar: summary.with_aadhar,
                with_shramik: summary.with_shramik,
                aadhar_percentage: percentage(summary.with_aadhar, summary.total, 1),
                shramik_percentage: percentage(summary.with_shramik, summary.total, 1),
                suspicious_percentage: percentage(summary.suspicious, summary.total, 1),
            },
            doctor_stats,
            trends,
        })
    }

    async fn staff_statistics(&self) -> Result<StaffStatistics, ReportServiceError> {
        let teachers = self.repository.table_summary(ScreeningTable::Teacher).await?;
        let employees = self.repository.table_summary(ScreeningTable::Employee).await?;

        let total_staff = teachers.total + employees.total;
        let suspicious_staff = teachers.suspicious + employees.suspicious;

        let doctor_staff_stats = self
            .repository
            .staff_per_doctor()
            .await?
            .into_iter()
            .map(|d| DoctorStaffStat {
                doctor_id: d.doctor_id,
                doctor_name: d.doctor_name,
                hospital_name: d.hospital_name,
                teacher_count: d.teachers,
                employee_count: d.employees,
                total_staff_count: d.teachers + d.employees,
                suspicious_staff_count: d.suspicious,
            })
            .collect();

        Ok(StaffStatistics {
            stats: StaffStats {
                total_staff,
                total_teachers: teachers.total,
                total_employees: employees.total,
                normal_staff: teachers.normal + employees.normal,
                suspicious_staff,
                normal_teachers: teachers.normal,
                suspicious_teachers: teachers.suspicious,
                normal_employees: employees.normal,
                suspicious_employees: employees.suspicious,
                suspicious_percentage: percentage(suspicious_staff, total_staff, 1),
                teacher_percentage: percentage(teachers.total, total_staff, 1),
                employee_percentage: percentage(employees.total, total_staff, 1),
            },
            doctor_staff_stats,
        })
    }

    async fn doctor_portal_stats(
        &self,
        doctor_id: i64,
    ) -> Result<DoctorPortalStats, ReportServiceError> {
        if doctor_id <= 0 {
            return Err(ReportServiceError::InvalidRequest("Invalid doctor ID".to_string()));
        }
        let windows = report_windows(self.clock.now());

        let children = self
            .repository
            .table_counts(ScreeningTable::Children, &windows, Some(doctor_id))
            .await?;
        let teachers = self
            .repository
            .table_counts(ScreeningTable::Teacher, &windows, Some(doctor_id))
            .await?;
        let employees = self
            .repository
            .table_counts(ScreeningTable::Employee, &windows, Some(doctor_id))
            .await?;

        Ok(DoctorPortalStats {
            total_children_screened: children.total,
            positive_cases: children.suspicious,
            today_screenings: children.today,
            reports_this_week: children.this_week,
            pending_reports: 0,
            total_teachers: teachers.total,
            total_employees: employees.total,
            total_staff: teachers.total + employees.total,
            staff_positive_cases: teachers.suspicious + employees.suspicious,
        })
    }

    async fn doctor_management_stats(&self) -> Result<DoctorManagementStats, ReportServiceError> {
        let windows = report_windows(self.clock.now());

        let total_doctors = self.repository.total_doctors().await?;
        let active_doctors = self.repository.active_doctors(&windows.active_since).await?;

        let mut total_screenings = 0;
        for table in ScreeningTable::ALL {
            total_screenings += self.repository.table_counts(table, &windows, None).await?.total;
        }

        let average_experience = self
            .repository
            .average_experience()
            .await?
            .map(|years| round_to(years, 1))
            .unwrap_or(0.0);

        let hospital_types = self
            .repository
            .hospital_types()
            .await?
            .into_iter()
            .map(|h| HospitalTypeStat {
                hospital_type: h.hospital_type,
                count: h.count,
            })
            .collect();

        let top_doctors = self
            .repository
            .top_doctors(&[ScreeningTable::Children], TOP_DOCTORS)
            .await?
            .into_iter()
            .map(|row| top_doctor(row, true))
            .collect();

        let recent_doctors = self
            .repository
            .recent_registrations(RECENT_REGISTRATIONS)
            .await?
            .into_iter()
            .map(|d| RecentDoctor {
                id: d.id,
                doctor_name: d.doctor_name,
                hospital_name: d.hospital_name,
                phone_no: d.phone_no,
                email: d.email,
                created_at: display_date(&d.created_at),
            })
            .collect();

        let monthly_trends = self
            .repository
            .registration_trend(&windows.trend_since)
            .await?
            .into_iter()
            .map(|m| RegistrationTrend {
                month_name: month_name(&m.month),
                month: m.month,
                registrations: m.registrations,
            })
            .collect();

        let average_screenings_per_doctor = if total_doctors > 0 {
            round_to(total_screenings as f64 / total_doctors as f64, 1)
        } else {
            0.0
        };

        Ok(DoctorManagementStats {
            total_doctors,
            active_doctors,
            inactive_doctors: (total_doctors - active_doctors).max(0),
            total_screenings,
            average_experience,
            hospital_types,
            top_doctors,
            recent_doctors,
            monthly_trends,
            average_screenings_per_doctor,
        })
    }
}

/// Create a report service backed by the SQLite repository
pub fn create_default_report_service(pool: DatabasePool, clock: Arc<dyn Clock>) -> impl ReportServiceTrait {
    ReportService::new(ReportRepository::new(pool), clock)
}
