//! Report shapes and the arithmetic behind them.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use dhadkan_data::models::ReportWindows;

use super::doctor::Doctor;
use crate::clock::{format_timestamp, start_of_day};

/// Children age groups, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    UpToFive,
    SixToTen,
    ElevenToFifteen,
    SixteenToEighteen,
    Other,
}

impl AgeBucket {
    pub const ORDER: [AgeBucket; 5] = [
        AgeBucket::UpToFive,
        AgeBucket::SixToTen,
        AgeBucket::ElevenToFifteen,
        AgeBucket::SixteenToEighteen,
        AgeBucket::Other,
    ];

    pub fn from_age(age: i64) -> Self {
        match age {
            0..=5 => AgeBucket::UpToFive,
            6..=10 => AgeBucket::SixToTen,
            11..=15 => AgeBucket::ElevenToFifteen,
            16..=18 => AgeBucket::SixteenToEighteen,
            _ => AgeBucket::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::UpToFive => "0-5",
            AgeBucket::SixToTen => "6-10",
            AgeBucket::ElevenToFifteen => "11-15",
            AgeBucket::SixteenToEighteen => "16-18",
            AgeBucket::Other => "other",
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / total` as a percentage rounded to `decimals`; 0 when `total` is 0
pub fn percentage(part: i64, total: i64, decimals: i32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 / total as f64 * 100.0, decimals)
}

/// Week-over-week change in percent; 0 without a previous week
pub fn weekly_growth(this_week: i64, last_week: i64) -> f64 {
    if last_week == 0 {
        return 0.0;
    }
    round_to((this_week - last_week) as f64 / last_week as f64 * 100.0, 2)
}

/// `2025-03` -> `March 2025`
pub fn month_name(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

/// 0 = Sunday
pub fn weekday_name(day: i64) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Unknown",
    }
}

/// Every report window for the instant `now`. Weeks start on Monday.
pub fn report_windows(now: DateTime<Utc>) -> ReportWindows {
    let today = now.date_naive();
    let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let month_start = today.with_day(1).unwrap_or(today);
    let next_month_start = month_start
        .checked_add_months(Months::new(1))
        .unwrap_or(month_start);
    let trend_since = now.checked_sub_months(Months::new(6)).unwrap_or(now);

    ReportWindows {
        today_start: start_of_day(today),
        tomorrow_start: start_of_day(today + Duration::days(1)),
        week_start: start_of_day(week_start),
        next_week_start: start_of_day(week_start + Duration::days(7)),
        last_week_start: start_of_day(week_start - Duration::days(7)),
        month_start: start_of_day(month_start),
        next_month_start: start_of_day(next_month_start),
        active_since: format_timestamp(now - Duration::days(30)),
        trend_since: format_timestamp(trend_since),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenderStat {
    pub gender: String,
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
    pub suspicious_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupStat {
    pub age_group: String,
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
    pub suspicious_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    /// `March 2025`
    pub month_name: String,
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
    pub suspicious_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TopDoctor {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub total_screenings: i64,
    pub suspicious_found: i64,
    pub healthy_found: i64,
    /// Healthy share of all screenings, in percent
    pub success_rate: f64,
    /// `dd/mm/YYYY`
    pub last_screening: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecentChild {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub parent_name: Option<String>,
    pub phone: String,
    /// `स्वस्थ`, `असामान्य` or `अज्ञात`
    pub status: String,
    pub heart_status: String,
    pub doctor_name: Option<String>,
    /// `dd/mm/YYYY`
    pub screening_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HospitalStat {
    pub name: String,
    pub screenings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DayStat {
    pub day: String,
    pub screenings: i64,
}

/// Everything on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_children_screened: i64,
    pub children_positive_cases: i64,
    pub children_healthy_cases: i64,

    pub total_teachers_screened: i64,
    pub teachers_positive_cases: i64,
    pub teachers_healthy_cases: i64,

    pub total_employees_screened: i64,
    pub employees_positive_cases: i64,
    pub employees_healthy_cases: i64,

    pub total_screenings: i64,
    pub total_positive_cases: i64,
    pub total_healthy_cases: i64,
    pub today_screenings: i64,
    pub total_doctors: i64,
    pub active_doctors: i64,

    pub this_week_screenings: i64,
    pub this_month_screenings: i64,
    pub last_week_screenings: i64,
    pub weekly_growth: f64,

    pub healthy_percentage: f64,
    pub suspicious_percentage: f64,

    pub gender_stats: Vec<GenderStat>,
    pub age_groups: Vec<AgeGroupStat>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub top_doctors: Vec<TopDoctor>,
    pub recent_children: Vec<RecentChild>,

    pub average_age: f64,
    pub most_active_hospital: Option<HospitalStat>,
    pub screenings_by_day: Vec<DayStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChildrenStats {
    pub total_children: i64,
    pub normal_cases: i64,
    pub suspicious_cases: i64,
    pub total_doctors: i64,
    pub total_schools: i64,
    pub with_aadhar: i64,
    pub with_shramik: i64,
    pub aadhar_percentage: f64,
    pub shramik_percentage: f64,
    pub suspicious_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorChildrenStat {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub total_screenings: i64,
    pub suspicious_found: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ScreeningTrend {
    pub month: String,
    pub screenings: i64,
    pub suspicious: i64,
}

/// Children report statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChildrenStatistics {
    pub stats: ChildrenStats,
    pub doctor_stats: Vec<DoctorChildrenStat>,
    pub trends: Vec<ScreeningTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StaffStats {
    pub total_staff: i64,
    pub total_teachers: i64,
    pub total_employees: i64,
    pub normal_staff: i64,
    pub suspicious_staff: i64,
    pub normal_teachers: i64,
    pub suspicious_teachers: i64,
    pub normal_employees: i64,
    pub suspicious_employees: i64,
    pub suspicious_percentage: f64,
    pub teacher_percentage: f64,
    pub employee_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorStaffStat {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub teacher_count: i64,
    pub employee_count: i64,
    pub total_staff_count: i64,
    pub suspicious_staff_count: i64,
}

/// Teacher and employee report statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StaffStatistics {
    pub stats: StaffStats,
    pub doctor_staff_stats: Vec<DoctorStaffStat>,
}

/// Per-doctor counters of the doctor portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorPortalStats {
    pub total_children_screened: i64,
    pub positive_cases: i64,
    pub today_screenings: i64,
    pub reports_this_week: i64,
    /// Always 0; reports are never queued
    pub pending_reports: i64,
    pub total_teachers: i64,
    pub total_employees: i64,
    pub total_staff: i64,
    pub staff_positive_cases: i64,
}

/// Doctor profile with portal counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DoctorProfile {
    pub profile: Doctor,
    pub statistics: DoctorPortalStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HospitalTypeStat {
    pub hospital_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecentDoctor {
    pub id: i64,
    pub doctor_name: String,
    #[serde(rename = "hospitalname")]
    pub hospital_name: Option<String>,
    pub phone_no: String,
    pub email: String,
    /// `dd/mm/YYYY`
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegistrationTrend {
    pub month: String,
    pub month_name: String,
    pub registrations: i64,
}

/// Statistics of the doctor management screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoctorManagementStats {
    pub total_doctors: i64,
    pub active_doctors: i64,
    pub inactive_doctors: i64,
    pub total_screenings: i64,
    pub average_experience: f64,
    pub hospital_types: Vec<HospitalTypeStat>,
    pub top_doctors: Vec<TopDoctor>,
    pub recent_doctors: Vec<RecentDoctor>,
    pub monthly_trends: Vec<RegistrationTrend>,
    pub average_screenings_per_doctor: f64,
}
