use serde::{Deserialize, Serialize};

/// Time boundaries for the windowed counts, as stored timestamp strings.
///
/// Every range is half-open: `start <= created_at < end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWindows {
    pub today_start: String,
    pub tomorrow_start: String,
    pub week_start: String,
    pub next_week_start: String,
    pub last_week_start: String,
    pub month_start: String,
    pub next_month_start: String,
    /// Start of the trailing 30 day activity window
    pub active_since: String,
    /// Start of the trailing 6 month trend window
    pub trend_since: String,
}

/// Counts for one screening table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCounts {
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
    pub today: i64,
    pub this_week: i64,
    pub last_week: i64,
    pub this_month: i64,
}

/// Outcome counts for one group (a gender, a month, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub label: String,
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
}

/// Outcome counts for children of one exact age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeCount {
    pub age: i64,
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
}

/// Screening volume of one doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorScreeningTotals {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub total: i64,
    pub suspicious: i64,
    pub healthy: i64,
    pub last_screening: Option<String>,
}

/// A recently screened child
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentChildRow {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub father_name: Option<String>,
    pub mobile_no: String,
    pub heart_status: String,
    pub created_at: String,
    pub doctor_name: Option<String>,
}

/// Hospital with the most children screened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalActivity {
    pub hospital_name: String,
    pub screenings: i64,
}

/// Children screened on one day of the week, 0 = Sunday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub weekday: i64,
    pub screenings: i64,
}

/// Whole-table summary used by the report statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub total: i64,
    pub normal: i64,
    pub suspicious: i64,
    pub distinct_doctors: i64,
    pub distinct_schools: i64,
    pub with_aadhar: i64,
    pub with_shramik: i64,
}

/// Children screened per doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorChildrenCount {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub total: i64,
    pub suspicious: i64,
}

/// Staff screened per doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorStaffCount {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub teachers: i64,
    pub employees: i64,
    pub suspicious: i64,
}

/// Number of doctors per hospital type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalTypeCount {
    pub hospital_type: String,
    pub count: i64,
}

/// Doctor registrations in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationMonth {
    /// `YYYY-MM`
    pub month: String,
    pub registrations: i64,
}
