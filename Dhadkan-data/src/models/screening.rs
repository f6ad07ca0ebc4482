use serde::{Deserialize, Serialize};

/// Stored heart status for a suspicious finding
pub const HEART_SUSPICIOUS: &str = "संदिग्ध";

/// Stored heart status when nothing suspicious was found
pub const HEART_CLEAR: &str = "संदेह नहीं";

/// One of the three screening tables.
///
/// The teacher and employee tables repeat the children schema (minus the
/// father name) with every column prefixed, so queries are written once
/// against this descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreeningTable {
    Children,
    Teacher,
    Employee,
}

impl ScreeningTable {
    /// Every screening table
    pub const ALL: [ScreeningTable; 3] = [
        ScreeningTable::Children,
        ScreeningTable::Teacher,
        ScreeningTable::Employee,
    ];

    /// Tables holding school staff
    pub const STAFF: [ScreeningTable; 2] = [ScreeningTable::Teacher, ScreeningTable::Employee];

    /// SQL table name
    pub fn table(&self) -> &'static str {
        match self {
            ScreeningTable::Children => "children",
            ScreeningTable::Teacher => "teacher",
            ScreeningTable::Employee => "employee",
        }
    }

    /// Column prefix used by this table
    pub fn prefix(&self) -> &'static str {
        match self {
            ScreeningTable::Children => "",
            ScreeningTable::Teacher => "t_",
            ScreeningTable::Employee => "e_",
        }
    }

    /// Fully prefixed column name
    pub fn column(&self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    /// Only the children table records a father name
    pub fn has_father_name(&self) -> bool {
        matches!(self, ScreeningTable::Children)
    }

    /// Column list normalised to unprefixed aliases, for listings and unions
    pub(crate) fn listing_columns(&self, alias: &str) -> String {
        let col = |name: &str| format!("{}.{}", alias, self.column(name));
        let father = if self.has_father_name() {
            col("father_name")
        } else {
            "NULL".to_string()
        };
        format!(
            "{} AS id, {} AS dr_id, {} AS name, {} AS age, {} AS gender, {} AS father_name, \
             {} AS mobile_no, {} AS school_name, {} AS have_aadhar, {} AS have_shramik, \
             {} AS aadhar_photo, {} AS shramik_photo, {} AS heart_status, {} AS notes, \
             {} AS created_at, '{}' AS source",
            col("id"),
            col("dr_id"),
            col("name"),
            col("age"),
            col("gender"),
            father,
            col("mobile_no"),
            col("school_name"),
            col("have_aadhar"),
            col("have_shramik"),
            col("aadhar_photo"),
            col("shramik_photo"),
            col("heart_status"),
            col("notes"),
            col("created_at"),
            self.table(),
        )
    }

    pub(crate) fn from_table_name(name: &str) -> Option<Self> {
        ScreeningTable::ALL.into_iter().find(|t| t.table() == name)
    }
}

/// Values for a new screening row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScreening {
    pub doctor_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    /// Ignored for the staff tables
    pub father_name: Option<String>,
    pub mobile_no: String,
    pub school_name: String,
    pub have_aadhar: String,
    pub have_shramik: String,
    pub aadhar_photo: Option<String>,
    pub shramik_photo: Option<String>,
    pub heart_status: String,
    pub notes: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub created_at: String,
}

/// A screening row joined with the screening doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRow {
    pub id: i64,
    pub doctor_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub father_name: Option<String>,
    pub mobile_no: String,
    pub school_name: String,
    pub have_aadhar: String,
    pub have_shramik: String,
    pub aadhar_photo: Option<String>,
    pub shramik_photo: Option<String>,
    pub heart_status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub table: ScreeningTable,
    pub doctor_name: String,
    pub hospital_name: Option<String>,
    pub hospital_type: Option<String>,
}

/// A child row with the doctor's contact details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDetailRow {
    pub screening: ScreeningRow,
    pub doctor_email: String,
    pub doctor_phone: String,
}

/// Filters for the screening listings. All present filters combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Case-insensitive substring over name, school and (children only) father name
    pub search: Option<String>,
    /// Exact heart status literal
    pub heart_status: Option<String>,
    /// Screening doctor
    pub doctor_id: Option<i64>,
    /// Restrict staff listings to one table
    pub staff_table: Option<ScreeningTable>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_columns() {
        assert_eq!(ScreeningTable::Children.column("mobile_no"), "mobile_no");
        assert_eq!(ScreeningTable::Teacher.column("mobile_no"), "t_mobile_no");
        assert_eq!(ScreeningTable::Employee.column("dr_id"), "e_dr_id");
    }

    #[test]
    fn test_listing_columns_fill_missing_father_name() {
        let staff = ScreeningTable::Teacher.listing_columns("s");
        assert!(staff.contains("NULL AS father_name"));
        assert!(staff.contains("s.t_name AS name"));
        assert!(staff.contains("'teacher' AS source"));

        let children = ScreeningTable::Children.listing_columns("c");
        assert!(children.contains("c.father_name AS father_name"));
    }

    #[test]
    fn test_from_table_name() {
        assert_eq!(ScreeningTable::from_table_name("employee"), Some(ScreeningTable::Employee));
        assert_eq!(ScreeningTable::from_table_name("staff"), None);
    }
}
