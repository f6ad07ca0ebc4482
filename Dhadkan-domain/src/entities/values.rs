use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use dhadkan_data::models::{ScreeningTable, HEART_CLEAR, HEART_SUSPICIOUS};

/// Gender as recorded on a screening form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Gender {
    #[serde(rename = "पुरुष")]
    Male,
    #[serde(rename = "महिला")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "पुरुष",
            Gender::Female => "महिला",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "पुरुष" => Some(Gender::Male),
            "महिला" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Binary outcome of a screening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum HeartStatus {
    #[serde(rename = "संदिग्ध")]
    Suspicious,
    #[serde(rename = "संदेह नहीं")]
    Clear,
}

impl HeartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartStatus::Suspicious => HEART_SUSPICIOUS,
            HeartStatus::Clear => HEART_CLEAR,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            HEART_SUSPICIOUS => Some(HeartStatus::Suspicious),
            HEART_CLEAR => Some(HeartStatus::Clear),
            _ => None,
        }
    }

    /// Dashboard label for a stored status: healthy, abnormal or unknown
    pub fn label(stored: &str) -> &'static str {
        match Self::parse(stored) {
            Some(HeartStatus::Clear) => "स्वस्थ",
            Some(HeartStatus::Suspicious) => "असामान्य",
            None => "अज्ञात",
        }
    }
}

/// `yes` / `no` document flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(YesNo::Yes),
            "no" => Some(YesNo::No),
            _ => None,
        }
    }
}

/// Who was screened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Category {
    Child,
    Teacher,
    Employee,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Child => "child",
            Category::Teacher => "teacher",
            Category::Employee => "employee",
        }
    }

    /// Staff category from the teacher/employee form; absent means teacher
    pub fn parse_staff(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("teacher") => Some(Category::Teacher),
            Some("employee") => Some(Category::Employee),
            _ => None,
        }
    }

    pub fn table(&self) -> ScreeningTable {
        match self {
            Category::Child => ScreeningTable::Children,
            Category::Teacher => ScreeningTable::Teacher,
            Category::Employee => ScreeningTable::Employee,
        }
    }
}

impl From<ScreeningTable> for Category {
    fn from(table: ScreeningTable) -> Self {
        match table {
            ScreeningTable::Children => Category::Child,
            ScreeningTable::Teacher => Category::Teacher,
            ScreeningTable::Employee => Category::Employee,
        }
    }
}

/// Integer from a JSON number or a numeric string, as mobile clients send both
pub fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether `value` is exactly ten ASCII digits
pub fn is_ten_digits(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}
