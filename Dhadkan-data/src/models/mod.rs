// Storage models for the data layer
pub mod admin;
pub mod doctor;
pub mod reports;
pub mod screening;

pub use admin::{AdminRecord, NewAdmin};
pub use doctor::{
    DoctorActivityRow, DoctorBrief, DoctorChanges, DoctorRecord, DoctorSearch, NewDoctor,
    RecentScreeningRow, ScreeningSummary,
};
pub use reports::*;
pub use screening::{
    ChildDetailRow, NewScreening, ReportFilter, ScreeningRow, ScreeningTable, HEART_CLEAR,
    HEART_SUSPICIOUS,
};
