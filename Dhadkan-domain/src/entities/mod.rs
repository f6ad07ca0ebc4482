// Domain entities
// Types shared by the services and serialized at the API boundary

pub mod auth;
pub mod conversions;
pub mod doctor;
pub mod report;
pub mod screening;
pub mod values;

pub use values::{lenient_i64, Category, Gender, HeartStatus, YesNo};
