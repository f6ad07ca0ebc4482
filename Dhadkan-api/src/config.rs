use std::env;

use thiserror::Error;
use tracing::info;

/// bcrypt work factor used when `BCRYPT_COST` is unset
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },

    #[error("{0}")]
    OutOfRange(String),
}

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Root folder for stored screening photos
    pub upload_dir: String,
    pub bcrypt_cost: u32,
    /// Reported by the health check
    pub environment: String,
    /// Minutes east of UTC for stored times and day/week/month windows
    pub utc_offset_minutes: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            upload_dir: "uploads".to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            environment: "development".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `UPLOAD_DIR`, `BCRYPT_COST`, `APP_ENV` and `UTC_OFFSET_MINUTES`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_env("PORT", defaults.port)?;
        let upload_dir = env::var("UPLOAD_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.upload_dir);

        let bcrypt_cost = parse_env("BCRYPT_COST", defaults.bcrypt_cost)?;
        // bcrypt only accepts costs 4 through 31
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::OutOfRange(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                bcrypt_cost
            )));
        }

        let environment = env::var("APP_ENV").unwrap_or(defaults.environment);

        let utc_offset_minutes = parse_env("UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?;
        check_offset(utc_offset_minutes)?;

        info!(
            "Application configuration: port={}, upload_dir={}, environment={}, utc_offset_minutes={}",
            port, upload_dir, environment, utc_offset_minutes
        );

        Ok(AppConfig {
            port,
            upload_dir,
            bcrypt_cost,
            environment,
            utc_offset_minutes,
        })
    }
}

/// Real-world offsets run from UTC-12:00 to UTC+14:00
fn check_offset(minutes: i32) -> Result<(), ConfigError> {
    if (-720..=840).contains(&minutes) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange(format!(
            "UTC_OFFSET_MINUTES must be between -720 and 840, got {}",
            minutes
        )))
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::NotANumber {
            name,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
