use rusqlite::ffi;
use thiserror::Error;

use crate::database::DatabaseError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Not found error
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A UNIQUE or foreign key constraint rejected the write.
    /// `field` is the offending column, or `foreign_key` for a missing or referenced parent.
    #[error("Conflict on {field}")]
    Conflict { field: String },
}

impl RepositoryError {
    /// Translate constraint violations raised by a write into `Conflict`
    pub(crate) fn from_write(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE {
                // "UNIQUE constraint failed: doctors.email"
                let field = message
                    .as_deref()
                    .and_then(|m| m.rsplit('.').next())
                    .unwrap_or("unknown")
                    .trim()
                    .to_string();
                return RepositoryError::Conflict { field };
            }
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                return RepositoryError::Conflict {
                    field: "foreign_key".to_string(),
                };
            }
        }
        RepositoryError::Sqlite(err)
    }
}
