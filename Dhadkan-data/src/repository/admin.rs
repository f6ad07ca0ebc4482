use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::{AdminRecord, NewAdmin};

/// Data access for administrator accounts
#[async_trait]
pub trait AdminRepositoryTrait: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<Option<AdminRecord>, RepositoryError>;

    async fn create(&self, admin: NewAdmin) -> Result<AdminRecord, RepositoryError>;
}

/// SQLite implementation of [`AdminRepositoryTrait`]
#[derive(Clone)]
pub struct AdminRepository {
    pool: DatabasePool,
}

impl AdminRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepositoryTrait for AdminRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<AdminRecord>, RepositoryError> {
        debug!("Fetching admin by email");
        let conn = self.pool.get()?;
        let admin = conn
            .query_row(
                "SELECT id, name, email, password, role, created_at FROM admins WHERE email = ?1 COLLATE NOCASE",
                [email],
                |row| {
                    Ok(AdminRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        password_hash: row.get(3)?,
                        role: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(admin)
    }

    async fn create(&self, admin: NewAdmin) -> Result<AdminRecord, RepositoryError> {
        debug!("Inserting admin: email={}", admin.email);
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO admins (name, email, password, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![admin.name, admin.email, admin.password_hash, admin.role, admin.created_at],
        )
        .map_err(RepositoryError::from_write)?;

        Ok(AdminRecord {
            id: conn.last_insert_rowid(),
            name: admin.name,
            email: admin.email,
            password_hash: admin.password_hash,
            role: admin.role,
            created_at: admin.created_at,
        })
    }
}
