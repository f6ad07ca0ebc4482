use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::debug;

use super::errors::RepositoryError;
use super::query::WhereClause;
use crate::database::DatabasePool;
use crate::models::{
    DoctorActivityRow, DoctorBrief, DoctorChanges, DoctorRecord, DoctorSearch, NewDoctor,
    RecentScreeningRow, ScreeningSummary, ScreeningTable, HEART_CLEAR, HEART_SUSPICIOUS,
};

const DOCTOR_COLUMNS: &str = "d.id AS id, d.doctor_name AS doctor_name, \
    d.hospital_type AS hospital_type, d.hospital_name AS hospital_name, d.phone_no AS phone_no, \
    d.experience AS experience, d.email AS email, d.password AS password, \
    d.created_at AS created_at, d.updated_at AS updated_at";

/// Data access for registered doctors
#[async_trait]
pub trait DoctorRepositoryTrait: Send + Sync {
    /// Insert a doctor; duplicate email or phone yields `Conflict`
    async fn create(&self, doctor: NewDoctor) -> Result<DoctorRecord, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<DoctorRecord>, RepositoryError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<DoctorRecord>, RepositoryError>;

    /// Whether a doctor other than `exclude_id` already uses `email`
    async fn email_in_use(&self, email: &str, exclude_id: i64) -> Result<bool, RepositoryError>;

    /// Apply the present fields of `changes` and return the updated row
    async fn update(
        &self,
        id: i64,
        changes: DoctorChanges,
        updated_at: &str,
    ) -> Result<DoctorRecord, RepositoryError>;

    /// Screenings of every category recorded by the doctor
    async fn count_dependents(&self, id: i64) -> Result<i64, RepositoryError>;

    /// Returns false when no row was removed
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Doctors with their children screening activity.
    ///
    /// Ordered by name when a filter is present, newest first otherwise.
    async fn list_with_activity(
        &self,
        search: &DoctorSearch,
        active_since: &str,
    ) -> Result<Vec<DoctorActivityRow>, RepositoryError>;

    /// Every doctor, ordered by name
    async fn list_brief(&self) -> Result<Vec<DoctorBrief>, RepositoryError>;

    /// Every doctor, newest first
    async fn list_all(&self) -> Result<Vec<DoctorRecord>, RepositoryError>;

    /// Children screening counts for one doctor
    async fn screening_summary(&self, id: i64) -> Result<ScreeningSummary, RepositoryError>;

    /// Most recent children screened by the doctor
    async fn recent_screenings(
        &self,
        id: i64,
        limit: i64,
    ) -> Result<Vec<RecentScreeningRow>, RepositoryError>;
}

/// SQLite implementation of [`DoctorRepositoryTrait`]
#[derive(Clone)]
pub struct DoctorRepository {
    pool: DatabasePool,
}

impl DoctorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_doctor(row: &Row<'_>) -> rusqlite::Result<DoctorRecord> {
    Ok(DoctorRecord {
        id: row.get("id")?,
        doctor_name: row.get("doctor_name")?,
        hospital_type: row.get("hospital_type")?,
        hospital_name: row.get("hospital_name")?,
        phone_no: row.get("phone_no")?,
        experience: row.get("experience")?,
        email: row.get("email")?,
        password_hash: row.get("password")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn fetch_doctor(conn: &Connection, id: i64) -> Result<Option<DoctorRecord>, RepositoryError> {
    let sql = format!("SELECT {} FROM doctors d WHERE d.id = ?1", DOCTOR_COLUMNS);
    Ok(conn.query_row(&sql, [id], map_doctor).optional()?)
}

/// Children outcome aggregate over the `c` alias
fn children_summary_columns() -> String {
    format!(
        "COUNT(c.id) AS total, \
         COALESCE(SUM(CASE WHEN c.heart_status = '{clear}' THEN 1 ELSE 0 END), 0) AS healthy, \
         COALESCE(SUM(CASE WHEN c.heart_status = '{suspicious}' THEN 1 ELSE 0 END), 0) AS suspicious, \
         MAX(c.created_at) AS last_screening",
        clear = HEART_CLEAR,
        suspicious = HEART_SUSPICIOUS,
    )
}

fn map_summary(row: &Row<'_>) -> rusqlite::Result<ScreeningSummary> {
    Ok(ScreeningSummary {
        total: row.get("total")?,
        healthy: row.get("healthy")?,
        suspicious: row.get("suspicious")?,
        last_screening: row.get("last_screening")?,
    })
}

#[async_trait]
impl DoctorRepositoryTrait for DoctorRepository {
    async fn create(&self, doctor: NewDoctor) -> Result<DoctorRecord, RepositoryError> {
        debug!("Inserting doctor: email={}", doctor.email);
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO doctors
             (doctor_name, hospital_type, hospital_name, phone_no, experience, email, password, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                doctor.doctor_name,
                doctor.hospital_type,
                doctor.hospital_name,
                doctor.phone_no,
                doctor.experience,
                doctor.email,
                doctor.password_hash,
                doctor.created_at,
            ],
        )
        .map_err(RepositoryError::from_write)?;

        let id = conn.last_insert_rowid();
        fetch_doctor(&conn, id)?
            .ok_or_else(|| RepositoryError::NotFound(format!("doctor {}", id)))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<DoctorRecord>, RepositoryError> {
        debug!("Fetching doctor: id={}", id);
        let conn = self.pool.get()?;
        fetch_doctor(&conn, id)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<DoctorRecord>, RepositoryError> {
        debug!("Fetching doctor by email");
        let conn = self.pool.get()?;
        let sql = format!("SELECT {} FROM doctors d WHERE d.email = ?1 COLLATE NOCASE", DOCTOR_COLUMNS);
        Ok(conn.query_row(&sql, [email], map_doctor).optional()?)
    }

    async fn email_in_use(&self, email: &str, exclude_id: i64) -> Result<bool, RepositoryError> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM doctors WHERE email = ?1 COLLATE NOCASE AND id != ?2",
            params![email, exclude_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    async fn update(
        &self,
        id: i64,
        changes: DoctorChanges,
        updated_at: &str,
    ) -> Result<DoctorRecord, RepositoryError> {
        debug!("Updating doctor: id={}", id);
        if changes.is_empty() {
            return Err(RepositoryError::Validation("No fields to update".to_string()));
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        let mut set = |assignment: &'static str, value: Box<dyn ToSql>| {
            assignments.push(assignment);
            values.push(value);
        };

        if let Some(name) = changes.doctor_name {
            set("doctor_name = ?", Box::new(name));
        }
        if let Some(hospital_type) = changes.hospital_type {
            set("hospital_type = ?", Box::new(hospital_type));
        }
        if let Some(hospital_name) = changes.hospital_name {
            set("hospital_name = ?", Box::new(hospital_name));
        }
        if let Some(phone) = changes.phone_no {
            set("phone_no = ?", Box::new(phone));
        }
        if let Some(experience) = changes.experience {
            set("experience = ?", Box::new(experience));
        }
        if let Some(email) = changes.email {
            set("email = ?", Box::new(email));
        }
        if let Some(hash) = changes.password_hash {
            set("password = ?", Box::new(hash));
        }
        set("updated_at = ?", Box::new(updated_at.to_string()));
        values.push(Box::new(id));

        let sql = format!("UPDATE doctors SET {} WHERE id = ?", assignments.join(", "));
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();

        let conn = self.pool.get()?;
        let changed = conn
            .execute(&sql, params.as_slice())
            .map_err(RepositoryError::from_write)?;
        if changed == 0 {
            return Err(RepositoryError::NotFound(format!("doctor {}", id)));
        }

        fetch_doctor(&conn, id)?
            .ok_or_else(|| RepositoryError::NotFound(format!("doctor {}", id)))
    }

    async fn count_dependents(&self, id: i64) -> Result<i64, RepositoryError> {
        let conn = self.pool.get()?;
        let counts = ScreeningTable::ALL
            .iter()
            .map(|t| format!("(SELECT COUNT(*) FROM {} WHERE {} = ?1)", t.table(), t.column("dr_id")))
            .collect::<Vec<_>>()
            .join(" + ");
        let total: i64 = conn.query_row(&format!("SELECT {}", counts), [id], |row| row.get(0))?;
        Ok(total)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        debug!("Deleting doctor: id={}", id);
        let conn = self.pool.get()?;
        let removed = conn
            .execute("DELETE FROM doctors WHERE id = ?1", [id])
            .map_err(RepositoryError::from_write)?;
        Ok(removed > 0)
    }

    async fn list_with_activity(
        &self,
        search: &DoctorSearch,
        active_since: &str,
    ) -> Result<Vec<DoctorActivityRow>, RepositoryError> {
        let mut clause = WhereClause::new();
        if let Some(term) = search.term.as_deref() {
            clause.push_search(&["d.doctor_name", "d.hospital_name", "d.email"], term);
        }
        if let Some(hospital_type) = search.hospital_type.as_deref() {
            clause.push("d.hospital_type = ?", vec![Box::new(hospital_type.to_string())]);
        }
        let order = if search.is_empty() {
            "d.created_at DESC, d.id DESC"
        } else {
            "d.doctor_name ASC, d.id ASC"
        };

        let sql = format!(
            "SELECT {columns}, {summary}
             FROM doctors d
             LEFT JOIN children c ON c.dr_id = d.id
             {filter}
             GROUP BY d.id
             ORDER BY {order}",
            columns = DOCTOR_COLUMNS,
            summary = children_summary_columns(),
            filter = clause.sql(),
            order = order,
        );

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(clause.params().as_slice(), |row| {
            Ok((map_doctor(row)?, map_summary(row)?))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (doctor, summary) = row?;
            let active = summary
                .last_screening
                .as_deref()
                .map(|last| last >= active_since)
                .unwrap_or(false);
            result.push(DoctorActivityRow { doctor, summary, active });
        }
        Ok(result)
    }

    async fn list_brief(&self) -> Result<Vec<DoctorBrief>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, doctor_name, hospital_name, email, phone_no
             FROM doctors ORDER BY doctor_name ASC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DoctorBrief {
                id: row.get(0)?,
                doctor_name: row.get(1)?,
                hospital_name: row.get(2)?,
                email: row.get(3)?,
                phone_no: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_all(&self) -> Result<Vec<DoctorRecord>, RepositoryError> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {} FROM doctors d ORDER BY d.created_at DESC, d.id DESC",
            DOCTOR_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_doctor)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn screening_summary(&self, id: i64) -> Result<ScreeningSummary, RepositoryError> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {} FROM children c WHERE c.dr_id = ?1",
            children_summary_columns()
        );
        Ok(conn.query_row(&sql, [id], map_summary)?)
    }

    async fn recent_screenings(
        &self,
        id: i64,
        limit: i64,
    ) -> Result<Vec<RecentScreeningRow>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT name, age, gender, heart_status, created_at
             FROM children WHERE dr_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![id, limit], |row| {
            Ok(RecentScreeningRow {
                name: row.get(0)?,
                age: row.get(1)?,
                gender: row.get(2)?,
                heart_status: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
