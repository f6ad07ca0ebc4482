use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row, ToSql};
use tracing::debug;

use super::errors::RepositoryError;
use super::query::WhereClause;
use crate::database::DatabasePool;
use crate::models::{ChildDetailRow, NewScreening, ReportFilter, ScreeningRow, ScreeningTable};

/// Data access for the three screening tables
#[async_trait]
pub trait ScreeningRepositoryTrait: Send + Sync {
    /// Insert into `table` and return the new id; a reused mobile number yields `Conflict`
    async fn insert(&self, table: ScreeningTable, screening: NewScreening) -> Result<i64, RepositoryError>;

    /// Filtered page of children, newest first, with the unpaged total
    async fn list_children(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError>;

    /// Filtered page of teachers and employees together, newest first, with the unpaged total
    async fn list_staff(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError>;

    /// One child with the screening doctor's contact details
    async fn get_child(&self, id: i64) -> Result<Option<ChildDetailRow>, RepositoryError>;
}

/// SQLite implementation of [`ScreeningRepositoryTrait`]
#[derive(Clone)]
pub struct ScreeningRepository {
    pool: DatabasePool,
}

impl ScreeningRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn list(
        &self,
        tables: &[ScreeningTable],
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError> {
        let source = tables
            .iter()
            .map(|t| format!("SELECT {} FROM {} x", t.listing_columns("x"), t.table()))
            .collect::<Vec<_>>()
            .join(" UNION ALL ");

        let mut clause = WhereClause::new();
        if let Some(term) = filter.search.as_deref() {
            clause.push_search(&["s.name", "s.school_name", "s.father_name"], term);
        }
        if let Some(status) = filter.heart_status.as_deref() {
            clause.push("s.heart_status = ?", vec![Box::new(status.to_string())]);
        }
        if let Some(doctor_id) = filter.doctor_id {
            clause.push("s.dr_id = ?", vec![Box::new(doctor_id)]);
        }
        if let Some(table) = filter.staff_table {
            clause.push("s.source = ?", vec![Box::new(table.table())]);
        }

        let from = format!(
            "FROM ({source}) s INNER JOIN doctors d ON d.id = s.dr_id{filter}",
            source = source,
            filter = clause.sql(),
        );

        let conn = self.pool.get()?;
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) {}", from),
            clause.params().as_slice(),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT s.*, d.doctor_name AS doctor_name, d.hospital_name AS hospital_name, \
             d.hospital_type AS hospital_type {} \
             ORDER BY s.created_at DESC, s.id DESC LIMIT ? OFFSET ?",
            from
        );
        let mut params = clause.params();
        params.push(&limit);
        params.push(&offset);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), map_screening)?;
        let rows = rows.collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    }
}

fn map_screening(row: &Row<'_>) -> rusqlite::Result<ScreeningRow> {
    let source: String = row.get("source")?;
    let table = ScreeningTable::from_table_name(&source)
        .ok_or(rusqlite::Error::InvalidColumnName(source))?;

    Ok(ScreeningRow {
        id: row.get("id")?,
        doctor_id: row.get("dr_id")?,
        name: row.get("name")?,
        age: row.get("age")?,
        gender: row.get("gender")?,
        father_name: row.get("father_name")?,
        mobile_no: row.get("mobile_no")?,
        school_name: row.get("school_name")?,
        have_aadhar: row.get("have_aadhar")?,
        have_shramik: row.get("have_shramik")?,
        aadhar_photo: row.get("aadhar_photo")?,
        shramik_photo: row.get("shramik_photo")?,
        heart_status: row.get("heart_status")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        table,
        doctor_name: row.get("doctor_name")?,
        hospital_name: row.get("hospital_name")?,
        hospital_type: row.get("hospital_type")?,
    })
}

#[async_trait]
impl ScreeningRepositoryTrait for ScreeningRepository {
    async fn insert(&self, table: ScreeningTable, screening: NewScreening) -> Result<i64, RepositoryError> {
        debug!("Inserting {} screening for doctor {}", table.table(), screening.doctor_id);

        let mut columns = vec!["dr_id", "name", "age", "gender"];
        let mut values: Vec<Box<dyn ToSql>> = vec![
            Box::new(screening.doctor_id),
            Box::new(screening.name),
            Box::new(screening.age),
            Box::new(screening.gender),
        ];
        if table.has_father_name() {
            columns.push("father_name");
            values.push(Box::new(screening.father_name));
        }
        columns.extend([
            "mobile_no",
            "school_name",
            "have_aadhar",
            "have_shramik",
            "aadhar_photo",
            "shramik_photo",
            "heart_status",
            "notes",
            "created_at",
        ]);
        values.push(Box::new(screening.mobile_no));
        values.push(Box::new(screening.school_name));
        values.push(Box::new(screening.have_aadhar));
        values.push(Box::new(screening.have_shramik));
        values.push(Box::new(screening.aadhar_photo));
        values.push(Box::new(screening.shramik_photo));
        values.push(Box::new(screening.heart_status));
        values.push(Box::new(screening.notes));
        values.push(Box::new(screening.created_at));

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.table(),
            columns.iter().map(|c| table.column(c)).collect::<Vec<_>>().join(", "),
            vec!["?"; columns.len()].join(", "),
        );
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();

        let conn = self.pool.get()?;
        conn.execute(&sql, params.as_slice())
            .map_err(RepositoryError::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    async fn list_children(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError> {
        debug!("Listing children: limit={}, offset={}", limit, offset);
        self.list(&[ScreeningTable::Children], filter, limit, offset)
    }

    async fn list_staff(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScreeningRow>, i64), RepositoryError> {
        debug!("Listing staff: limit={}, offset={}", limit, offset);
        self.list(&ScreeningTable::STAFF, filter, limit, offset)
    }

    async fn get_child(&self, id: i64) -> Result<Option<ChildDetailRow>, RepositoryError> {
        debug!("Fetching child report: id={}", id);
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {}, d.doctor_name AS doctor_name, d.hospital_name AS hospital_name, \
             d.hospital_type AS hospital_type, d.email AS doctor_email, d.phone_no AS doctor_phone \
             FROM children c INNER JOIN doctors d ON d.id = c.dr_id WHERE c.id = ?1",
            ScreeningTable::Children.listing_columns("c")
        );

        let detail = conn
            .query_row(&sql, params![id], |row| {
                Ok(ChildDetailRow {
                    screening: map_screening(row)?,
                    doctor_email: row.get("doctor_email")?,
                    doctor_phone: row.get("doctor_phone")?,
                })
            })
            .optional()?;
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_in_memory_pool;
    use crate::models::{HEART_CLEAR, HEART_SUSPICIOUS};
    use crate::repository::test_support::{seed_doctor, seed_person, seed_screening};

    fn screening(doctor_id: i64, mobile: &str) -> NewScreening {
        NewScreening {
            doctor_id,
            name: "Asha".to_string(),
            age: 9,
            gender: "महिला".to_string(),
            father_name: Some("Mohan".to_string()),
            mobile_no: mobile.to_string(),
            school_name: "Govt School".to_string(),
            have_aadhar: "yes".to_string(),
            have_shramik: "no".to_string(),
            aadhar_photo: None,
            shramik_photo: None,
            heart_status: HEART_CLEAR.to_string(),
            notes: Some("healthy".to_string()),
            created_at: "2025-02-01 10:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_detail() {
        let pool = initialize_in_memory_pool().unwrap();
        let doctor = seed_doctor(&pool, "Dr. A", "9876543210", "a@x.com", "2025-01-01 00:00:00");
        let repo = ScreeningRepository::new(pool);

        let id = repo.insert(ScreeningTable::Children, screening(doctor, "9000000001")).await.unwrap();
        let detail = repo.get_child(id).await.unwrap().unwrap();

        assert_eq!(detail.screening.father_name.as_deref(), Some("Mohan"));
        assert_eq!(detail.screening.table, ScreeningTable::Children);
        assert_eq!(detail.doctor_email, "a@x.com");
        assert!(repo.get_child(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_staff_insert_drops_father_name() {
        let pool = initialize_in_memory_pool().unwrap();
        let doctor = seed_doctor(&pool, "Dr. A", "9876543210", "a@x.com", "2025-01-01 00:00:00");
        let repo = ScreeningRepository::new(pool);

        repo.insert(ScreeningTable::Employee, screening(doctor, "9000000001")).await.unwrap();
        let (rows, total) = repo.list_staff(&ReportFilter::default(), 10, 0).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].table, ScreeningTable::Employee);
        assert!(rows[0].father_name.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_mobile_conflicts() {
        let pool = initialize_in_memory_pool().unwrap();
        let doctor = seed_doctor(&pool, "Dr. A", "9876543210", "a@x.com", "2025-01-01 00:00:00");
        let repo = ScreeningRepository::new(pool);

        repo.insert(ScreeningTable::Teacher, screening(doctor, "9000000001")).await.unwrap();
        let err = repo.insert(ScreeningTable::Teacher, screening(doctor, "9000000001")).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict { ref field } if field == "t_mobile_no"));
    }

    #[tokio::test]
    async fn test_unknown_doctor_is_rejected() {
        let pool = initialize_in_memory_pool().unwrap();
        let repo = ScreeningRepository::new(pool);

        let err = repo.insert(ScreeningTable::Children, screening(99, "9000000001")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_children_listing_filters_and_pages() {
        let pool = initialize_in_memory_pool().unwrap();
        let a = seed_doctor(&pool, "Dr. A", "9876543210", "a@x.com", "2025-01-01 00:00:00");
        let b = seed_doctor(&pool, "Dr. B", "9876543211", "b@x.com", "2025-01-01 00:00:00");
        seed_person(&pool, ScreeningTable::Children, a, "9000000001", HEART_SUSPICIOUS, "2025-02-01 10:00:00", "Sita", 7, "महिला");
        seed_person(&pool, ScreeningTable::Children, a, "9000000002", HEART_CLEAR, "2025-02-02 10:00:00", "Gita", 8, "महिला");
        seed_person(&pool, ScreeningTable::Children, b, "9000000003", HEART_CLEAR, "2025-02-03 10:00:00", "Ram", 9, "पुरुष");
        let repo = ScreeningRepository::new(pool);

        let (page, total) = repo.list_children(&ReportFilter::default(), 2, 0).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Ram");

        let (rest, _) = repo.list_children(&ReportFilter::default(), 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "Sita");

        let filter = ReportFilter {
            search: Some("ITA".to_string()),
            doctor_id: Some(a),
            heart_status: Some(HEART_CLEAR.to_string()),
            ..Default::default()
        };
        let (rows, total) = repo.list_children(&filter, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "Gita");
        assert_eq!(rows[0].doctor_name, "Dr. A");
    }

    #[tokio::test]
    async fn test_staff_listing_merges_tables() {
        let pool = initialize_in_memory_pool().unwrap();
        let doctor = seed_doctor(&pool, "Dr. A", "9876543210", "a@x.com", "2025-01-01 00:00:00");
        seed_screening(&pool, ScreeningTable::Teacher, doctor, "9000000001", HEART_CLEAR, "2025-02-01 10:00:00");
        seed_screening(&pool, ScreeningTable::Employee, doctor, "9000000002", HEART_SUSPICIOUS, "2025-02-02 10:00:00");
        seed_screening(&pool, ScreeningTable::Children, doctor, "9000000003", HEART_CLEAR, "2025-02-03 10:00:00");
        let repo = ScreeningRepository::new(pool);

        let (rows, total) = repo.list_staff(&ReportFilter::default(), 10, 0).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].table, ScreeningTable::Employee);
        assert_eq!(rows[1].table, ScreeningTable::Teacher);

        let filter = ReportFilter {
            staff_table: Some(ScreeningTable::Teacher),
            ..Default::default()
        };
        let (rows, total) = repo.list_staff(&filter, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].table, ScreeningTable::Teacher);
    }
}
