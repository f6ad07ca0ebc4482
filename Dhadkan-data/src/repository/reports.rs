use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::{
    AgeCount, DoctorChildrenCount, DoctorRecord, DoctorScreeningTotals, DoctorStaffCount,
    HospitalActivity, HospitalTypeCount, OutcomeCount, RecentChildRow, RegistrationMonth,
    ReportWindows, ScreeningTable, TableCounts, TableSummary, WeekdayCount, HEART_CLEAR,
    HEART_SUSPICIOUS,
};

/// Read-only aggregation queries behind the dashboards and statistics
#[async_trait]
pub trait ReportRepositoryTrait: Send + Sync {
    /// Outcome and windowed counts for one table, optionally for one doctor
    async fn table_counts(
        &self,
        table: ScreeningTable,
        windows: &ReportWindows,
        doctor_id: Option<i64>,
    ) -> Result<TableCounts, RepositoryError>;

    async fn total_doctors(&self) -> Result<i64, RepositoryError>;

    /// Distinct doctors with a screening in any table since `since`
    async fn active_doctors(&self, since: &str) -> Result<i64, RepositoryError>;

    /// Outcomes per gender across every table
    async fn gender_breakdown(&self) -> Result<Vec<OutcomeCount>, RepositoryError>;

    /// Outcomes per exact child age, youngest first
    async fn children_by_age(&self) -> Result<Vec<AgeCount>, RepositoryError>;

    /// Outcomes per `YYYY-MM` over `tables` since `since`, newest month first
    async fn monthly_outcomes(
        &self,
        tables: &[ScreeningTable],
        since: &str,
    ) -> Result<Vec<OutcomeCount>, RepositoryError>;

    /// Doctors with the most screenings across `tables`
    async fn top_doctors(
        &self,
        tables: &[ScreeningTable],
        limit: i64,
    ) -> Result<Vec<DoctorScreeningTotals>, RepositoryError>;

    async fn recent_children(&self, limit: i64) -> Result<Vec<RecentChildRow>, RepositoryError>;

    async fn average_child_age(&self) -> Result<Option<f64>, RepositoryError>;

    /// Hospital whose doctors screened the most children
    async fn most_active_hospital(&self) -> Result<Option<HospitalActivity>, RepositoryError>;

    /// Children screened per weekday since `since`, Sunday (0) first
    async fn children_by_weekday(&self, since: &str) -> Result<Vec<WeekdayCount>, RepositoryError>;

    async fn table_summary(&self, table: ScreeningTable) -> Result<TableSummary, RepositoryError>;

    /// Every doctor with their children counts, busiest first
    async fn children_per_doctor(&self) -> Result<Vec<DoctorChildrenCount>, RepositoryError>;

    /// Doctors who screened staff, busiest first
    async fn staff_per_doctor(&self) -> Result<Vec<DoctorStaffCount>, RepositoryError>;

    async fn hospital_types(&self) -> Result<Vec<HospitalTypeCount>, RepositoryError>;

    async fn average_experience(&self) -> Result<Option<f64>, RepositoryError>;

    async fn recent_registrations(&self, limit: i64) -> Result<Vec<DoctorRecord>, RepositoryError>;

    /// Doctor registrations per month since `since`, oldest first
    async fn registration_trend(&self, since: &str) -> Result<Vec<RegistrationMonth>, RepositoryError>;
}

/// SQLite implementation of [`ReportRepositoryTrait`]
#[derive(Clone)]
pub struct ReportRepository {
    pool: DatabasePool,
}

impl ReportRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// `UNION ALL` of the outcome columns of `tables`, normalised to
/// `dr_id, gender, heart_status, created_at`. `filter` is applied per table
/// with `{created_at}` replaced by the prefixed column.
fn outcome_union(tables: &[ScreeningTable], filter: Option<&str>) -> String {
    tables
        .iter()
        .map(|t| {
            let created_at = t.column("created_at");
            let condition = filter
                .map(|f| format!(" WHERE {}", f.replace("{created_at}", &created_at)))
                .unwrap_or_default();
            format!(
                "SELECT {} AS dr_id, {} AS gender, {} AS heart_status, {} AS created_at FROM {}{}",
                t.column("dr_id"),
                t.column("gender"),
                t.column("heart_status"),
                created_at,
                t.table(),
                condition,
            )
        })
        .collect::<Vec<_>>()
        .join(" UNION ALL ")
}

/// `total, suspicious, healthy` over the `heart_status` column of `alias`
fn outcome_columns(alias: &str, count_column: &str) -> String {
    format!(
        "COUNT({alias}.{count}) AS total, \
         COALESCE(SUM(CASE WHEN {alias}.heart_status = '{suspicious}' THEN 1 ELSE 0 END), 0) AS suspicious, \
         COALESCE(SUM(CASE WHEN {alias}.heart_status = '{clear}' THEN 1 ELSE 0 END), 0) AS healthy",
        alias = alias,
        count = count_column,
        suspicious = HEART_SUSPICIOUS,
        clear = HEART_CLEAR,
    )
}

fn map_outcome(row: &Row<'_>) -> rusqlite::Result<OutcomeCount> {
    Ok(OutcomeCount {
        label: row.get("label")?,
        total: row.get("total")?,
        suspicious: row.get("suspicious")?,
        healthy: row.get("healthy")?,
    })
}

fn query_outcomes(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<OutcomeCount>, RepositoryError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_outcome)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

#[async_trait]
impl ReportRepositoryTrait for ReportRepository {
    async fn table_counts(
        &self,
        table: ScreeningTable,
        windows: &ReportWindows,
        doctor_id: Option<i64>,
    ) -> Result<TableCounts, RepositoryError> {
        debug!("Counting {} screenings", table.table());
        let status = table.column("heart_status");
        let created = table.column("created_at");
        let sql = format!(
            "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN {status} = '{suspicious}' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {status} = '{clear}' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {created} >= ?1 AND {created} < ?2 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {created} >= ?3 AND {created} < ?4 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {created} >= ?5 AND {created} < ?3 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {created} >= ?6 AND {created} < ?7 THEN 1 ELSE 0 END), 0)
             FROM {table}
             WHERE (?8 IS NULL OR {dr_id} = ?8)",
            status = status,
            created = created,
            suspicious = HEART_SUSPICIOUS,
            clear = HEART_CLEAR,
            table = table.table(),
            dr_id = table.column("dr_id"),
        );

        let conn = self.pool.get()?;
        let counts = conn.query_row(
            &sql,
            params![
                windows.today_start,
                windows.tomorrow_start,
                windows.week_start,
                windows.next_week_start,
                windows.last_week_start,
                windows.month_start,
                windows.next_month_start,
                doctor_id,
            ],
            |row| {
                Ok(TableCounts {
                    total: row.get(0)?,
                    suspicious: row.get(1)?,
                    healthy: row.get(2)?,
                    today: row.get(3)?,
                    this_week: row.get(4)?,
                    last_week: row.get(5)?,
                    this_month: row.get(6)?,
                })
            },
        )?;
        Ok(counts)
    }

    async fn total_doctors(&self) -> Result<i64, RepositoryError> {
        let conn = self.pool.get()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?)
    }

    async fn active_doctors(&self, since: &str) -> Result<i64, RepositoryError> {
        let sql = format!(
            "SELECT COUNT(DISTINCT dr_id) FROM ({})",
            outcome_union(&ScreeningTable::ALL, Some("{created_at} >= ?1"))
        );
        let conn = self.pool.get()?;
        Ok(conn.query_row(&sql, [since], |row| row.get(0))?)
    }

    async fn gender_breakdown(&self) -> Result<Vec<OutcomeCount>, RepositoryError> {
        let sql = format!(
            "SELECT s.gender AS label, {} FROM ({}) s GROUP BY s.gender ORDER BY s.gender",
            outcome_columns("s", "dr_id"),
            outcome_union(&ScreeningTable::ALL, None)
        );
        let conn = self.pool.get()?;
        query_outcomes(&conn, &sql, &[])
    }

    async fn children_by_age(&self) -> Result<Vec<AgeCount>, RepositoryError> {
        let sql = format!(
            "SELECT c.age AS age, {} FROM children c GROUP BY c.age ORDER BY c.age",
            outcome_columns("c", "id")
        );
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(AgeCount {
                age: row.get("age")?,
                total: row.get("total")?,
                suspicious: row.get("suspicious")?,
                healthy: row.get("healthy")?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn monthly_outcomes(
        &self,
        tables: &[ScreeningTable],
        since: &str,
    ) -> Result<Vec<OutcomeCount>, RepositoryError> {
        let sql = format!(
            "SELECT substr(s.created_at, 1, 7) AS label, {} FROM ({}) s
             GROUP BY label ORDER BY label DESC",
            outcome_columns("s", "dr_id"),
            outcome_union(tables, Some("{created_at} >= ?1"))
        );
        let conn = self.pool.get()?;
        query_outcomes(&conn, &sql, &[&since as &dyn rusqlite::ToSql])
    }

    async fn top_doctors(
        &self,
        tables: &[ScreeningTable],
        limit: i64,
    ) -> Result<Vec<DoctorScreeningTotals>, RepositoryError> {
        let sql = format!(
            "SELECT d.id, d.doctor_name, d.hospital_name, {}, MAX(s.created_at)
             FROM doctors d INNER JOIN ({}) s ON s.dr_id = d.id
             GROUP BY d.id
             ORDER BY total DESC, d.id ASC
             LIMIT ?1",
            outcome_columns("s", "dr_id"),
            outcome_union(tables, None)
        );
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([limit], |row| {
            Ok(DoctorScreeningTotals {
                doctor_id: row.get(0)?,
                doctor_name: row.get(1)?,
                hospital_name: row.get(2)?,
                total: row.get(3)?,
                suspicious: row.get(4)?,
                healthy: row.get(5)?,
                last_screening: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn recent_children(&self, limit: i64) -> Result<Vec<RecentChildRow>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.age, c.father_name, c.mobile_no, c.heart_status, c.created_at, d.doctor_name
             FROM children c LEFT JOIN doctors d ON d.id = c.dr_id
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |row| {
            Ok(RecentChildRow {
                id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                father_name: row.get(3)?,
                mobile_no: row.get(4)?,
                heart_status: row.get(5)?,
                created_at: row.get(6)?,
                doctor_name: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn average_child_age(&self) -> Result<Option<f64>, RepositoryError> {
        let conn = self.pool.get()?;
        Ok(conn.query_row("SELECT AVG(age) FROM children", [], |row| row.get(0))?)
    }

    async fn most_active_hospital(&self) -> Result<Option<HospitalActivity>, RepositoryError> {
        let conn = self.pool.get()?;
        let hospital = conn
            .query_row(
                "SELECT d.hospital_name, COUNT(c.id) AS screenings
                 FROM doctors d LEFT JOIN children c ON c.dr_id = d.id
                 WHERE d.hospital_name IS NOT NULL AND d.hospital_name != ''
                 GROUP BY d.hospital_name
                 ORDER BY screenings DESC, d.hospital_name ASC
                 LIMIT 1",
                [],
                |row| {
                    Ok(HospitalActivity {
                        hospital_name: row.get(0)?,
                        screenings: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(hospital)
    }

    async fn children_by_weekday(&self, since: &str) -> Result<Vec<WeekdayCount>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT CAST(strftime('%w', created_at) AS INTEGER) AS weekday, COUNT(*)
             FROM children WHERE created_at >= ?1
             GROUP BY weekday ORDER BY weekday",
        )?;
        let rows = stmt.query_map([since], |row| {
            Ok(WeekdayCount {
                weekday: row.get(0)?,
                screenings: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn table_summary(&self, table: ScreeningTable) -> Result<TableSummary, RepositoryError> {
        debug!("Summarising {} table", table.table());
        let c = |name: &str| table.column(name);
        let sql = format!(
            "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN {status} = '{clear}' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {status} = '{suspicious}' THEN 1 ELSE 0 END), 0),
                COUNT(DISTINCT {dr_id}),
                COUNT(DISTINCT {school}),
                COALESCE(SUM(CASE WHEN {aadhar} = 'yes' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN {shramik} = 'yes' THEN 1 ELSE 0 END), 0)
             FROM {table}",
            status = c("heart_status"),
            clear = HEART_CLEAR,
            suspicious = HEART_SUSPICIOUS,
            dr_id = c("dr_id"),
            school = c("school_name"),
            aadhar = c("have_aadhar"),
            shramik = c("have_shramik"),
            table = table.table(),
        );

        let conn = self.pool.get()?;
        let summary = conn.query_row(&sql, [], |row| {
            Ok(TableSummary {
                total: row.get(0)?,
                normal: row.get(1)?,
                suspicious: row.get(2)?,
                distinct_doctors: row.get(3)?,
                distinct_schools: row.get(4)?,
                with_aadhar: row.get(5)?,
                with_shramik: row.get(6)?,
            })
        })?;
        Ok(summary)
    }

    async fn children_per_doctor(&self) -> Result<Vec<DoctorChildrenCount>, RepositoryError> {
        let sql = format!(
            "SELECT d.id, d.doctor_name, d.hospital_name, {}
             FROM doctors d LEFT JOIN children c ON c.dr_id = d.id
             GROUP BY d.id
             ORDER BY total DESC, d.id ASC",
            outcome_columns("c", "id")
        );
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(DoctorChildrenCount {
                doctor_id: row.get(0)?,
                doctor_name: row.get(1)?,
                hospital_name: row.get(2)?,
                total: row.get("total")?,
                suspicious: row.get("suspicious")?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn staff_per_doctor(&self) -> Result<Vec<DoctorStaffCount>, RepositoryError> {
        let per_table = |table: ScreeningTable, alias: &str| {
            format!(
                "LEFT JOIN (
                    SELECT {dr_id} AS dr_id, COUNT(*) AS total,
                        SUM(CASE WHEN {status} = '{suspicious}' THEN 1 ELSE 0 END) AS suspicious
                    FROM {table} GROUP BY {dr_id}
                 ) {alias} ON {alias}.dr_id = d.id",
                dr_id = table.column("dr_id"),
                status = table.column("heart_status"),
                suspicious = HEART_SUSPICIOUS,
                table = table.table(),
                alias = alias,
            )
        };
        let sql = format!(
            "SELECT d.id, d.doctor_name, d.hospital_name,
                COALESCE(t.total, 0) AS teachers,
                COALESCE(e.total, 0) AS employees,
                COALESCE(t.suspicious, 0) + COALESCE(e.suspicious, 0) AS suspicious
             FROM doctors d
             {}
             {}
             WHERE COALESCE(t.total, 0) + COALESCE(e.total, 0) > 0
             ORDER BY COALESCE(t.total, 0) + COALESCE(e.total, 0) DESC, d.id ASC",
            per_table(ScreeningTable::Teacher, "t"),
            per_table(ScreeningTable::Employee, "e"),
        );

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(DoctorStaffCount {
                doctor_id: row.get(0)?,
                doctor_name: row.get(1)?,
                hospital_name: row.get(2)?,
                teachers: row.get(3)?,
                employees: row.get(4)?,
                suspicious: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn hospital_types(&self) -> Result<Vec<HospitalTypeCount>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT hospital_type, COUNT(*) AS count FROM doctors
             WHERE hospital_type IS NOT NULL AND hospital_type != ''
             GROUP BY hospital_type
             ORDER BY count DESC, hospital_type ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HospitalTypeCount {
                hospital_type: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn average_experience(&self) -> Result<Option<f64>, RepositoryError> {
        let conn = self.pool.get()?;
        Ok(conn.query_row("SELECT AVG(experience) FROM doctors", [], |row| row.get(0))?)
    }

    async fn recent_registrations(&self, limit: i64) -> Result<Vec<DoctorRecord>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, doctor_name, hospital_type, hospital_name, phone_no, experience, email,
                    password, created_at, updated_at
             FROM doctors ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |row| {
            Ok(DoctorRecord {
                id: row.get(0)?,
                doctor_name: row.get(1)?,
                hospital_type: row.get(2)?,
                hospital_name: row.get(3)?,
                phone_no: row.get(4)?,
                experience: row.get(5)?,
                email: row.get(6)?,
                password_hash: row.get(7)?,
                created_at: row.get(8)?,
                updated_at: row.get(9)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn registration_trend(&self, since: &str) -> Result<Vec<RegistrationMonth>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT substr(created_at, 1, 7) AS month, COUNT(*) FROM doctors
             WHERE created_at >= ?1
             GROUP BY month ORDER BY month ASC",
        )?;
        let rows = stmt.query_map([since], |row| {
            Ok(RegistrationMonth {
                month: row.get(0)?,
                registrations: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
