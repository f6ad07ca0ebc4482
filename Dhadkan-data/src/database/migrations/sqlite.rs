use rusqlite::Connection;
use tracing::info;

use crate::models::screening::{ScreeningTable, HEART_CLEAR, HEART_SUSPICIOUS};

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_doctors_table(conn)?;
    create_admins_table(conn)?;
    for table in ScreeningTable::ALL {
        create_screening_table(conn, table)?;
        create_screening_indexes(conn, table)?;
    }

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the doctors table
fn create_doctors_table(conn: &Connection) -> Result<(), String> {
    info!("Creating doctors table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS doctors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            doctor_name TEXT NOT NULL,
            hospital_type TEXT,
            hospital_name TEXT,
            phone_no TEXT NOT NULL UNIQUE,
            experience INTEGER NOT NULL DEFAULT 0,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_doctors_created_at ON doctors (created_at DESC)",
        [],
    )
    .map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}

/// Create the admins table
fn create_admins_table(conn: &Connection) -> Result<(), String> {
    info!("Creating admins table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'admin',
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Create one of the screening tables
fn create_screening_table(conn: &Connection, table: ScreeningTable) -> Result<(), String> {
    info!("Creating {} table if not exists", table.table());

    let c = |name: &str| table.column(name);
    let father_name = if table.has_father_name() {
        format!("{} TEXT,", c("father_name"))
    } else {
        String::new()
    };

    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            {id} INTEGER PRIMARY KEY AUTOINCREMENT,
            {dr_id} INTEGER NOT NULL REFERENCES doctors(id),
            {name} TEXT NOT NULL,
            {age} INTEGER NOT NULL,
            {gender} TEXT NOT NULL CHECK ({gender} IN ('पुरुष', 'महिला')),
            {father_name}
            {mobile_no} TEXT NOT NULL UNIQUE,
            {school_name} TEXT NOT NULL,
            {have_aadhar} TEXT NOT NULL CHECK ({have_aadhar} IN ('yes', 'no')),
            {have_shramik} TEXT NOT NULL CHECK ({have_shramik} IN ('yes', 'no')),
            {aadhar_photo} TEXT,
            {shramik_photo} TEXT,
            {heart_status} TEXT NOT NULL CHECK ({heart_status} IN ('{suspicious}', '{clear}')),
            {notes} TEXT,
            {created_at} TEXT NOT NULL
        )",
        table = table.table(),
        id = c("id"),
        dr_id = c("dr_id"),
        name = c("name"),
        age = c("age"),
        gender = c("gender"),
        father_name = father_name,
        mobile_no = c("mobile_no"),
        school_name = c("school_name"),
        have_aadhar = c("have_aadhar"),
        have_shramik = c("have_shramik"),
        aadhar_photo = c("aadhar_photo"),
        shramik_photo = c("shramik_photo"),
        heart_status = c("heart_status"),
        suspicious = HEART_SUSPICIOUS,
        clear = HEART_CLEAR,
        notes = c("notes"),
        created_at = c("created_at"),
    );

    conn.execute(&sql, []).map_err(|e| e.to_string())?;
    Ok(())
}

/// Index the doctor and timestamp columns used by every report
fn create_screening_indexes(conn: &Connection, table: ScreeningTable) -> Result<(), String> {
    for column in ["dr_id", "created_at"] {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table} ({prefixed})",
            table = table.table(),
            column = column,
            prefixed = table.column(column),
        );
        conn.execute(&sql, [])
            .map_err(|e| format!("Failed to create index: {}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn test_staff_tables_use_prefixed_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('teacher')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(columns.contains(&"t_mobile_no".to_string()));
        assert!(!columns.iter().any(|c| c.ends_with("father_name")));
    }

    #[test]
    fn test_heart_status_is_constrained() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO doctors (doctor_name, phone_no, email, password, created_at, updated_at)
             VALUES ('Dr', '9999999999', 'd@x.com', 'x', '2025-01-01 00:00:00', '2025-01-01 00:00:00')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO children (dr_id, name, age, gender, mobile_no, school_name, have_aadhar,
                                   have_shramik, heart_status, created_at)
             VALUES (1, 'A', 5, 'पुरुष', '9876543210', 'S', 'yes', 'no', 'unknown', '2025-01-01 00:00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
