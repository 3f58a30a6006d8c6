use crate::errors::AppError;
use crate::models::record::AttendanceRecord;
use crate::models::status::DayStatus;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn parse_instant(col: &str, raw: Option<String>) -> Result<Option<DateTime<Local>>> {
    match raw {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Local)))
            .map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(AppError::InvalidTimestamp(format!("{col}: {s}"))),
                )
            }),
    }
}

pub fn map_attendance_row(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let status_str: String = row.get("status")?;
    let status = DayStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(AttendanceRecord {
        worker_id: row.get("worker_id")?,
        date,
        status,
        check_in: parse_instant("check_in", row.get("check_in")?)?,
        check_out: parse_instant("check_out", row.get("check_out")?)?,
        break_start: parse_instant("break_start", row.get("break_start")?)?,
        break_end: parse_instant("break_end", row.get("break_end")?)?,
        break_minutes: row.get("break_minutes")?,
        work_minutes: row.get("work_minutes")?,
        // rows in the central store are confirmed by definition
        pending_sync: false,
        version: row.get("version")?,
    })
}

pub fn load_attendance(
    conn: &Connection,
    worker_id: &str,
    date: &NaiveDate,
) -> Result<Option<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT worker_id, date, status, check_in, check_out, break_start, break_end,
                break_minutes, work_minutes, version
         FROM attendance
         WHERE worker_id = ?1 AND date = ?2",
    )?;

    stmt.query_row(
        params![worker_id, date.format("%Y-%m-%d").to_string()],
        map_attendance_row,
    )
    .optional()
}

fn instant_str(t: Option<DateTime<Local>>) -> Option<String> {
    t.map(|dt| dt.to_rfc3339())
}

pub fn insert_attendance(conn: &Connection, rec: &AttendanceRecord) -> Result<usize> {
    conn.execute(
        "INSERT INTO attendance (worker_id, date, status, check_in, check_out, break_start,
                                 break_end, break_minutes, work_minutes, version, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            rec.worker_id,
            rec.date_str(),
            rec.status.to_db_str(),
            instant_str(rec.check_in),
            instant_str(rec.check_out),
            instant_str(rec.break_start),
            instant_str(rec.break_end),
            rec.break_minutes,
            rec.work_minutes,
            rec.version,
            Local::now().to_rfc3339(),
        ],
    )
}

/// Conditional update: touches the row only while its version still matches
/// `expected_version`. Returns the number of rows changed (0 = lost the race).
pub fn update_attendance_if_version(
    conn: &Connection,
    rec: &AttendanceRecord,
    expected_version: i64,
) -> Result<usize> {
    conn.execute(
        "UPDATE attendance
         SET status = ?3, check_in = ?4, check_out = ?5, break_start = ?6, break_end = ?7,
             break_minutes = ?8, work_minutes = ?9, version = ?10, updated_at = ?11
         WHERE worker_id = ?1 AND date = ?2 AND version = ?12",
        params![
            rec.worker_id,
            rec.date_str(),
            rec.status.to_db_str(),
            instant_str(rec.check_in),
            instant_str(rec.check_out),
            instant_str(rec.break_start),
            instant_str(rec.break_end),
            rec.break_minutes,
            rec.work_minutes,
            rec.version,
            Local::now().to_rfc3339(),
            expected_version,
        ],
    )
}

pub fn attendance_count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))
}

pub fn activity_count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM activity", [], |row| row.get(0))
}
