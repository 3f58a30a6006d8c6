//! Client adapter for the central (authoritative) attendance store.
//!
//! The store is a shared SQLite database, usually on a mounted network
//! volume. Every call opens its own connection with a bounded busy timeout;
//! an open failure, a lock held past the timeout, or any other SQLite error
//! is classified as an outage (`Unavailable`) so the caller can degrade to
//! the local cache instead of failing the worker-facing operation.

use crate::db::queries::{insert_attendance, load_attendance, update_attendance_if_version};
use crate::models::record::AttendanceRecord;
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    /// The store could not be reached within the configured timeout.
    #[error("central store unreachable: {0}")]
    Unavailable(String),

    /// The conditional write lost: the stored version no longer matches the
    /// expected one (a concurrent writer got there first).
    #[error("version conflict on conditional write")]
    Conflict,
}

pub trait RemoteStore {
    fn read(&self, worker_id: &str, date: NaiveDate)
    -> Result<Option<AttendanceRecord>, RemoteError>;

    /// Record-transition-if-invariant-holds: writes `record` only while the
    /// stored version still equals `expected_version` (0 = no row yet).
    fn apply(&self, record: &AttendanceRecord, expected_version: i64) -> Result<(), RemoteError>;
}

pub struct SqliteRemote {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteRemote {
    pub fn new(path: &Path, busy_timeout_ms: u32) -> Self {
        Self {
            path: path.to_path_buf(),
            busy_timeout: Duration::from_millis(u64::from(busy_timeout_ms)),
        }
    }

    fn open(&self) -> Result<Connection, RemoteError> {
        // no CREATE flag: a missing database file is an outage, not a reason
        // to silently start a second authoritative store
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(unavailable)?;
        conn.busy_timeout(self.busy_timeout).map_err(unavailable)?;
        Ok(conn)
    }
}

fn unavailable(e: rusqlite::Error) -> RemoteError {
    RemoteError::Unavailable(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(info, _)
            if info.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl RemoteStore for SqliteRemote {
    fn read(
        &self,
        worker_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RemoteError> {
        let conn = self.open()?;
        load_attendance(&conn, worker_id, &date).map_err(unavailable)
    }

    fn apply(&self, record: &AttendanceRecord, expected_version: i64) -> Result<(), RemoteError> {
        let mut conn = self.open()?;
        let tx = conn.transaction().map_err(unavailable)?;

        let current: Option<i64> = tx
            .query_row(
                "SELECT version FROM attendance WHERE worker_id = ?1 AND date = ?2",
                rusqlite::params![record.worker_id, record.date_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(unavailable)?;

        match current {
            None => {
                if expected_version != 0 {
                    return Err(RemoteError::Conflict);
                }
                insert_attendance(&tx, record).map_err(|e| {
                    if is_unique_violation(&e) {
                        // a concurrent writer inserted the first row for this day
                        RemoteError::Conflict
                    } else {
                        unavailable(e)
                    }
                })?;
            }
            Some(v) if v == expected_version => {
                let changed =
                    update_attendance_if_version(&tx, record, expected_version).map_err(unavailable)?;
                if changed == 0 {
                    return Err(RemoteError::Conflict);
                }
            }
            Some(_) => return Err(RemoteError::Conflict),
        }

        tx.commit().map_err(unavailable)
    }
}
