//! Activity feed: human-readable transition events for the notification
//! subsystem. Fire-and-forget: a feed write must never block or fail a
//! transition, so errors are swallowed.

use crate::errors::AppResult;
use chrono::{DateTime, Local};
use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub at: DateTime<Local>,
    pub operation: &'static str,
    pub target: String, // worker id
    pub message: String,
}

pub trait ActivityEmitter {
    fn emit(&self, event: &ActivityEvent);
}

/// Write one feed line into the `activity` table.
pub fn write_activity(conn: &Connection, event: &ActivityEvent) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO activity (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![
        event.at.to_rfc3339(),
        event.operation,
        event.target,
        event.message
    ])?;

    Ok(())
}

/// Emitter backed by the local cache database (always reachable).
pub struct FeedWriter {
    path: String,
}

impl FeedWriter {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl ActivityEmitter for FeedWriter {
    fn emit(&self, event: &ActivityEvent) {
        let Ok(pool) = crate::db::pool::DbPool::new(&self.path) else {
            return;
        };
        if crate::db::migrate::ensure_activity_table(&pool.conn).is_err() {
            return;
        }
        let _ = write_activity(&pool.conn, event);
    }
}
