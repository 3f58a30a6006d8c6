use rusqlite::{Connection, Result};

/// Ensure the `attendance` table exists in the central database.
/// The UNIQUE index on (worker_id, date) is the arbiter of the concurrent
/// first-insert race; the `version` column is the arbiter of every
/// subsequent conditional update.
pub fn ensure_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id     TEXT NOT NULL,
            date          TEXT NOT NULL,
            status        TEXT NOT NULL CHECK(status IN ('not_checked_in','checked_in','on_break','checked_out')),
            check_in      TEXT,
            check_out     TEXT,
            break_start   TEXT,
            break_end     TEXT,
            break_minutes INTEGER NOT NULL DEFAULT 0,
            work_minutes  INTEGER NOT NULL DEFAULT 0,
            version       INTEGER NOT NULL DEFAULT 0,
            updated_at    TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_worker_date ON attendance(worker_id, date);
        "#,
    )?;
    Ok(())
}

/// Ensure the per-worker `cache` table exists in the local database.
/// One row per worker: the last known record as JSON, plus the sync state
/// the reconciler needs (pending flag and the last remote-confirmed version
/// the pending chain was built on).
pub fn ensure_cache_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS cache (
            worker_id    TEXT PRIMARY KEY,
            record       TEXT NOT NULL,
            pending      INTEGER NOT NULL DEFAULT 0,
            base_version INTEGER NOT NULL DEFAULT 0,
            updated_at   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Ensure that the `activity` feed table exists with the modern schema.
pub fn ensure_activity_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS activity (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// All schema the local cache database needs.
pub fn run_cache_migrations(conn: &Connection) -> Result<()> {
    ensure_cache_table(conn)?;
    ensure_activity_table(conn)?;
    Ok(())
}

/// All schema the central database needs.
pub fn run_remote_migrations(conn: &Connection) -> Result<()> {
    ensure_attendance_table(conn)?;
    Ok(())
}
