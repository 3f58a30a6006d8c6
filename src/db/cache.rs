//! Durable per-device cache: one row per worker holding the last known
//! record as JSON, the pending-sync flag, and the base version: the last
//! version the central store confirmed, which the pending transitions were
//! built on. Survives restarts; always reachable.

use crate::db::initialize::init_cache_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::record::AttendanceRecord;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub record: AttendanceRecord,
    pub base_version: i64,
}

pub struct CacheStore {
    pool: DbPool,
}

impl CacheStore {
    /// Open (creating file and schema if needed).
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_cache_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn get(&self, worker_id: &str) -> AppResult<Option<CachedEntry>> {
        let row: Option<(String, i64)> = self
            .pool
            .conn
            .prepare_cached("SELECT record, base_version FROM cache WHERE worker_id = ?1")?
            .query_row([worker_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        match row {
            None => Ok(None),
            Some((json, base_version)) => {
                let record: AttendanceRecord = serde_json::from_str(&json)?;
                Ok(Some(CachedEntry {
                    record,
                    base_version,
                }))
            }
        }
    }

    /// Upsert the worker's row. The `pending` column mirrors the record's
    /// own `pending_sync` flag so the reconciler can index on it.
    pub fn put(&self, entry: &CachedEntry) -> AppResult<()> {
        let json = serde_json::to_string(&entry.record)?;
        self.pool.conn.execute(
            "INSERT INTO cache (worker_id, record, pending, base_version, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(worker_id) DO UPDATE SET
                 record = excluded.record,
                 pending = excluded.pending,
                 base_version = excluded.base_version,
                 updated_at = excluded.updated_at",
            params![
                entry.record.worker_id,
                json,
                entry.record.pending_sync as i64,
                entry.base_version,
                Local::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All rows whose latest transition has not been confirmed yet.
    pub fn pending(&self) -> AppResult<Vec<CachedEntry>> {
        let mut stmt = self.pool.conn.prepare(
            "SELECT record, base_version FROM cache WHERE pending = 1 ORDER BY worker_id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut out = Vec::new();
        for r in rows {
            let (json, base_version) = r?;
            let record: AttendanceRecord = serde_json::from_str(&json)?;
            out.push(CachedEntry {
                record,
                base_version,
            });
        }
        Ok(out)
    }

    pub fn pending_count(&self) -> AppResult<i64> {
        let n = self
            .pool
            .conn
            .query_row("SELECT COUNT(*) FROM cache WHERE pending = 1", [], |row| {
                row.get(0)
            })?;
        Ok(n)
    }
}
