//! High-level attendance operations: read the current record (central store
//! first, local cache as fallback), run the state machine, write the result
//! back through the conditional-write path, and emit a feed event.
//!
//! From the caller's side every operation resolves into exactly one of:
//! applied and confirmed, applied locally pending sync, or rejected.

use crate::core::clock::Clock;
use crate::core::machine;
use crate::core::reconcile::ReconcileLogic;
use crate::db::activity::{ActivityEmitter, ActivityEvent};
use crate::db::cache::{CacheStore, CachedEntry};
use crate::db::remote::{RemoteError, RemoteStore};
use crate::errors::{AppError, AppResult};
use crate::models::record::AttendanceRecord;
use crate::models::transition::TransitionKind;
use crate::utils::time::format_minutes;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct Tracker {
    remote: Box<dyn RemoteStore>,
    cache: CacheStore,
    feed: Box<dyn ActivityEmitter>,
    clock: Box<dyn Clock>,
    // serializes fallback writes per worker within this process; cross-device
    // offline races are left to the reconciler's version rule
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Tracker {
    pub fn new(
        remote: Box<dyn RemoteStore>,
        cache: CacheStore,
        feed: Box<dyn ActivityEmitter>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            remote,
            cache,
            feed,
            clock,
            locks: Mutex::new(HashMap::new()),
        }
    }

    // ------------------------------------------------
    // Operations exposed to callers
    // ------------------------------------------------

    pub fn check_in(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        self.transition(worker_id, TransitionKind::CheckIn)
    }

    pub fn check_out(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        self.transition(worker_id, TransitionKind::CheckOut)
    }

    pub fn break_start(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        self.transition(worker_id, TransitionKind::BreakStart)
    }

    pub fn break_end(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        self.transition(worker_id, TransitionKind::BreakEnd)
    }

    pub fn force_check_out(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        self.transition(worker_id, TransitionKind::ForceCheckOut)
    }

    pub fn reset_day(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        self.transition(worker_id, TransitionKind::ResetDay)
    }

    /// Read-only view of today's record, day-boundary resolved. A record
    /// left open yesterday is not shown; the new day starts clean. Never
    /// writes: a pending cache row is displayed, not reconciled.
    pub fn status(&self, worker_id: &str) -> AppResult<AttendanceRecord> {
        let today = self.clock.today();

        match self.remote.read(worker_id, today) {
            Ok(stored) => {
                let remote_version = stored.as_ref().map(|r| r.version).unwrap_or(0);
                if let Some(entry) = self.cache.get(worker_id)?
                    && entry.record.pending_sync
                    && entry.record.date == today
                    && entry.base_version == remote_version
                {
                    // unsynced local transitions on top of the central copy
                    return Ok(entry.record);
                }
                Ok(machine::resolve_today(stored, worker_id, today))
            }
            Err(_) => {
                let stored = self.cache.get(worker_id)?.map(|e| e.record);
                Ok(machine::resolve_today(stored, worker_id, today))
            }
        }
    }

    /// Full reconciliation pass over every pending cache row.
    pub fn sync(&self) -> AppResult<crate::core::reconcile::SyncReport> {
        ReconcileLogic::sync_pending(
            self.remote.as_ref(),
            &self.cache,
            self.feed.as_ref(),
            self.clock.now(),
        )
    }

    // ------------------------------------------------
    // Core write path
    // ------------------------------------------------

    fn transition(&self, worker_id: &str, kind: TransitionKind) -> AppResult<AttendanceRecord> {
        let lock = self.worker_lock(worker_id);
        let _guard = lock.lock().unwrap_or_else(|p| p.into_inner());

        let now = self.clock.now();
        let today = now.date_naive();

        let (stored, base_version, remote_ok) = self.load_stored(worker_id, today)?;

        // guard the requested transition
        let mut next = if kind == TransitionKind::ResetDay {
            machine::reset_day(stored.as_ref(), worker_id, today, now)?
        } else {
            let current = machine::resolve_today(stored, worker_id, today);
            machine::step(&current, kind, now)?
        };
        next.pending_sync = false;

        if !remote_ok {
            return self.apply_local(next, base_version, kind, now);
        }

        match self.remote.apply(&next, base_version) {
            Ok(()) => {
                self.cache.put(&CachedEntry {
                    base_version: next.version,
                    record: next.clone(),
                })?;
                self.emit(kind, &next, now);
                Ok(next)
            }
            Err(RemoteError::Conflict) => self.retry_after_conflict(worker_id, kind, now, today),
            Err(RemoteError::Unavailable(_)) => self.apply_local(next, base_version, kind, now),
        }
    }

    /// A conditional write lost its race (e.g. a double-click fired two
    /// check-ins). Re-read the fresh record and re-run the guard so the
    /// loser gets the precise rejection; if the guard would still pass, the
    /// race was benign; apply once more against the new version.
    fn retry_after_conflict(
        &self,
        worker_id: &str,
        kind: TransitionKind,
        now: DateTime<Local>,
        today: NaiveDate,
    ) -> AppResult<AttendanceRecord> {
        let fresh = self
            .remote
            .read(worker_id, today)
            .map_err(|e| AppError::Remote(e.to_string()))?;

        let mut next = if kind == TransitionKind::ResetDay {
            machine::reset_day(fresh.as_ref(), worker_id, today, now)?
        } else {
            let current = machine::resolve_today(fresh, worker_id, today);
            machine::step(&current, kind, now)?
        };
        next.pending_sync = false;

        match self.remote.apply(&next, next.version - 1) {
            Ok(()) => {
                self.cache.put(&CachedEntry {
                    base_version: next.version,
                    record: next.clone(),
                })?;
                self.emit(kind, &next, now);
                Ok(next)
            }
            Err(e) => Err(AppError::Remote(format!(
                "conditional write kept losing for '{worker_id}': {e}"
            ))),
        }
    }

    /// Outage path: the transition lands in the cache flagged pending. The
    /// caller still gets the record back: immediate feedback, durability
    /// catches up at the next sync.
    fn apply_local(
        &self,
        mut next: AttendanceRecord,
        base_version: i64,
        kind: TransitionKind,
        now: DateTime<Local>,
    ) -> AppResult<AttendanceRecord> {
        next.pending_sync = true;
        self.cache.put(&CachedEntry {
            base_version,
            record: next.clone(),
        })?;
        self.emit(kind, &next, now);
        Ok(next)
    }

    // ------------------------------------------------
    // Reads
    // ------------------------------------------------

    /// Current stored record for (worker, today) plus the version to use as
    /// the conditional-write base, and whether the central store answered.
    ///
    /// When the store is reachable and this worker still has a pending row,
    /// that row is reconciled first (first contact after an outage drains
    /// it), so the central copy read afterwards is current.
    fn load_stored(
        &self,
        worker_id: &str,
        today: NaiveDate,
    ) -> AppResult<(Option<AttendanceRecord>, i64, bool)> {
        let mut remote_view = self.remote.read(worker_id, today);

        if remote_view.is_ok()
            && let Some(entry) = self.cache.get(worker_id)?
            && entry.record.pending_sync
        {
            ReconcileLogic::reconcile_entry(
                self.remote.as_ref(),
                &self.cache,
                self.feed.as_ref(),
                &entry,
                self.clock.now(),
            )?;
            remote_view = self.remote.read(worker_id, today);
        }

        match remote_view {
            Ok(stored) => {
                let base = stored.as_ref().map(|r| r.version).unwrap_or(0);
                Ok((stored, base, true))
            }
            Err(_) => match self.cache.get(worker_id)? {
                // the cached base version only describes the cached record's
                // own day; a fresh day starts from version 0
                Some(entry) if entry.record.date == today => {
                    let base = entry.base_version;
                    Ok((Some(entry.record), base, false))
                }
                _ => Ok((None, 0, false)),
            },
        }
    }

    fn worker_lock(&self, worker_id: &str) -> Arc<Mutex<()>> {
        let mut map = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        map.entry(worker_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ------------------------------------------------
    // Feed
    // ------------------------------------------------

    fn emit(&self, kind: TransitionKind, rec: &AttendanceRecord, now: DateTime<Local>) {
        let when = now.format("%H:%M");
        let mut message = match kind {
            TransitionKind::CheckIn => format!("Checked in at {when}"),
            TransitionKind::CheckOut => format!(
                "Checked out at {when} (worked {}, breaks {})",
                format_minutes(rec.work_minutes),
                format_minutes(rec.break_minutes)
            ),
            TransitionKind::BreakStart => format!("Break started at {when}"),
            TransitionKind::BreakEnd => format!(
                "Break ended at {when} (total breaks {})",
                format_minutes(rec.break_minutes)
            ),
            TransitionKind::ForceCheckOut => format!(
                "Force check-out at {when} (worked {}, breaks {})",
                format_minutes(rec.work_minutes),
                format_minutes(rec.break_minutes)
            ),
            TransitionKind::ResetDay => format!("Day reset for {}", rec.date_str()),
        };
        if rec.pending_sync {
            message.push_str(" [pending sync]");
        }

        self.feed.emit(&ActivityEvent {
            at: now,
            operation: kind.op_str(),
            target: rec.worker_id.clone(),
            message,
        });
    }
}
