//! Reconciliation of fallback-recorded transitions with the central store.
//!
//! Conflict rule: the central store wins outright. If it holds a higher
//! version than the one the pending chain was built on, someone else wrote
//! while this device was offline; replaying the stale chain would violate
//! the one-check-in/one-check-out-per-day invariant, so the local pending
//! transitions are discarded and a `sync-conflict` feed event is emitted,
//! surfaced for operator review, never silently dropped.

use crate::db::activity::{ActivityEmitter, ActivityEvent};
use crate::db::cache::{CacheStore, CachedEntry};
use crate::db::remote::{RemoteError, RemoteStore};
use crate::errors::AppResult;
use crate::utils::time::format_minutes;
use chrono::{DateTime, Local};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub replayed: usize,
    pub conflicts: usize,
    pub still_pending: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Replayed,
    RemoteWon,
    Offline,
}

pub struct ReconcileLogic;

impl ReconcileLogic {
    /// One full pass over every pending cache row. Stops early when the
    /// central store turns out to be (still) unreachable; whatever was not
    /// processed simply stays pending for the next pass.
    pub fn sync_pending(
        remote: &dyn RemoteStore,
        cache: &CacheStore,
        feed: &dyn ActivityEmitter,
        now: DateTime<Local>,
    ) -> AppResult<SyncReport> {
        let pending = cache.pending()?;
        let total = pending.len();
        let mut report = SyncReport::default();
        let mut processed = 0usize;

        for entry in &pending {
            match Self::reconcile_entry(remote, cache, feed, entry, now)? {
                Outcome::Replayed => report.replayed += 1,
                Outcome::RemoteWon => report.conflicts += 1,
                Outcome::Offline => break,
            }
            processed += 1;
        }

        report.still_pending = total - processed;
        Ok(report)
    }

    /// Reconcile a single worker's pending row.
    pub fn reconcile_entry(
        remote: &dyn RemoteStore,
        cache: &CacheStore,
        feed: &dyn ActivityEmitter,
        entry: &CachedEntry,
        now: DateTime<Local>,
    ) -> AppResult<Outcome> {
        let rec = &entry.record;

        let remote_cur = match remote.read(&rec.worker_id, rec.date) {
            Ok(v) => v,
            Err(_) => return Ok(Outcome::Offline),
        };

        if let Some(remote_rec) = &remote_cur
            && remote_rec.version > entry.base_version
        {
            return Self::adopt_remote(cache, feed, entry, remote_rec.clone(), now);
        }

        // central store is where we left it: push the net local state
        let mut confirmed = rec.clone();
        confirmed.pending_sync = false;

        match remote.apply(&confirmed, entry.base_version) {
            Ok(()) => {
                cache.put(&CachedEntry {
                    base_version: confirmed.version,
                    record: confirmed.clone(),
                })?;
                feed.emit(&ActivityEvent {
                    at: now,
                    operation: "sync-replay",
                    target: confirmed.worker_id.clone(),
                    message: format!(
                        "Confirmed offline transitions for {} ({} now at v{})",
                        confirmed.worker_id,
                        confirmed.date_str(),
                        confirmed.version
                    ),
                });
                Ok(Outcome::Replayed)
            }
            Err(RemoteError::Conflict) => {
                // lost a race between read and apply; re-read and let the
                // central copy win
                match remote.read(&rec.worker_id, rec.date) {
                    Ok(Some(remote_rec)) => {
                        Self::adopt_remote(cache, feed, entry, remote_rec, now)
                    }
                    _ => Ok(Outcome::Offline),
                }
            }
            Err(RemoteError::Unavailable(_)) => Ok(Outcome::Offline),
        }
    }

    fn adopt_remote(
        cache: &CacheStore,
        feed: &dyn ActivityEmitter,
        entry: &CachedEntry,
        remote_rec: crate::models::record::AttendanceRecord,
        now: DateTime<Local>,
    ) -> AppResult<Outcome> {
        let local = &entry.record;
        let message = format!(
            "Discarded offline transitions for {} on {}: central store is newer \
             (local v{} on base v{}, central v{}, central status '{}', breaks {})",
            local.worker_id,
            local.date_str(),
            local.version,
            entry.base_version,
            remote_rec.version,
            remote_rec.status.label(),
            format_minutes(remote_rec.break_minutes),
        );

        cache.put(&CachedEntry {
            base_version: remote_rec.version,
            record: remote_rec,
        })?;

        feed.emit(&ActivityEvent {
            at: now,
            operation: "sync-conflict",
            target: local.worker_id.clone(),
            message,
        });

        Ok(Outcome::RemoteWon)
    }
}
