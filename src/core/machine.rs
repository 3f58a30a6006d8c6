//! The attendance state machine. Pure: no IO, no wall clock; callers pass
//! the current record and `now`, and get back either the next record or a
//! typed rejection. Every accepted transition bumps `version` exactly once.

use crate::models::record::AttendanceRecord;
use crate::models::rejection::RejectionReason;
use crate::models::status::DayStatus;
use crate::models::transition::TransitionKind;
use crate::utils::time::minutes_between;
use chrono::{DateTime, Local, NaiveDate};

/// Day-boundary rule: a stored record older than today is treated as if no
/// record existed. A new day always starts at `NotCheckedIn`, regardless of
/// whether the previous day reached `CheckedOut`.
pub fn resolve_today(
    stored: Option<AttendanceRecord>,
    worker_id: &str,
    today: NaiveDate,
) -> AttendanceRecord {
    match stored {
        Some(rec) if rec.date == today => rec,
        _ => AttendanceRecord::fresh(worker_id, today),
    }
}

/// Apply one transition to today's record.
pub fn step(
    current: &AttendanceRecord,
    kind: TransitionKind,
    now: DateTime<Local>,
) -> Result<AttendanceRecord, RejectionReason> {
    let mut next = current.clone();

    match kind {
        TransitionKind::CheckIn => match current.status {
            DayStatus::NotCheckedIn => {
                next.status = DayStatus::CheckedIn;
                next.check_in = Some(now);
            }
            DayStatus::CheckedOut => return Err(RejectionReason::AlreadyCompletedToday),
            DayStatus::CheckedIn | DayStatus::OnBreak => {
                return Err(RejectionReason::AlreadyCheckedInToday);
            }
        },

        TransitionKind::BreakStart => match current.status {
            DayStatus::CheckedIn => {
                next.status = DayStatus::OnBreak;
                next.break_start = Some(now);
                next.break_end = None;
            }
            // covers "not checked in" and "already on break"
            _ => return Err(RejectionReason::BreakRequiresActiveCheckIn),
        },

        TransitionKind::BreakEnd => match current.status {
            DayStatus::OnBreak => close_break(&mut next, now),
            _ => return Err(RejectionReason::NotOnBreak),
        },

        TransitionKind::CheckOut | TransitionKind::ForceCheckOut => match current.status {
            DayStatus::CheckedIn | DayStatus::OnBreak => {
                if current.status == DayStatus::OnBreak {
                    close_break(&mut next, now);
                }
                next.status = DayStatus::CheckedOut;
                next.check_out = Some(now);
                let elapsed = next.check_in.map(|t| minutes_between(t, now)).unwrap_or(0);
                next.work_minutes = (elapsed - next.break_minutes).max(0);
            }
            DayStatus::NotCheckedIn => return Err(RejectionReason::NotCheckedInYet),
            DayStatus::CheckedOut => return Err(RejectionReason::AlreadyCheckedOutToday),
        },

        TransitionKind::ResetDay => match current.status {
            DayStatus::CheckedOut => {
                next = AttendanceRecord::fresh(&current.worker_id, current.date);
                next.version = current.version;
            }
            _ => return Err(RejectionReason::ResetRequiresCompletedDay),
        },
    }

    next.version = current.version + 1;
    Ok(next)
}

/// Operator reset. Valid from `CheckedOut`, or from any state when the stored
/// record belongs to an earlier date; in that case it just materializes the
/// fresh record for today (a past date's record is never mutated).
pub fn reset_day(
    stored: Option<&AttendanceRecord>,
    worker_id: &str,
    today: NaiveDate,
    now: DateTime<Local>,
) -> Result<AttendanceRecord, RejectionReason> {
    match stored {
        Some(rec) if rec.date == today => step(rec, TransitionKind::ResetDay, now),
        _ => {
            let mut next = AttendanceRecord::fresh(worker_id, today);
            next.version = 1;
            Ok(next)
        }
    }
}

fn close_break(rec: &mut AttendanceRecord, now: DateTime<Local>) {
    if let Some(started) = rec.break_start {
        rec.break_minutes += minutes_between(started, now).max(0);
    }
    rec.break_end = Some(now);
    rec.status = DayStatus::CheckedIn;
}
