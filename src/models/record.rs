use super::status::DayStatus;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One attendance record per worker per calendar day, keyed `(worker_id, date)`.
/// Mutated only through `core::machine::step`; never deleted. A day that ends
/// without a check-out simply stays incomplete and the next day starts fresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceRecord {
    pub worker_id: String,
    pub date: NaiveDate,          // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub status: DayStatus,        // ⇔ attendance.status
    pub check_in: Option<DateTime<Local>>,
    pub check_out: Option<DateTime<Local>>,
    pub break_start: Option<DateTime<Local>>, // current or most recent break
    pub break_end: Option<DateTime<Local>>,
    pub break_minutes: i64, // cumulative across all breaks this day
    pub work_minutes: i64,  // materialized at check-out, 0 before
    pub pending_sync: bool, // durable only in the local cache so far
    pub version: i64,       // +1 per accepted transition
}

impl AttendanceRecord {
    /// The implicit state of a day nothing has happened on yet.
    pub fn fresh(worker_id: &str, date: NaiveDate) -> Self {
        Self {
            worker_id: worker_id.to_string(),
            date,
            status: DayStatus::NotCheckedIn,
            check_in: None,
            check_out: None,
            break_start: None,
            break_end: None,
            break_minutes: 0,
            work_minutes: 0,
            pending_sync: false,
            version: 0,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// "HH:MM" or the placeholder used across the UI for unset instants.
    pub fn time_str(t: Option<DateTime<Local>>) -> String {
        match t {
            Some(dt) => dt.format("%H:%M").to_string(),
            None => "--:--".to_string(),
        }
    }

    /// Check the at-rest invariants; used by `db --check` and the tests.
    pub fn invariants_ok(&self) -> bool {
        let in_set = self.check_in.is_some();
        let out_set = self.check_out.is_some();

        let i1 = in_set
            == matches!(
                self.status,
                DayStatus::CheckedIn | DayStatus::OnBreak | DayStatus::CheckedOut
            );
        let i2 = out_set == matches!(self.status, DayStatus::CheckedOut);
        let i3 = !(self.break_start.is_some() && self.break_end.is_none())
            || self.status == DayStatus::OnBreak;
        let i5 = self.work_minutes >= 0 && self.break_minutes >= 0;

        i1 && i2 && i3 && i5
    }
}
