use serde::{Deserialize, Serialize};

/// Where a worker stands within the current calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayStatus {
    NotCheckedIn,
    CheckedIn,
    OnBreak,
    CheckedOut,
}

impl DayStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DayStatus::NotCheckedIn => "not_checked_in",
            DayStatus::CheckedIn => "checked_in",
            DayStatus::OnBreak => "on_break",
            DayStatus::CheckedOut => "checked_out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "not_checked_in" => Some(DayStatus::NotCheckedIn),
            "checked_in" => Some(DayStatus::CheckedIn),
            "on_break" => Some(DayStatus::OnBreak),
            "checked_out" => Some(DayStatus::CheckedOut),
            _ => None,
        }
    }

    /// Human label used by `status` output and feed messages.
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::NotCheckedIn => "not checked in",
            DayStatus::CheckedIn => "checked in",
            DayStatus::OnBreak => "on break",
            DayStatus::CheckedOut => "checked out",
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, DayStatus::CheckedIn | DayStatus::OnBreak)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DayStatus::CheckedOut)
    }
}
