use thiserror::Error;

/// Typed outcome returned instead of applying a transition when the request
/// conflicts with the current day record. Never retried automatically:
/// retrying would hit the same invariant again.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("Already checked in today")]
    AlreadyCheckedInToday,

    #[error("Today is already completed (checked in and out)")]
    AlreadyCompletedToday,

    #[error("Already checked out today")]
    AlreadyCheckedOutToday,

    #[error("Not checked in yet")]
    NotCheckedInYet,

    #[error("Not on break")]
    NotOnBreak,

    #[error("A break requires an active check-in")]
    BreakRequiresActiveCheckIn,

    #[error("Reset is only allowed once today is checked out")]
    ResetRequiresCompletedDay,
}
