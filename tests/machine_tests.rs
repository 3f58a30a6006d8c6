//! Library-level tests of the pure transition function.

use attlog::core::machine::{reset_day, resolve_today, step};
use attlog::models::record::AttendanceRecord;
use attlog::models::rejection::RejectionReason;
use attlog::models::status::DayStatus;
use attlog::models::transition::TransitionKind;
use chrono::{DateTime, Local, NaiveDate, TimeZone};

fn at(h: u32, m: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

#[test]
fn check_in_sets_time_and_bumps_version() {
    let fresh = AttendanceRecord::fresh("W1", day());

    let rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    assert_eq!(rec.status, DayStatus::CheckedIn);
    assert_eq!(rec.check_in, Some(at(9, 0)));
    assert_eq!(rec.version, 1);
    assert!(rec.invariants_ok());
}

#[test]
fn check_out_without_break_is_the_full_span() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let rec = step(&rec, TransitionKind::CheckOut, at(17, 0)).unwrap();

    assert_eq!(rec.status, DayStatus::CheckedOut);
    assert_eq!(rec.work_minutes, 8 * 60);
    assert_eq!(rec.break_minutes, 0);
    assert_eq!(rec.version, 2);
    assert!(rec.invariants_ok());
}

#[test]
fn a_break_reduces_worked_time_by_its_duration() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let no_break_total = step(&rec, TransitionKind::CheckOut, at(17, 0))
        .unwrap()
        .work_minutes;

    let rec = step(&rec, TransitionKind::BreakStart, at(13, 0)).unwrap();
    assert_eq!(rec.status, DayStatus::OnBreak);
    let rec = step(&rec, TransitionKind::BreakEnd, at(13, 30)).unwrap();
    assert_eq!(rec.status, DayStatus::CheckedIn);
    assert_eq!(rec.break_minutes, 30);
    // the most recent break stays inspectable after it ends
    assert_eq!(rec.break_start, Some(at(13, 0)));
    assert_eq!(rec.break_end, Some(at(13, 30)));

    let rec = step(&rec, TransitionKind::CheckOut, at(17, 0)).unwrap();
    assert_eq!(rec.work_minutes, no_break_total - 30);
    assert!(rec.invariants_ok());
}

#[test]
fn breaks_accumulate_across_the_day() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let mut rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    for (s, e) in [(10, 15), (13, 0)] {
        rec = step(&rec, TransitionKind::BreakStart, at(s as u32, e as u32)).unwrap();
        rec = step(&rec, TransitionKind::BreakEnd, at(s as u32, e as u32 + 20)).unwrap();
    }

    assert_eq!(rec.break_minutes, 40);
    let rec = step(&rec, TransitionKind::CheckOut, at(17, 0)).unwrap();
    assert_eq!(rec.work_minutes, 8 * 60 - 40);
}

#[test]
fn check_out_from_break_closes_it_first() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let rec = step(&rec, TransitionKind::BreakStart, at(16, 0)).unwrap();
    let rec = step(&rec, TransitionKind::CheckOut, at(17, 0)).unwrap();

    assert_eq!(rec.status, DayStatus::CheckedOut);
    assert_eq!(rec.break_minutes, 60);
    assert_eq!(rec.break_end, Some(at(17, 0)));
    assert_eq!(rec.work_minutes, 8 * 60 - 60);
    assert!(rec.invariants_ok());
}

#[test]
fn rejection_table() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let checked_in = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let on_break = step(&checked_in, TransitionKind::BreakStart, at(13, 0)).unwrap();
    let done = step(&checked_in, TransitionKind::CheckOut, at(17, 0)).unwrap();

    let cases: [(&AttendanceRecord, TransitionKind, RejectionReason); 8] = [
        (&checked_in, TransitionKind::CheckIn, RejectionReason::AlreadyCheckedInToday),
        (&on_break, TransitionKind::CheckIn, RejectionReason::AlreadyCheckedInToday),
        (&done, TransitionKind::CheckIn, RejectionReason::AlreadyCompletedToday),
        (&fresh, TransitionKind::CheckOut, RejectionReason::NotCheckedInYet),
        (&done, TransitionKind::CheckOut, RejectionReason::AlreadyCheckedOutToday),
        (&fresh, TransitionKind::BreakStart, RejectionReason::BreakRequiresActiveCheckIn),
        (&on_break, TransitionKind::BreakStart, RejectionReason::BreakRequiresActiveCheckIn),
        (&checked_in, TransitionKind::BreakEnd, RejectionReason::NotOnBreak),
    ];

    for (rec, kind, expected) in cases {
        let before = rec.clone();
        assert_eq!(step(rec, kind, at(18, 0)), Err(expected));
        // a rejection never mutates the record
        assert_eq!(*rec, before);
    }
}

#[test]
fn force_check_out_applies_from_break() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let rec = step(&rec, TransitionKind::BreakStart, at(13, 0)).unwrap();
    let rec = step(&rec, TransitionKind::ForceCheckOut, at(14, 0)).unwrap();

    assert_eq!(rec.status, DayStatus::CheckedOut);
    assert_eq!(rec.break_minutes, 60);
    assert!(rec.invariants_ok());
}

#[test]
fn negative_worked_time_is_clamped() {
    // a check-out right after a long break can arithmetically go negative
    let fresh = AttendanceRecord::fresh("W1", day());
    let mut rec = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    rec.break_minutes = 600;
    let rec = step(&rec, TransitionKind::CheckOut, at(17, 0)).unwrap();

    assert_eq!(rec.work_minutes, 0);
    assert!(rec.invariants_ok());
}

#[test]
fn resolve_today_rolls_stale_records_over() {
    let yesterday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let mut stale = AttendanceRecord::fresh("W1", yesterday);
    stale.status = DayStatus::CheckedIn;
    stale.check_in = Some(at(9, 0));
    stale.version = 1;

    let resolved = resolve_today(Some(stale), "W1", day());
    assert_eq!(resolved.date, day());
    assert_eq!(resolved.status, DayStatus::NotCheckedIn);
    assert_eq!(resolved.version, 0);

    let same_day = resolve_today(
        Some(AttendanceRecord::fresh("W1", day())),
        "W1",
        day(),
    );
    assert_eq!(same_day.date, day());

    let none = resolve_today(None, "W1", day());
    assert_eq!(none.status, DayStatus::NotCheckedIn);
}

#[test]
fn reset_day_rules() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let checked_in = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let done = step(&checked_in, TransitionKind::CheckOut, at(17, 0)).unwrap();

    // same-day reset requires a completed day
    assert_eq!(
        reset_day(Some(&checked_in), "W1", day(), at(17, 10)),
        Err(RejectionReason::ResetRequiresCompletedDay)
    );

    let reset = reset_day(Some(&done), "W1", day(), at(17, 10)).unwrap();
    assert_eq!(reset.status, DayStatus::NotCheckedIn);
    assert_eq!(reset.date, day());
    assert_eq!(reset.version, done.version + 1);

    // stale record: reset from any state, materializing today
    let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
    let reset = reset_day(Some(&checked_in), "W1", tomorrow, at(8, 0)).unwrap();
    assert_eq!(reset.date, tomorrow);
    assert_eq!(reset.status, DayStatus::NotCheckedIn);
    assert_eq!(reset.version, 1);
}

#[test]
fn every_accepted_transition_bumps_version_once() {
    let fresh = AttendanceRecord::fresh("W1", day());
    let r1 = step(&fresh, TransitionKind::CheckIn, at(9, 0)).unwrap();
    let r2 = step(&r1, TransitionKind::BreakStart, at(13, 0)).unwrap();
    let r3 = step(&r2, TransitionKind::BreakEnd, at(13, 30)).unwrap();
    let r4 = step(&r3, TransitionKind::CheckOut, at(17, 0)).unwrap();

    assert_eq!(
        [r1.version, r2.version, r3.version, r4.version],
        [1, 2, 3, 4]
    );
}
