use predicates::str::contains;

mod common;
use common::{atl, init_stores, run_at, setup_dbs};

#[test]
fn test_full_day_with_break() {
    let (remote, cache) = setup_dbs("full_day");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"])
        .success()
        .stdout(contains("Checked in for W1"))
        .stdout(contains("09:00"));

    run_at(&remote, &cache, "W1", "2025-06-02T13:00", &["break", "--start"])
        .success()
        .stdout(contains("Break started"));

    run_at(&remote, &cache, "W1", "2025-06-02T13:30", &["break", "--end"])
        .success()
        .stdout(contains("Break ended"))
        .stdout(contains("00:30"));

    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"])
        .success()
        .stdout(contains("Checked out for W1"))
        // 8h elapsed minus 30 min of breaks
        .stdout(contains("07:30"));
}

#[test]
fn test_checkout_without_break_counts_full_span() {
    let (remote, cache) = setup_dbs("no_break_day");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();
    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"])
        .success()
        .stdout(contains("08:00"))
        .stdout(contains("checked out"));
}

#[test]
fn test_double_check_in_is_rejected() {
    let (remote, cache) = setup_dbs("double_in");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T09:05", &["in"])
        .failure()
        .stderr(contains("Already checked in today"));

    // the first check-in time is untouched
    run_at(&remote, &cache, "W1", "2025-06-02T09:10", &["status"])
        .success()
        .stdout(contains("09:00"));
}

#[test]
fn test_check_out_requires_check_in() {
    let (remote, cache) = setup_dbs("out_first");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"])
        .failure()
        .stderr(contains("Not checked in yet"));
}

#[test]
fn test_double_check_out_is_rejected() {
    let (remote, cache) = setup_dbs("double_out");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();
    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T17:05", &["out"])
        .failure()
        .stderr(contains("Already checked out today"));
}

#[test]
fn test_check_in_after_completed_day_is_rejected() {
    let (remote, cache) = setup_dbs("in_after_done");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();
    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T18:00", &["in"])
        .failure()
        .stderr(contains("already completed"));
}

#[test]
fn test_break_requires_active_check_in() {
    let (remote, cache) = setup_dbs("break_guards");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["break", "--start"])
        .failure()
        .stderr(contains("break requires an active check-in"));

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();
    run_at(&remote, &cache, "W1", "2025-06-02T13:00", &["break", "--start"]).success();

    // already on break: starting another one is the same rejection
    run_at(&remote, &cache, "W1", "2025-06-02T13:10", &["break", "--start"])
        .failure()
        .stderr(contains("break requires an active check-in"));
}

#[test]
fn test_break_end_requires_open_break() {
    let (remote, cache) = setup_dbs("break_end_guard");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T13:30", &["break", "--end"])
        .failure()
        .stderr(contains("Not on break"));
}

#[test]
fn test_check_out_while_on_break_closes_the_break() {
    let (remote, cache) = setup_dbs("out_on_break");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();
    run_at(&remote, &cache, "W1", "2025-06-02T16:00", &["break", "--start"]).success();

    // the open break (16:00 → 17:00) is closed first, then the day
    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"])
        .success()
        .stdout(contains("checked out"))
        .stdout(contains("07:00"));
}

#[test]
fn test_force_check_out() {
    let (remote, cache) = setup_dbs("force_out");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T17:45", &["out", "--force"])
        .success()
        .stdout(contains("Force check-out"));

    // logged under its own feed operation, not as a normal check-out
    atl()
        .args(["--remote", &remote, "--cache", &cache, "feed", "--print"])
        .assert()
        .success()
        .stdout(contains("force-check-out"));
}

#[test]
fn test_reset_day_requires_completed_day() {
    let (remote, cache) = setup_dbs("reset_guard");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T10:00", &["reset"])
        .failure()
        .stderr(contains("Reset is only allowed"));
}

#[test]
fn test_reset_day_reopens_a_completed_day() {
    let (remote, cache) = setup_dbs("reset_ok");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["in"]).success();
    run_at(&remote, &cache, "W1", "2025-06-02T17:00", &["out"]).success();

    run_at(&remote, &cache, "W1", "2025-06-02T17:10", &["reset"])
        .success()
        .stdout(contains("Day reset"));

    run_at(&remote, &cache, "W1", "2025-06-02T17:15", &["status"])
        .success()
        .stdout(contains("not checked in"));

    // after a reset, the day can start again
    run_at(&remote, &cache, "W1", "2025-06-02T17:20", &["in"]).success();
}

#[test]
fn test_break_missing_flag_is_an_error() {
    let (remote, cache) = setup_dbs("break_no_flag");
    init_stores(&remote, &cache);

    run_at(&remote, &cache, "W1", "2025-06-02T09:00", &["break"])
        .failure()
        .stderr(contains("specify --start or --end"));
}
