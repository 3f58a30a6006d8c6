use crate::cli::commands::build_tracker;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let tracker = build_tracker(cli, cfg)?;
    let report = tracker.sync()?;

    if report.replayed == 0 && report.conflicts == 0 && report.still_pending == 0 {
        messages::info("Nothing pending; cache and central store are in sync.");
        return Ok(());
    }

    if report.replayed > 0 {
        messages::success(format!(
            "Confirmed {} offline-recorded day(s) with the central store.",
            report.replayed
        ));
    }
    if report.conflicts > 0 {
        messages::warning(format!(
            "{} day(s) had newer central data; local transitions were discarded (see `feed --print`).",
            report.conflicts
        ));
    }
    if report.still_pending > 0 {
        messages::pending(format!(
            "{} day(s) still pending; central store unreachable.",
            report.still_pending
        ));
    }

    Ok(())
}
