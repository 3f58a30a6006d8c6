use crate::cli::commands::{build_tracker, resolve_worker};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::status::StatusLogic;
use crate::errors::{AppError, AppResult};
use crate::models::record::AttendanceRecord;
use crate::ui::messages;

/// Shared handler for every state-machine command
/// (`in`, `out`, `break --start/--end`, `reset`).
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let worker = resolve_worker(cli, cfg)?;
    let tracker = build_tracker(cli, cfg)?;

    let (verb, rec): (&str, AttendanceRecord) = match &cli.command {
        Commands::In => ("Checked in", tracker.check_in(&worker)?),
        Commands::Out { force: false } => ("Checked out", tracker.check_out(&worker)?),
        Commands::Out { force: true } => ("Force check-out", tracker.force_check_out(&worker)?),
        Commands::Break { start: true, .. } => ("Break started", tracker.break_start(&worker)?),
        Commands::Break { end: true, .. } => ("Break ended", tracker.break_end(&worker)?),
        Commands::Break { .. } => {
            return Err(AppError::Other(
                "Nothing to do: specify --start or --end.".into(),
            ));
        }
        Commands::Reset => ("Day reset", tracker.reset_day(&worker)?),
        _ => return Ok(()),
    };

    if rec.pending_sync {
        messages::pending(format!(
            "{verb} for {worker}: recorded locally, central store unreachable (will sync)."
        ));
    } else {
        messages::success(format!("{verb} for {worker}."));
    }

    StatusLogic::print_record(&rec);
    Ok(())
}
