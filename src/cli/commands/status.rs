use crate::cli::commands::{build_tracker, resolve_worker};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::status::StatusLogic;
use crate::errors::AppResult;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let worker = resolve_worker(cli, cfg)?;
    let tracker = build_tracker(cli, cfg)?;

    let rec = tracker.status(&worker)?;
    StatusLogic::print_record(&rec);

    Ok(())
}
