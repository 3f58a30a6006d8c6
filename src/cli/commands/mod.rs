pub mod config;
pub mod db;
pub mod feed;
pub mod init;
pub mod status;
pub mod sync;
pub mod transition;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::clock::{Clock, FixedClock, SystemClock};
use crate::core::tracker::Tracker;
use crate::db::activity::FeedWriter;
use crate::db::cache::CacheStore;
use crate::db::remote::SqliteRemote;
use crate::errors::{AppError, AppResult};
use crate::utils::path::resolve_db_path;
use crate::utils::time::parse_now_override;

/// Central database path after CLI override + ~ expansion.
pub fn remote_path(cli: &Cli, cfg: &Config) -> String {
    resolve_db_path(cli.remote.as_ref().unwrap_or(&cfg.remote_database))
}

/// Cache database path after CLI override + ~ expansion.
pub fn cache_path(cli: &Cli, cfg: &Config) -> String {
    resolve_db_path(cli.cache.as_ref().unwrap_or(&cfg.cache_database))
}

pub fn resolve_worker(cli: &Cli, cfg: &Config) -> AppResult<String> {
    cli.worker
        .clone()
        .or_else(|| cfg.default_worker.clone())
        .ok_or(AppError::NoWorker)
}

fn resolve_clock(cli: &Cli) -> AppResult<Box<dyn Clock>> {
    match &cli.now {
        None => Ok(Box::new(SystemClock)),
        Some(raw) => {
            let at = parse_now_override(raw)
                .ok_or_else(|| AppError::InvalidTimestamp(raw.to_string()))?;
            Ok(Box::new(FixedClock(at)))
        }
    }
}

/// Wire the tracker up from the resolved configuration.
pub fn build_tracker(cli: &Cli, cfg: &Config) -> AppResult<Tracker> {
    let remote = remote_path(cli, cfg);
    let cache = cache_path(cli, cfg);

    Ok(Tracker::new(
        Box::new(SqliteRemote::new(
            std::path::Path::new(&remote),
            cfg.remote_busy_timeout_ms,
        )),
        CacheStore::open(&cache)?,
        Box::new(FeedWriter::new(&cache)),
        resolve_clock(cli)?,
    ))
}
