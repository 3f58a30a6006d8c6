use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::{init_cache_db, init_remote_db};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages;

/// Create the configuration plus both databases with their schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.remote.clone(), cli.cache.clone(), cli.test)?;

    let remote = DbPool::new(&cfg.remote_database)?;
    init_remote_db(&remote.conn)?;

    let cache = DbPool::new(&cfg.cache_database)?;
    init_cache_db(&cache.conn)?;

    messages::success("attlog initialized.");
    Ok(())
}
