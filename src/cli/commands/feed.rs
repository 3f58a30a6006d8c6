use crate::cli::commands::cache_path;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::feed::FeedLogic;
use crate::db::cache::CacheStore;
use crate::errors::AppResult;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if matches!(cli.command, Commands::Feed { print: true }) {
        let cache = CacheStore::open(&cache_path(cli, cfg))?;
        FeedLogic::print_feed(&cache)?;
    }

    Ok(())
}
