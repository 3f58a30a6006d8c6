use crate::db::migrate::{run_cache_migrations, run_remote_migrations};
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the local cache database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_cache_db(conn: &Connection) -> AppResult<()> {
    run_cache_migrations(conn)?;
    Ok(())
}

/// Initialize the central attendance database.
pub fn init_remote_db(conn: &Connection) -> AppResult<()> {
    run_remote_migrations(conn)?;
    Ok(())
}
