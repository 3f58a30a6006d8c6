use crate::cli::commands::{cache_path, remote_path};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::cache::CacheStore;
use crate::db::migrate::{run_cache_migrations, run_remote_migrations};
use crate::db::pool::DbPool;
use crate::db::queries::{activity_count, attendance_count, map_attendance_row};
use crate::errors::{AppError, AppResult};
use crate::ui::messages;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info,
    } = &cli.command
    {
        let remote_p = remote_path(cli, cfg);
        let cache_p = cache_path(cli, cfg);

        if *migrate {
            let remote = DbPool::new(&remote_p)?;
            run_remote_migrations(&remote.conn)?;
            let cache = DbPool::new(&cache_p)?;
            run_cache_migrations(&cache.conn)?;
            messages::success("Migrations applied to both databases.");
        }

        if *check {
            integrity(&remote_p, "central")?;
            integrity(&cache_p, "cache")?;
            scan_invariants(&remote_p)?;
        }

        if *info {
            let remote = DbPool::open_existing(&remote_p);
            println!("Central database: {remote_p}");
            match remote {
                Ok(pool) => println!("  attendance records: {}", attendance_count(&pool.conn)?),
                Err(_) => messages::warning("  unreachable"),
            }

            let cache = CacheStore::open(&cache_p)?;
            println!("Cache database:   {cache_p}");
            println!("  pending days:       {}", cache.pending_count()?);
            println!("  feed entries:       {}", activity_count(cache.conn())?);
        }
    }

    Ok(())
}

fn integrity(path: &str, label: &str) -> AppResult<()> {
    let pool = match DbPool::open_existing(path) {
        Ok(p) => p,
        Err(_) => {
            messages::warning(format!("{label} database unreachable, skipped: {path}"));
            return Ok(());
        }
    };

    let result: String = pool
        .conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result == "ok" {
        messages::success(format!("{label} database integrity: ok"));
        Ok(())
    } else {
        Err(AppError::Migration(format!(
            "{label} database integrity check failed: {result}"
        )))
    }
}

/// Verify the at-rest invariants of every stored day record.
fn scan_invariants(remote_p: &str) -> AppResult<()> {
    let pool = match DbPool::open_existing(remote_p) {
        Ok(p) => p,
        Err(_) => return Ok(()),
    };

    let mut stmt = pool.conn.prepare(
        "SELECT worker_id, date, status, check_in, check_out, break_start, break_end,
                break_minutes, work_minutes, version
         FROM attendance",
    )?;

    let mut bad = 0usize;
    let rows = stmt.query_map([], map_attendance_row)?;
    for r in rows {
        let rec = r?;
        if !rec.invariants_ok() {
            bad += 1;
            messages::warning(format!(
                "invariant violation: {} on {} (status '{}')",
                rec.worker_id,
                rec.date_str(),
                rec.status.label()
            ));
        }
    }

    if bad == 0 {
        messages::success("all day records satisfy the at-rest invariants");
    }
    Ok(())
}
