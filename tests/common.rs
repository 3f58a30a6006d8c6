#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn atl() -> Command {
    cargo_bin_cmd!("attlog")
}

/// Create unique central + cache DB paths inside the system temp dir and
/// remove any leftovers from a previous run.
pub fn setup_dbs(name: &str) -> (String, String) {
    let mut remote: PathBuf = env::temp_dir();
    remote.push(format!("{}_attlog_central.sqlite", name));
    let mut cache: PathBuf = env::temp_dir();
    cache.push(format!("{}_attlog_cache.sqlite", name));

    let remote = remote.to_string_lossy().to_string();
    let cache = cache.to_string_lossy().to_string();
    fs::remove_file(&remote).ok();
    fs::remove_file(&cache).ok();

    (remote, cache)
}

/// A central-store path that can never be opened (missing directory), used
/// to simulate an outage.
pub fn unreachable_remote(name: &str) -> String {
    let mut p: PathBuf = env::temp_dir();
    p.push(format!("{}_attlog_missing_dir", name));
    p.push("central.sqlite");
    p.to_string_lossy().to_string()
}

/// Initialize both databases (creates schema; `--test` skips the config file)
pub fn init_stores(remote: &str, cache: &str) {
    atl()
        .args(["--remote", remote, "--cache", cache, "--test", "init"])
        .assert()
        .success();
}

/// Run one attendance command for a worker at a pinned instant.
pub fn run_at(remote: &str, cache: &str, worker: &str, now: &str, cmd: &[&str]) -> assert_cmd::assert::Assert {
    let mut args = vec![
        "--remote", remote,
        "--cache", cache,
        "--worker", worker,
        "--now", now,
    ];
    args.extend_from_slice(cmd);
    atl().args(&args).assert()
}
