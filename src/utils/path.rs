//! Path utilities: resolve configured database paths.

use std::path::PathBuf;

/// Expand a leading `~/` against the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Resolve a database path the way the config file states it: `~` expanded,
/// everything else taken as-is (relative paths stay relative to the cwd).
pub fn resolve_db_path(raw: &str) -> String {
    expand_tilde(raw).to_string_lossy().to_string()
}
