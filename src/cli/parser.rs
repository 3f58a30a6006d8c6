use clap::{Parser, Subcommand};

/// Command-line interface definition for attlog
/// CLI application to track daily attendance with SQLite
#[derive(Parser)]
#[command(
    name = "attlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track daily attendance (check-in, check-out, breaks) with an offline cache and a shared SQLite store",
    long_about = None
)]
pub struct Cli {
    /// Override the central database path (useful for tests or custom setups)
    #[arg(global = true, long = "remote")]
    pub remote: Option<String>,

    /// Override the local cache database path
    #[arg(global = true, long = "cache")]
    pub cache: Option<String>,

    /// Worker id (defaults to `default_worker` from the configuration)
    #[arg(global = true, long = "worker", short = 'w')]
    pub worker: Option<String>,

    /// Pin the clock to a fixed instant (test support)
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and both databases
    Init,

    /// Manage the configuration file (view or check)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Check in for today
    In,

    /// Check out for today
    Out {
        /// Operator override: close the day even from an inconsistent state
        #[arg(long = "force", help = "Force the check-out (logged separately)")]
        force: bool,
    },

    /// Start or end a break
    Break {
        #[arg(long = "start", help = "Start a break", conflicts_with = "end")]
        start: bool,

        #[arg(long = "end", help = "End the current break")]
        end: bool,
    },

    /// Show today's attendance record
    Status,

    /// Operator reset: re-initialize today's record (requires a completed day)
    Reset,

    /// Replay offline-recorded transitions against the central store
    Sync,

    /// Print or manage the activity feed
    Feed {
        #[arg(long = "print", help = "Print rows from the activity feed table")]
        print: bool,
    },

    /// Manage the databases (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },
}
