use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            let path = Config::config_file();
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                println!("{content}");
            } else {
                messages::warning(format!(
                    "No config file at {path:?}; using defaults:"
                ));
                let yaml = serde_yaml::to_string(cfg)
                    .map_err(|e| AppError::Config(e.to_string()))?;
                println!("{yaml}");
            }
        }

        if *check {
            // a parse through the typed struct is the check: serde reports
            // missing/unknown fields, defaults fill the optional ones
            let path = Config::config_file();
            if !path.exists() {
                messages::warning("No config file found; run `attlog init` first.");
                return Ok(());
            }
            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<Config>(&content) {
                Ok(parsed) => {
                    messages::success("Configuration file is valid.");
                    messages::info(format!("central database: {}", parsed.remote_database));
                    messages::info(format!("cache database:   {}", parsed.cache_database));
                }
                Err(e) => return Err(AppError::Config(e.to_string())),
            }
        }
    }

    Ok(())
}
