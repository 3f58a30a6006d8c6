use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Central attendance database (usually a shared/network-mounted file).
    pub remote_database: String,
    /// Per-device cache database (also carries the activity feed).
    pub cache_database: String,
    #[serde(default)]
    pub default_worker: Option<String>,
    #[serde(default = "default_remote_timeout")]
    pub remote_busy_timeout_ms: u32,
}

fn default_remote_timeout() -> u32 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_database: Self::remote_file().to_string_lossy().to_string(),
            cache_database: Self::cache_file().to_string_lossy().to_string(),
            default_worker: None,
            remote_busy_timeout_ms: default_remote_timeout(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("attlog")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".attlog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("attlog.conf")
    }

    /// Default path of the central database (standalone setups; shared
    /// deployments point this at the mounted volume instead).
    pub fn remote_file() -> PathBuf {
        Self::config_dir().join("attlog_central.sqlite")
    }

    /// Default path of the local cache database
    pub fn cache_file() -> PathBuf {
        Self::config_dir().join("attlog_cache.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).expect("❌ Failed to read configuration file");
            serde_yaml::from_str(&content).expect("❌ Failed to parse configuration file")
        } else {
            Config::default()
        }
    }

    /// Initialize configuration and both databases.
    pub fn init_all(
        remote_override: Option<String>,
        cache_override: Option<String>,
        is_test: bool,
    ) -> io::Result<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let resolve = |given: Option<String>, default: PathBuf| -> PathBuf {
            match given {
                Some(name) => {
                    let p = std::path::Path::new(&name);
                    if p.is_absolute() {
                        p.to_path_buf()
                    } else {
                        dir.join(p)
                    }
                }
                None => default,
            }
        };

        let remote_path = resolve(remote_override, Self::remote_file());
        let cache_path = resolve(cache_override, Self::cache_file());

        let config = Config {
            remote_database: remote_path.to_string_lossy().to_string(),
            cache_database: cache_path.to_string_lossy().to_string(),
            default_worker: None,
            remote_busy_timeout_ms: default_remote_timeout(),
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty database files if not existing
        for p in [&remote_path, &cache_path] {
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent)?;
            }
            if !p.exists() {
                fs::File::create(p)?;
            }
        }

        println!("✅ Central database: {remote_path:?}");
        println!("✅ Cache database:   {cache_path:?}");

        Ok(config)
    }
}
