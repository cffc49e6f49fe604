//! Runtime configuration.
//!
//! Every setting has a default suitable for local use and can be
//! overridden through an environment variable:
//!
//! - `STUDY_NOTES_ADDR`: listen address (`127.0.0.1:3000`)
//! - `STUDY_NOTES_DATA`: schedule file (`data/db.json`)
//! - `STUDY_NOTES_STATIC`: static file directory (`static`)
//! - `STUDY_NOTES_BACKEND_URL`: notes backend base URL (`http://localhost:5000`)
//! - `STUDY_NOTES_BACKEND_TIMEOUT_SECS`: backend request timeout (`120`)
//! - `STUDY_NOTES_LOG`: log level when `RUST_LOG` is unset (`info`)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATA_PATH: &str = "data/db.json";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub data_path: PathBuf,
    pub static_dir: PathBuf,
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for variable access. Unparseable values keep
    /// the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let timeout_secs = parsed_or(
            &lookup,
            "STUDY_NOTES_BACKEND_TIMEOUT_SECS",
            DEFAULT_BACKEND_TIMEOUT_SECS,
        );

        Self {
            addr: parsed_or(&lookup, "STUDY_NOTES_ADDR", defaults.addr),
            data_path: lookup("STUDY_NOTES_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            static_dir: lookup("STUDY_NOTES_STATIC")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            backend_url: lookup("STUDY_NOTES_BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.backend_url),
            backend_timeout: Duration::from_secs(timeout_secs),
            log_level: lookup("STUDY_NOTES_LOG").unwrap_or(defaults.log_level),
        }
    }
}

fn parsed_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
                default
            }
        },
        None => default,
    }
}
