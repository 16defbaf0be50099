//! Application-level configuration loading: data directory and storage thresholds.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BACKLOG_TRACKER_CONFIG_PATH";
/// Directory used by the file store when none is configured.
const DEFAULT_DATA_DIR: &str = "data";
/// Storage budget the usage indicator measures against (10 MiB).
pub const DEFAULT_STORAGE_CAPACITY_BYTES: u64 = 10 * 1024 * 1024;
/// Largest accepted banner payload (2 MiB).
pub const DEFAULT_MAX_BANNER_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Directory holding the persisted keys.
    pub data_dir: PathBuf,
    /// Capacity used to compute the storage usage percentage.
    pub storage_capacity_bytes: u64,
    /// Largest estimated banner size accepted.
    pub max_banner_bytes: u64,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        data_dir = %app_config.data_dir.display(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_capacity_bytes: DEFAULT_STORAGE_CAPACITY_BYTES,
            max_banner_bytes: DEFAULT_MAX_BANNER_BYTES,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    data_dir: Option<PathBuf>,
    storage_capacity_bytes: Option<u64>,
    max_banner_bytes: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            data_dir: value.data_dir.unwrap_or(defaults.data_dir),
            storage_capacity_bytes: value
                .storage_capacity_bytes
                .filter(|bytes| *bytes > 0)
                .unwrap_or(defaults.storage_capacity_bytes),
            max_banner_bytes: value.max_banner_bytes.unwrap_or(defaults.max_banner_bytes),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let raw: RawConfig = serde_json::from_str(r#"{"dataDir": "/var/lib/backlog"}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/backlog"));
        assert_eq!(config.storage_capacity_bytes, DEFAULT_STORAGE_CAPACITY_BYTES);
        assert_eq!(config.max_banner_bytes, DEFAULT_MAX_BANNER_BYTES);
    }

    #[test]
    fn zero_capacity_falls_back_to_default() {
        let raw: RawConfig = serde_json::from_str(r#"{"storageCapacityBytes": 0}"#).unwrap();
        assert_eq!(
            AppConfig::from(raw).storage_capacity_bytes,
            DEFAULT_STORAGE_CAPACITY_BYTES
        );
    }
}
