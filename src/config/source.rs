//! Settings resolution from the environment and the config file.
//!
//! Values are resolved in order:
//!
//! 1. An explicit value set on the builder
//! 2. An environment variable (`HEATPUMP_CONSOLE_*`)
//! 3. The JSON config file at `<config dir>/heatpump-console/config.json`
//!
//! # Example
//!
//! ```ignore
//! use heatpump_console::config::source::{config_path, ConfigFile};
//!
//! if let Some(file) = ConfigFile::load()? {
//!     println!("base url from {}: {:?}", config_path().display(), file.base_url);
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::options::TrailingLine;
use crate::{Error, Result};

/// Environment variable name for the backend base URL.
pub const ENV_BASE_URL: &str = "HEATPUMP_CONSOLE_BASE_URL";
/// Environment variable name for the default heat-pump id.
pub const ENV_HEATPUMP_ID: &str = "HEATPUMP_CONSOLE_HEATPUMP_ID";

/// Contents of the optional JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Backend base URL, e.g. `http://grafana.local/heatpump/`.
    pub base_url: Option<String>,
    /// Default heat-pump id for dispatched commands.
    pub heatpump_id: Option<String>,
    /// Request timeout in seconds for non-streaming calls.
    pub timeout_secs: Option<u64>,
    /// Policy for an unterminated last line of a progress stream.
    pub trailing_line: Option<TrailingLine>,
}

impl ConfigFile {
    /// Load the config file from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, or `Err` if it exists but is invalid.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&config_path())
    }

    /// Load the config file from a specific path.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, format_args!("failed to read config from {}", path.display())))?;

        let file: ConfigFile = serde_json::from_str(&contents).map_err(|e| Error::JsonParse {
            message: format!("invalid config file {}: {}", path.display(), e),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(file))
    }
}

/// Get the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("heatpump-console")
        .join("config.json")
}

/// Pick the first non-empty value among builder, environment and file.
pub(crate) fn resolve_setting(
    explicit: Option<String>,
    env_var: &str,
    env: impl Fn(&str) -> Option<String>,
    file_value: Option<String>,
) -> Option<String> {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env(env_var).filter(|v| !v.trim().is_empty()))
        .or_else(|| file_value.filter(|v| !v.trim().is_empty()))
}

/// Environment lookup backed by the process environment.
pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
