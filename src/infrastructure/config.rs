//! Environment-driven settings that have no command-line flag.

use std::path::PathBuf;

/// Default request history file, relative to the working directory
pub const DEFAULT_HISTORY_PATH: &str = ".fetchr-history.log";

/// Environment variable overriding the history file path
pub const HISTORY_PATH_ENV_VAR: &str = "FETCHR_HISTORY_FILE";

/// Environment variable disabling the history file
pub const NO_HISTORY_ENV_VAR: &str = "FETCHR_NO_HISTORY";

/// Environment variable disabling colors (https://no-color.org)
pub const NO_COLOR_ENV_VAR: &str = "NO_COLOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub history_path: PathBuf,
    pub history_enabled: bool,
    pub color_enabled: bool,
}

impl Config {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            std::env::var_os(key).and_then(|value| value.into_string().ok())
        })
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let history_path = lookup(HISTORY_PATH_ENV_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HISTORY_PATH.to_string());

        Self {
            history_path: PathBuf::from(history_path),
            history_enabled: !lookup(NO_HISTORY_ENV_VAR).is_some_and(|value| is_truthy(&value)),
            color_enabled: !lookup(NO_COLOR_ENV_VAR).is_some_and(|value| !value.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false")
}
