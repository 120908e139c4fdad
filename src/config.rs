//! Runtime settings read from environment variables.
//!
//! | Variable                | Default             |
//! |-------------------------|---------------------|
//! | `HEARTGUARD_DATA_PATH`  | `data/heart.csv`    |
//! | `HEARTGUARD_MODEL_DIR`  | `model`             |
//! | `HEARTGUARD_REPORT_DIR` | `reports`           |
//! | `HEARTGUARD_LOG_MODE`   | `auto`              |
//! | `HEARTGUARD_LOG_FILE`   | `logs/heartguard.log` |
//!
//! Empty values fall back to the default.

use std::path::PathBuf;

pub const DATA_PATH_ENV: &str = "HEARTGUARD_DATA_PATH";
pub const MODEL_DIR_ENV: &str = "HEARTGUARD_MODEL_DIR";
pub const REPORT_DIR_ENV: &str = "HEARTGUARD_REPORT_DIR";
pub const LOG_MODE_ENV: &str = "HEARTGUARD_LOG_MODE";
pub const LOG_FILE_ENV: &str = "HEARTGUARD_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Parse a mode name; unknown names mean `Auto`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether to log to a file given the terminal state.
    ///
    /// Logging to the terminal would corrupt the TUI's alternate screen.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Paths and logging options shared by both binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub model_dir: PathBuf,
    pub report_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/heart.csv"),
            model_dir: PathBuf::from("model"),
            report_dir: PathBuf::from("reports"),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("logs/heartguard.log"),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_path: get(DATA_PATH_ENV).map_or(defaults.data_path, PathBuf::from),
            model_dir: get(MODEL_DIR_ENV).map_or(defaults.model_dir, PathBuf::from),
            report_dir: get(REPORT_DIR_ENV).map_or(defaults.report_dir, PathBuf::from),
            log_mode: get(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: get(LOG_FILE_ENV).map_or(defaults.log_file, PathBuf::from),
        }
    }
}
