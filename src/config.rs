//! Runtime settings resolved from flags and environment variables.

use std::path::PathBuf;

/// Dataset path used when neither `--data` nor `BIKE_DATA_FILE` is given.
pub const DEFAULT_DATA_FILE: &str = "train.csv";
pub const DATA_FILE_ENV: &str = "BIKE_DATA_FILE";

pub const DEFAULT_LOG_FILE: &str = "logs/bike_share_dashboard.log";
pub const LOG_FILE_ENV: &str = "LOG_FILE_PATH";

/// Picks the dataset path: explicit flag, then environment, then default.
pub fn resolve_data_path(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

/// [`resolve_data_path`] against the process environment.
pub fn data_path(flag: Option<PathBuf>) -> PathBuf {
    resolve_data_path(flag, std::env::var(DATA_FILE_ENV).ok())
}

pub fn log_file_path() -> PathBuf {
    std::env::var(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE))
}
