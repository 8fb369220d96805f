//! Settings errors. File errors carry the path they concern so a warning
//! in the log is enough to find the offending file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The file exists but its contents do not describe a [`Config`](crate::Config).
    #[error("Malformed config {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Cannot encode config: {0}")]
    Encode(String),

    /// A value parsed but is out of range.
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    /// Only `.json` and `.toml` files are understood.
    #[error("Unsupported config format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("No platform config directory")]
    NoConfigDirectory,
}

impl SettingsError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
