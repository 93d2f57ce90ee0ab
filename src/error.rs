//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library layers below the user-facing commands.
#[derive(Debug, Error)]
pub enum Error {
    /// A version string could not be read as a semantic version.
    #[error("invalid version `{0}`")]
    InvalidVersion(String),

    /// A range expression is neither an exact version nor a `>=` bound.
    #[error("invalid version range `{0}`")]
    InvalidRange(String),

    /// Reading or writing the persisted settings file failed.
    #[error("settings file {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted settings file is not a JSON object.
    #[error("settings file {}: {source}", path.display())]
    SettingsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Setting permissions on bundled model files failed.
    #[error("cannot set permissions on {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
