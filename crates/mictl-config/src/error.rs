//! Error types for environment store operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for environment store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Named environment has not been registered.
    #[error("MI does not exists in {name} Add it using add env")]
    UnknownEnvironment {
        /// Environment requested by the caller.
        name: String,
    },
    /// Environment exists but holds no access token.
    #[error("Login to MI")]
    NotLoggedIn {
        /// Environment requested by the caller.
        name: String,
    },
    /// Environment name is already registered.
    #[error("environment '{name}' already exists")]
    DuplicateEnvironment {
        /// Environment name supplied by the caller.
        name: String,
    },
    /// Environment name failed validation.
    #[error("invalid environment name '{name}': {reason}")]
    InvalidName {
        /// Offending name.
        name: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Management URL failed validation.
    #[error("invalid URL '{value}': {reason}")]
    InvalidUrl {
        /// URL payload provided by the caller.
        value: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
    /// No home directory could be determined for the default store location.
    #[error("unable to determine the home directory; pass --config-dir or set MICTL_HOME")]
    HomeDirUnavailable,
    /// Stored document could not be parsed.
    #[error("environment file {} is not valid JSON", .path.display())]
    Parse {
        /// Document location.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
    /// Document could not be serialised.
    #[error("failed to serialise environment file")]
    Serialize {
        /// Source serde error.
        source: serde_json::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation failed: {operation} {}", .path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

impl ConfigError {
    /// Whether the error means the caller lacks a usable session.
    #[must_use]
    pub const fn is_missing_credentials(&self) -> bool {
        matches!(
            self,
            Self::UnknownEnvironment { .. } | Self::NotLoggedIn { .. }
        )
    }
}

/// Convenience alias for environment store results.
pub type ConfigResult<T> = Result<T, ConfigError>;
