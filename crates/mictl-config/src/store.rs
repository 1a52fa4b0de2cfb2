//! JSON-file environment store.
//!
//! # Design
//! - One document per config directory; a missing file reads as empty.
//! - Writes go to a sibling temporary file that is renamed into place.
//! - Sessions are handed out by value through [`CredentialSource`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{EnvironmentEntry, EnvironmentsDocument, Session};
use crate::validate::{parse_base_url, validate_environment_name};

/// File name of the environment document inside the config directory.
pub const ENVIRONMENTS_FILE: &str = "environments.json";

const DEFAULT_DIR_NAME: &str = ".mictl";

/// Source of authenticated sessions for a named environment.
pub trait CredentialSource {
    /// Resolve the session for `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnvironment`] or
    /// [`ConfigError::NotLoggedIn`] when no usable session exists, or an I/O
    /// or parse error from the backing store.
    fn session(&self, environment: &str) -> ConfigResult<Session>;
}

/// Environment store rooted at a config directory.
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    path: PathBuf,
}

impl EnvironmentStore {
    /// Store backed by `<dir>/environments.json`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(ENVIRONMENTS_FILE),
        }
    }

    /// Default config directory (`~/.mictl`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDirUnavailable`] when no home directory is known.
    pub fn default_dir() -> ConfigResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR_NAME))
            .ok_or(ConfigError::HomeDirUnavailable)
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing file yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error when the file exists but cannot be read.
    pub fn load(&self) -> ConfigResult<EnvironmentsDocument> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "environment file missing; using empty set");
                return Ok(EnvironmentsDocument::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Register a new environment.
    ///
    /// # Errors
    ///
    /// Fails on invalid names or URLs, duplicates, and store I/O errors.
    pub fn add_environment(&self, name: &str, url: &str) -> ConfigResult<()> {
        validate_environment_name(name)?;
        let url = parse_base_url(url)?;
        let mut document = self.load()?;
        if document.environments.contains_key(name) {
            return Err(ConfigError::DuplicateEnvironment {
                name: name.to_string(),
            });
        }
        document
            .environments
            .insert(name.to_string(), EnvironmentEntry::new(url));
        self.save(&document)
    }

    /// Remove an environment and any credentials stored for it.
    ///
    /// # Errors
    ///
    /// Fails when the environment is unknown or the store cannot be written.
    pub fn remove_environment(&self, name: &str) -> ConfigResult<()> {
        let mut document = self.load()?;
        if document.environments.remove(name).is_none() {
            return Err(unknown(name));
        }
        self.save(&document)
    }

    /// Look up a single environment.
    ///
    /// # Errors
    ///
    /// Fails when the environment is unknown or the store cannot be read.
    pub fn environment(&self, name: &str) -> ConfigResult<EnvironmentEntry> {
        self.load()?
            .environments
            .remove(name)
            .ok_or_else(|| unknown(name))
    }

    /// Record the token issued by a successful login.
    ///
    /// # Errors
    ///
    /// Fails when the environment is unknown or the store cannot be written.
    pub fn store_token(&self, name: &str, username: &str, token: &str) -> ConfigResult<()> {
        let mut document = self.load()?;
        let entry = document
            .environments
            .get_mut(name)
            .ok_or_else(|| unknown(name))?;
        entry.username = Some(username.to_string());
        entry.token = Some(token.to_string());
        self.save(&document)
    }

    /// Forget the token for an environment.
    ///
    /// # Errors
    ///
    /// Fails when the environment is unknown or the store cannot be written.
    pub fn clear_token(&self, name: &str) -> ConfigResult<()> {
        let mut document = self.load()?;
        let entry = document
            .environments
            .get_mut(name)
            .ok_or_else(|| unknown(name))?;
        entry.token = None;
        self.save(&document)
    }

    fn save(&self, document: &EnvironmentsDocument) -> ConfigResult<()> {
        let io_err = |operation: &'static str, path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ConfigError::Io {
                operation,
                path,
                source,
            }
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err("create_dir", parent))?;
        }

        let payload = serde_json::to_string_pretty(document)
            .map_err(|source| ConfigError::Serialize { source })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(io_err("write", &staging))?;
        restrict_permissions(&staging).map_err(io_err("chmod", &staging))?;
        fs::rename(&staging, &self.path).map_err(io_err("rename", &self.path))?;
        debug!(path = %self.path.display(), "environment file written");
        Ok(())
    }
}

impl CredentialSource for EnvironmentStore {
    fn session(&self, environment: &str) -> ConfigResult<Session> {
        let entry = self.environment(environment)?;
        let token = entry
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ConfigError::NotLoggedIn {
                name: environment.to_string(),
            })?;
        Ok(Session::new(environment, entry.url, token))
    }
}

fn unknown(name: &str) -> ConfigError {
    ConfigError::UnknownEnvironment {
        name: name.to_string(),
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
