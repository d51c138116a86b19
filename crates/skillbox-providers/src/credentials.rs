//! Service credential resolution.
//!
//! A credential is found in one of two places, checked in order:
//!
//! 1. a file path held by the path variable (`GOOGLE_APPLICATION_CREDENTIALS`)
//! 2. raw JSON held by the content variable (`GOOGLE_SERVICE_ACCOUNT_JSON`),
//!    materialized to a fixed path so the token library can read it
//!
//! The variable values are captured once in [`CredentialSources`] and handed
//! to [`CredentialResolver::resolve`], so resolution never reads the process
//! environment on its own.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Default variable naming a credential file.
pub const DEFAULT_PATH_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Default variable holding raw credential JSON.
pub const DEFAULT_CONTENT_VAR: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";

/// Default location for materialized credential content.
pub const DEFAULT_MATERIALIZE_PATH: &str = "/tmp/gsa_credentials.json";

/// Errors from credential resolution.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Neither the path variable nor the content variable yielded a credential.
    #[error("no credentials found; set {content_var} or {path_var}")]
    NoCredentialFound {
        /// Name of the path variable that was checked.
        path_var: String,
        /// Name of the content variable that was checked.
        content_var: String,
    },

    /// Writing the credential content to disk failed.
    #[error("failed to materialize credential at {}: {source}", path.display())]
    Materialize {
        /// Target path of the materialized credential.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Names and locations the resolver works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Variable naming a credential file.
    pub path_var: String,
    /// Variable holding raw credential JSON.
    pub content_var: String,
    /// Where raw credential content is written.
    pub materialize_path: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            path_var: DEFAULT_PATH_VAR.to_string(),
            content_var: DEFAULT_CONTENT_VAR.to_string(),
            materialize_path: PathBuf::from(DEFAULT_MATERIALIZE_PATH),
        }
    }
}

/// Captured values of the two credential variables.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    /// Value of the path variable, if set.
    pub path: Option<String>,
    /// Value of the content variable, if set.
    pub content: Option<String>,
}

impl CredentialSources {
    /// Reads both variables named by `config` from the process environment.
    pub fn from_env(config: &CredentialConfig) -> Self {
        Self {
            path: std::env::var(&config.path_var).ok(),
            content: std::env::var(&config.content_var).ok(),
        }
    }

    /// Builder method to set the path value.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builder method to set the content value.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The path variable named an existing file.
    File,
    /// The content variable was materialized to disk.
    Materialized {
        /// False when a non-empty file was already in place and left alone.
        written: bool,
    },
}

/// A credential file ready to be handed to the token library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    /// Path of the credential file.
    pub path: PathBuf,
    /// How the path was obtained.
    pub source: CredentialSource,
}

/// Resolves a usable credential file from the configured sources.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    config: CredentialConfig,
}

impl CredentialResolver {
    /// Creates a resolver for the given configuration.
    pub fn new(config: CredentialConfig) -> Self {
        Self { config }
    }

    /// Returns the resolver configuration.
    pub fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Resolves a credential file.
    ///
    /// The materialized file is written only when it is absent or empty, so
    /// repeated resolutions with the same content reuse the existing file.
    /// The file is never deleted.
    pub fn resolve(
        &self,
        sources: &CredentialSources,
    ) -> Result<ResolvedCredential, CredentialError> {
        if let Some(path) = sources.path.as_deref().filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            if path.is_file() {
                debug!("using credential file from {}", self.config.path_var);
                return Ok(ResolvedCredential {
                    path,
                    source: CredentialSource::File,
                });
            }
            debug!(
                "{} points at {:?}, which does not exist",
                self.config.path_var, path
            );
        }

        let content = sources
            .content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CredentialError::NoCredentialFound {
                path_var: self.config.path_var.clone(),
                content_var: self.config.content_var.clone(),
            })?;

        let path = self.config.materialize_path.clone();
        let written = materialize(&path, content).map_err(|source| {
            CredentialError::Materialize {
                path: path.clone(),
                source,
            }
        })?;

        Ok(ResolvedCredential {
            path,
            source: CredentialSource::Materialized { written },
        })
    }
}

/// Writes `content` to `path` unless a non-empty file is already there.
///
/// Returns whether the file was written.
fn materialize(path: &Path, content: &str) -> io::Result<bool> {
    let existing_len = match fs::metadata(path) {
        Ok(meta) if !meta.is_file() => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "exists and is not a regular file",
            ));
        }
        Ok(meta) => Some(meta.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    if existing_len.is_some_and(|len| len > 0) {
        debug!("reusing materialized credential at {:?}", path);
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content)?;

    // Set restrictive permissions on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    info!("materialized credential content at {:?}", path);
    Ok(true)
}
