//! Client error types.

use std::fmt;

use skillbox_knowledge::KnowledgeError;
use skillbox_providers::{CredentialError, ProviderError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that end a tool run with a non-zero exit.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// No usable service account credential.
    Credentials(CredentialError),
    /// Token acquisition or client construction failed.
    Provider(ProviderError),
    /// Local file or process handling failed.
    Knowledge(KnowledgeError),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Credentials(err) => write!(f, "credentials: {}", err),
            Self::Provider(err) => write!(f, "provider error: {}", err),
            Self::Knowledge(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Credentials(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Knowledge(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CredentialError> for ClientError {
    fn from(err: CredentialError) -> Self {
        Self::Credentials(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<KnowledgeError> for ClientError {
    fn from(err: KnowledgeError) -> Self {
        Self::Knowledge(err)
    }
}
