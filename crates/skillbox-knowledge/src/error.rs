//! Knowledge saver error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for knowledge operations.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Errors from local file and process handling.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The knowledge directory could not be created.
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The note file could not be written.
    #[error("{source}")]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An external program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configured repository URL is not a valid URL.
    #[error("invalid repository url '{url}': {source}")]
    InvalidRepoUrl {
        /// The rejected value.
        url: String,
        /// The parse failure.
        #[source]
        source: url::ParseError,
    },
}
