//! Library error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the speech session library.
///
/// Recognition failures reported by an engine are not errors at this level:
/// they are turned into notifications by the session listener.
#[derive(Debug, Error)]
pub enum SttError {
    /// The language model token is not one of the recognized identifiers.
    #[error("Invalid language model: '{0}' (expected 'web_search' or 'free_form')")]
    InvalidLanguageModel(String),

    /// A scripted session file could not be read.
    #[error("Failed to read session script {path}: {source}")]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scripted session file is not valid JSON for the event model.
    #[error("Invalid session script {path}: {source}")]
    ScriptFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, SttError>;
