// file: src/error.rs
// version: 1.1.0
// guid: 3f8a1c2d-5e6b-4a70-9c1d-2b4e6f8a0c1e

use std::path::Path;
use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, SetupError>;

/// Error types for the ARCHIE Pi provisioner
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message} (command `{command}` failed)")]
    Step { message: String, command: String },

    #[error("no line matching `{pattern}` in {file}")]
    PatternNotFound { pattern: String, file: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no release artifact matching `{prefix}` listed at {url}")]
    ArtifactNotFound { prefix: String, url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("System error: {0}")]
    System(String),
}

impl SetupError {
    /// Create a new step-failure error carrying the call site's abort message
    pub fn step(message: impl Into<String>, command: impl Into<String>) -> Self {
        Self::Step {
            message: message.into(),
            command: command.into(),
        }
    }

    /// Create a new pattern-not-found error for a config-file edit
    pub fn pattern_not_found(pattern: impl Into<String>, file: &Path) -> Self {
        Self::PatternNotFound {
            pattern: pattern.into(),
            file: file.display().to_string(),
        }
    }

    /// Create a new empty-listing error for the release locator
    pub fn artifact_not_found(prefix: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ArtifactNotFound {
            prefix: prefix.into(),
            url: url.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }
}
