//! Error types for docsweep.
//!
//! Library crates use [`DocsweepError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docsweep operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsweepError {
    /// Configuration validation error (missing bucket/prefix/timestamp).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error during sitemap discovery.
    #[error("network error: {0}")]
    Network(String),

    /// Sitemap XML or HTML parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Object storage error (upload or download).
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsweepError>;

impl DocsweepError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocsweepError::config("BUCKET is not set");
        assert_eq!(err.to_string(), "config error: BUCKET is not set");

        let err = DocsweepError::Network("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
