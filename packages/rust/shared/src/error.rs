//! Error types for PromptCraft.
//!
//! Library crates use [`PromptCraftError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all PromptCraft operations.
#[derive(Debug, thiserror::Error)]
pub enum PromptCraftError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input validation error (empty query, malformed context, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Failure while classifying, building, or assembling a document.
    #[error("generation error: {0}")]
    Generation(String),

    /// Failure reported by (or while talking to) the evaluation collaborator.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// The evaluation collaborator did not answer in time.
    #[error("evaluator timed out after {0:?}")]
    Timeout(Duration),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PromptCraftError>;

impl PromptCraftError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a generation error from any displayable message.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create an evaluation error from any displayable message.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// The bare cause, without the category prefix `Display` adds.
    pub fn detail(&self) -> String {
        match self {
            Self::Config { message } | Self::Validation { message } => message.clone(),
            Self::Generation(message) | Self::Evaluation(message) => message.clone(),
            other => other.to_string(),
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
        let err = PromptCraftError::config("unknown key");
        assert_eq!(err.to_string(), "config error: unknown key");

        let err = PromptCraftError::evaluation("scorer crashed");
        assert!(err.to_string().contains("scorer crashed"));

        let err = PromptCraftError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "evaluator timed out after 30s");
    }

    #[test]
    fn detail_strips_category_prefix() {
        assert_eq!(
            PromptCraftError::evaluation("scorer crashed").detail(),
            "scorer crashed"
        );
        assert_eq!(
            PromptCraftError::validation("Empty query provided").detail(),
            "Empty query provided"
        );
        assert_eq!(
            PromptCraftError::Timeout(Duration::from_secs(3)).detail(),
            "evaluator timed out after 3s"
        );
    }

    #[test]
    fn serde_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: PromptCraftError = parse.unwrap_err().into();
        assert!(matches!(err, PromptCraftError::Serialization(_)));
    }
}
