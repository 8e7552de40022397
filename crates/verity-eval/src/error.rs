//! Error types for the evaluation harness.

use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Evaluation errors.
#[derive(Debug, Error)]
pub enum EvalError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dataset row
    #[error("Dataset error on line {line}: {message}")]
    Dataset {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] verity_server::config::ConfigError),

    /// Provider or pipeline construction failed
    #[error(transparent)]
    Server(#[from] verity_server::ServerError),

    /// Pipeline error while checking a statement
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] verity_pipeline::PipelineError),
}
