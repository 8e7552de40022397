//! Error types for the Pipeline

use thiserror::Error;

/// Errors that abort an analysis request
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request did not carry usable input
    #[error(transparent)]
    Input(#[from] InputError),

    /// No claim-screening model produced a usable score
    #[error(transparent)]
    Screening(#[from] ScreeningError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Problems with the url/text request input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Neither url nor text was given
    #[error("No URL or text provided.")]
    Missing,

    /// Both url and text were given
    #[error("Provide either a URL or text, not both.")]
    Ambiguous,

    /// The url resolved to no text
    #[error("Unable to retrieve text from the provided URL.")]
    UnreachableUrl,
}

/// Claim screening failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreeningError {
    /// Every model in the ensemble failed or produced a malformed vector
    #[error("Insufficient model output: all {attempted} screening models were skipped")]
    InsufficientModelOutput {
        /// Models consulted
        attempted: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_messages() {
        assert_eq!(
            PipelineError::from(InputError::UnreachableUrl).to_string(),
            "Unable to retrieve text from the provided URL."
        );
        assert_eq!(InputError::Missing.to_string(), "No URL or text provided.");
    }

    #[test]
    fn test_screening_message_counts_models() {
        let err = ScreeningError::InsufficientModelOutput { attempted: 2 };
        assert!(err.to_string().contains("all 2 screening models"));
    }
}
