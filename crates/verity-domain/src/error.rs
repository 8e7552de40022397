//! Error type shared by every capability trait

use std::fmt;

/// Failure reported by an external capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The service asked us to slow down (e.g. HTTP 429)
    RateLimited,

    /// The service could not be reached or answered with a failure status
    Unavailable(String),

    /// The service answered but the payload was unusable
    InvalidOutput(String),
}

impl CapabilityError {
    /// Whether the failure is a rate-limit response
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CapabilityError::RateLimited)
    }
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityError::RateLimited => write!(f, "Rate limit exceeded"),
            CapabilityError::Unavailable(msg) => write!(f, "Capability unavailable: {}", msg),
            CapabilityError::InvalidOutput(msg) => write!(f, "Invalid capability output: {}", msg),
        }
    }
}

impl std::error::Error for CapabilityError {}
