//! Shared blocking HTTP plumbing for providers

use crate::ProviderError;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;

/// Default timeout for provider requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("verity/", env!("CARGO_PKG_VERSION"));

/// Build a blocking client with the given timeout
pub fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Turn non-success statuses into provider errors
///
/// 429 becomes [`ProviderError::RateLimitExceeded`]; other failures keep the
/// status and the response body for the log.
pub fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimitExceeded);
    }

    let error_text = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ProviderError::Communication(format!(
        "HTTP {}: {}",
        status, error_text
    )))
}

/// Join a base endpoint and a path without doubling slashes
pub fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://x:1/", "/api/generate"), "http://x:1/api/generate");
        assert_eq!(join_url("http://x:1", "classify"), "http://x:1/classify");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(1)).is_ok());
    }
}
