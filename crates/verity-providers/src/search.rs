//! Google Custom Search JSON API

use crate::http::{build_client, check_status, DEFAULT_TIMEOUT_SECS};
use crate::ProviderError;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use verity_domain::traits::{CapabilityResult, WebSearch};
use verity_domain::SearchHit;

/// Custom Search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// The API rejects `num` outside 1..=10
const MAX_RESULTS_PER_REQUEST: usize = 10;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable holding the search engine id
pub const ENGINE_ID_VAR: &str = "GOOGLE_CSE_ID";

/// Web search through a Google programmable search engine
pub struct GoogleSearch {
    endpoint: String,
    api_key: String,
    engine_id: String,
    client: Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
}

impl GoogleSearch {
    /// Create a client with explicit credentials
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        let engine_id = engine_id.into();
        if api_key.trim().is_empty() || engine_id.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "Google search needs an API key and a search engine id".to_string(),
            ));
        }
        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            engine_id,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Read credentials from `GOOGLE_API_KEY` and `GOOGLE_CSE_ID`
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| ProviderError::Configuration(format!("{} is not set", API_KEY_VAR)))?;
        let engine_id = std::env::var(ENGINE_ID_VAR)
            .map_err(|_| ProviderError::Configuration(format!("{} is not set", ENGINE_ID_VAR)))?;
        Self::new(api_key, engine_id)
    }

    /// Point at a different endpoint (used against local fakes)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl WebSearch for GoogleSearch {
    fn search(&self, query: &str, limit: usize) -> CapabilityResult<Vec<SearchHit>> {
        let num = limit.clamp(1, MAX_RESULTS_PER_REQUEST).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .map_err(ProviderError::from)?;
        let body: SearchResponse = check_status(response)?
            .json()
            .map_err(ProviderError::from)?;

        debug!("Search returned {} results", body.items.len());
        Ok(body
            .items
            .into_iter()
            .take(limit)
            .map(|item| SearchHit { url: item.link })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_rejected() {
        assert!(matches!(
            GoogleSearch::new("", "engine"),
            Err(ProviderError::Configuration(_))
        ));
        assert!(matches!(
            GoogleSearch::new("key", "  "),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[test]
    fn test_response_without_items_is_empty() {
        let body: SearchResponse = serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_response_items_parse() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"items": [{"link": "https://a.example", "title": "A"}, {"link": "https://b.example"}]}"#,
        )
        .unwrap();
        let links: Vec<_> = body.items.into_iter().map(|i| i.link).collect();
        assert_eq!(links, vec!["https://a.example", "https://b.example"]);
    }
}
