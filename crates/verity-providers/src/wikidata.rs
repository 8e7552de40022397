//! Wikidata SPARQL lookup
//!
//! Finds up to five entities whose English label equals the claim text
//! exactly, with their English descriptions. A 429 from the query service is
//! reported as [`CapabilityError::RateLimited`] so the caller can back off;
//! this client never retries on its own.
//!
//! [`CapabilityError::RateLimited`]: verity_domain::CapabilityError::RateLimited

use crate::http::{build_client, check_status, DEFAULT_TIMEOUT_SECS};
use crate::ProviderError;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use verity_domain::traits::{CapabilityResult, KnowledgeBase};
use verity_domain::KnowledgeHit;

/// Public Wikidata query service
pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Maximum entities returned per query
pub const RESULT_LIMIT: usize = 5;

/// Client for the Wikidata query service
pub struct WikidataClient {
    endpoint: String,
    client: Client,
}

#[derive(Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<Binding>,
}

#[derive(Deserialize)]
struct Binding {
    item: Value,
    #[serde(rename = "itemLabel")]
    item_label: Value,
    #[serde(rename = "itemDescription")]
    item_description: Option<Value>,
}

#[derive(Deserialize)]
struct Value {
    value: String,
}

impl WikidataClient {
    /// Create a client against the public endpoint
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a specific SPARQL endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }
}

/// Build the exact-label SPARQL query for `text`
pub fn label_query(text: &str) -> String {
    format!(
        r#"SELECT ?item ?itemLabel ?itemDescription WHERE {{
  ?item rdfs:label "{}"@en.
  OPTIONAL {{ ?item schema:description ?itemDescription. FILTER(LANG(?itemDescription) = "en") }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
}}
LIMIT {}"#,
        escape_literal(text),
        RESULT_LIMIT
    )
}

/// Escape a string for use inside a double-quoted SPARQL literal
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn into_hits(body: SparqlResponse) -> Vec<KnowledgeHit> {
    body.results
        .bindings
        .into_iter()
        .map(|b| KnowledgeHit {
            item: b.item.value,
            label: b.item_label.value,
            description: b.item_description.map(|d| d.value).unwrap_or_default(),
        })
        .collect()
}

impl KnowledgeBase for WikidataClient {
    fn query(&self, text: &str) -> CapabilityResult<Vec<KnowledgeHit>> {
        let query = label_query(text);
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .query(&[("query", query.as_str()), ("format", "json")])
            .send()
            .map_err(ProviderError::from)?;
        let body: SparqlResponse = check_status(response)?
            .json()
            .map_err(ProviderError::from)?;
        Ok(into_hits(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_uses_exact_english_label() {
        let query = label_query("Eiffel Tower");
        assert!(query.contains(r#"?item rdfs:label "Eiffel Tower"@en."#));
        assert!(query.contains("LIMIT 5"));
        assert!(query.contains(r#"FILTER(LANG(?itemDescription) = "en")"#));
    }

    #[test]
    fn test_query_escapes_quotes() {
        let query = label_query(r#"He said "hello""#);
        assert!(query.contains(r#""He said \"hello\""@en"#));
    }

    #[test]
    fn test_bindings_become_hits() {
        let body: SparqlResponse = serde_json::from_str(
            r#"{"head": {"vars": ["item", "itemLabel", "itemDescription"]},
                "results": {"bindings": [
                  {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q243"},
                   "itemLabel": {"type": "literal", "value": "Eiffel Tower"},
                   "itemDescription": {"type": "literal", "value": "tower in Paris, France"}},
                  {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1"},
                   "itemLabel": {"type": "literal", "value": "Eiffel Tower"}}
                ]}}"#,
        )
        .unwrap();
        let hits = into_hits(body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].to_evidence().content, "Eiffel Tower: tower in Paris, France");
        assert_eq!(hits[1].description, "");
        assert_eq!(hits[1].to_evidence().content, "Eiffel Tower: ");
    }

    #[test]
    fn test_empty_bindings() {
        let body: SparqlResponse = serde_json::from_str(r#"{"results": {"bindings": []}}"#).unwrap();
        assert!(into_hits(body).is_empty());
    }
}
