//! Paragraph text of web pages
//!
//! Mirrors what a reader sees in article bodies: the text of every `<p>`
//! element joined by single spaces. Any failure yields an empty string.

use crate::http::{build_client, DEFAULT_TIMEOUT_SECS};
use crate::ProviderError;
use regex::Regex;
use reqwest::blocking::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;
use verity_domain::traits::PageFetcher;

static PARAGRAPH_OPEN_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").ok());

/// Tags that implicitly close an open paragraph
static PARAGRAPH_END_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</(?:p|div|body|html|article|section|main|header|footer|li|ul|ol|td|tr|table|blockquote)\s*>",
    )
    .ok()
});

static TAG_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").ok());

static NOISE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b.*?</(script|style)\s*>").ok());

/// Fetches pages over HTTP and keeps their paragraph text
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    fn try_fetch(&self, url: &str) -> Result<String, ProviderError> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(ProviderError::Communication(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }
        Ok(paragraph_text(&response.text()?))
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_text(&self, url: &str) -> String {
        match self.try_fetch(url) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to retrieve {}: {}", url, e);
                String::new()
            }
        }
    }
}

/// Text of every `<p>` element, tags stripped, joined with spaces
///
/// A paragraph ends at its `</p>`, at the next `<p>`, at a closing block tag,
/// or at the end of the document, so omitted end tags still count.
pub fn paragraph_text(html: &str) -> String {
    let (Some(open), Some(end), Some(tag), Some(noise)) = (
        PARAGRAPH_OPEN_RE.as_ref(),
        PARAGRAPH_END_RE.as_ref(),
        TAG_RE.as_ref(),
        NOISE_RE.as_ref(),
    ) else {
        return String::new();
    };

    let html = noise.replace_all(html, " ");
    let opens: Vec<_> = open.find_iter(&html).collect();

    opens
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let bound = opens.get(i + 1).map_or(html.len(), |next| next.start());
            let body = &html[m.end()..bound];
            let body = end.find(body).map_or(body, |close| &body[..close.start()]);
            collapse_whitespace(&decode_entities(&tag.replace_all(body, "")))
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
