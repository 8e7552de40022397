//! Evidence value objects

/// Raw text tied to one source (web page URL or knowledge-base item reference)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceItem {
    /// URL or knowledge-base item reference
    pub source: String,

    /// Full text of the evidence
    pub content: String,
}

impl EvidenceItem {
    /// Create an evidence item
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    /// Whether the item carries any usable text
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Claim-relevant text derived from one evidence item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantPassage {
    /// Ranked, concatenated excerpt
    pub text: String,

    /// Source of the originating evidence item
    pub source: String,
}

impl RelevantPassage {
    /// Create a relevant passage
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

impl From<EvidenceItem> for RelevantPassage {
    fn from(item: EvidenceItem) -> Self {
        Self {
            text: item.content,
            source: item.source,
        }
    }
}

/// One web search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result URL
    pub url: String,
}

/// One knowledge-base entity matching a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeHit {
    /// Entity reference (e.g. a Wikidata entity URL)
    pub item: String,

    /// Entity label
    pub label: String,

    /// Entity description, empty when the service has none
    pub description: String,
}

impl KnowledgeHit {
    /// Render the hit as evidence text: `"<label>: <description>"`
    pub fn to_evidence(&self) -> EvidenceItem {
        EvidenceItem::new(
            self.item.clone(),
            format!("{}: {}", self.label, self.description),
        )
    }
}

/// Candidate answer span pulled out of a passage by extractive QA
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAnswer {
    /// Answer span
    pub answer: String,

    /// Model score for the span
    pub score: f64,
}
