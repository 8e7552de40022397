//! Deterministic capability doubles
//!
//! Every mock answers from a fixed default plus per-input overrides and
//! records how it was called. Clones share their recorded state, so a test
//! can hand one clone to the pipeline and inspect the other.
//!
//! ```
//! use verity_providers::mock::MockScorer;
//! use verity_domain::traits::ClaimScorer;
//!
//! let scorer = MockScorer::new("detector", vec![0.4, 1.4])
//!     .with_scores("Hello there.", vec![2.0, -1.0]);
//! assert_eq!(scorer.scores("Hello there.").unwrap(), vec![2.0, -1.0]);
//! assert_eq!(scorer.scores("Water boils at 100C.").unwrap(), vec![0.4, 1.4]);
//! assert_eq!(scorer.call_count(), 2);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use verity_domain::traits::{
    AnswerExtractor, AnswerGenerator, CapabilityResult, ClaimScorer, EntailmentClassifier,
    KnowledgeBase, PageFetcher, SimilarityModel, WebSearch,
};
use verity_domain::{
    CapabilityError, Entailment, ExtractedAnswer, KnowledgeHit, NliRelation, SearchHit,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Claim-detection model with scripted raw scores
#[derive(Clone)]
pub struct MockScorer {
    name: String,
    default: CapabilityResult<Vec<f64>>,
    overrides: HashMap<String, CapabilityResult<Vec<f64>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockScorer {
    /// Return `scores` for every sentence
    pub fn new(name: impl Into<String>, scores: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            default: Ok(scores),
            overrides: HashMap::new(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Fail every call with `error`
    pub fn failing(name: impl Into<String>, error: CapabilityError) -> Self {
        Self {
            default: Err(error),
            ..Self::new(name, Vec::new())
        }
    }

    /// Return `scores` for this exact sentence
    pub fn with_scores(mut self, text: impl Into<String>, scores: Vec<f64>) -> Self {
        self.overrides.insert(text.into(), Ok(scores));
        self
    }

    /// Fail for this exact sentence
    pub fn with_error(mut self, text: impl Into<String>, error: CapabilityError) -> Self {
        self.overrides.insert(text.into(), Err(error));
        self
    }

    /// Number of `scores` calls so far
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }
}

impl ClaimScorer for MockScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn scores(&self, text: &str) -> CapabilityResult<Vec<f64>> {
        *lock(&self.call_count) += 1;
        self.overrides.get(text).unwrap_or(&self.default).clone()
    }
}

/// Similarity keyed by the second text (the passage being compared)
#[derive(Clone)]
pub struct MockSimilarity {
    default: f64,
    overrides: HashMap<String, CapabilityResult<f64>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockSimilarity {
    /// Score every pair as `default`
    pub fn new(default: f64) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Score any pair whose second text is `passage` as `score`
    pub fn with_score(mut self, passage: impl Into<String>, score: f64) -> Self {
        self.overrides.insert(passage.into(), Ok(score));
        self
    }

    /// Fail for pairs whose second text is `passage`
    pub fn with_error(mut self, passage: impl Into<String>, error: CapabilityError) -> Self {
        self.overrides.insert(passage.into(), Err(error));
        self
    }

    /// Number of `similarity` calls so far
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }
}

impl SimilarityModel for MockSimilarity {
    fn similarity(&self, _a: &str, b: &str) -> CapabilityResult<f64> {
        *lock(&self.call_count) += 1;
        self.overrides.get(b).cloned().unwrap_or(Ok(self.default))
    }
}

/// Extractive QA keyed by context
#[derive(Clone)]
pub struct MockAnswerExtractor {
    default: CapabilityResult<ExtractedAnswer>,
    overrides: HashMap<String, CapabilityResult<ExtractedAnswer>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAnswerExtractor {
    /// Answer every question with `answer` at `score`
    pub fn new(answer: impl Into<String>, score: f64) -> Self {
        Self {
            default: Ok(ExtractedAnswer {
                answer: answer.into(),
                score,
            }),
            overrides: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer questions over this exact context with `answer` at `score`
    pub fn with_answer(
        mut self,
        context: impl Into<String>,
        answer: impl Into<String>,
        score: f64,
    ) -> Self {
        self.overrides.insert(
            context.into(),
            Ok(ExtractedAnswer {
                answer: answer.into(),
                score,
            }),
        );
        self
    }

    /// Fail for this exact context
    pub fn with_error(mut self, context: impl Into<String>, error: CapabilityError) -> Self {
        self.overrides.insert(context.into(), Err(error));
        self
    }

    /// Recorded `(question, context)` pairs
    pub fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }
}

impl AnswerExtractor for MockAnswerExtractor {
    fn extract(&self, question: &str, context: &str) -> CapabilityResult<ExtractedAnswer> {
        lock(&self.calls).push((question.to_string(), context.to_string()));
        self.overrides.get(context).unwrap_or(&self.default).clone()
    }
}

/// Generator with a fixed reply
#[derive(Clone)]
pub struct MockGenerator {
    response: CapabilityResult<String>,
    calls: Arc<Mutex<Vec<(String, String, usize)>>>,
}

impl MockGenerator {
    /// Reply `response` to every request
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request
    pub fn failing(error: CapabilityError) -> Self {
        Self {
            response: Err(error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Recorded `(question, context, max_length)` triples
    pub fn calls(&self) -> Vec<(String, String, usize)> {
        lock(&self.calls).clone()
    }
}

impl AnswerGenerator for MockGenerator {
    fn generate(
        &self,
        question: &str,
        context: &str,
        max_length: usize,
    ) -> CapabilityResult<String> {
        lock(&self.calls).push((question.to_string(), context.to_string(), max_length));
        self.response.clone()
    }
}

/// Entailment classifier keyed by answer
#[derive(Clone)]
pub struct MockEntailment {
    default: CapabilityResult<Entailment>,
    overrides: HashMap<String, CapabilityResult<Entailment>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockEntailment {
    /// Classify every pair as `relation` with `confidence`
    pub fn new(relation: NliRelation, confidence: f64) -> Self {
        Self {
            default: Ok(Entailment {
                relation,
                confidence,
            }),
            overrides: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Classify pairs with this exact answer as `relation` with `confidence`
    pub fn with_relation(
        mut self,
        answer: impl Into<String>,
        relation: NliRelation,
        confidence: f64,
    ) -> Self {
        self.overrides.insert(
            answer.into(),
            Ok(Entailment {
                relation,
                confidence,
            }),
        );
        self
    }

    /// Fail for this exact answer
    pub fn with_error(mut self, answer: impl Into<String>, error: CapabilityError) -> Self {
        self.overrides.insert(answer.into(), Err(error));
        self
    }

    /// Recorded `(claim, answer)` pairs
    pub fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }
}

impl EntailmentClassifier for MockEntailment {
    fn classify(&self, claim: &str, answer: &str) -> CapabilityResult<Entailment> {
        lock(&self.calls).push((claim.to_string(), answer.to_string()));
        self.overrides.get(answer).unwrap_or(&self.default).clone()
    }
}

/// Search returning a fixed result list
#[derive(Clone)]
pub struct MockWebSearch {
    results: CapabilityResult<Vec<SearchHit>>,
    queries: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockWebSearch {
    /// Return these URLs, in order, for every query
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            results: Ok(urls.into_iter().map(|u| SearchHit { url: u.into() }).collect()),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every query
    pub fn failing(error: CapabilityError) -> Self {
        Self {
            results: Err(error),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Recorded `(query, limit)` pairs
    pub fn queries(&self) -> Vec<(String, usize)> {
        lock(&self.queries).clone()
    }
}

impl WebSearch for MockWebSearch {
    fn search(&self, query: &str, limit: usize) -> CapabilityResult<Vec<SearchHit>> {
        lock(&self.queries).push((query.to_string(), limit));
        self.results
            .clone()
            .map(|hits| hits.into_iter().take(limit).collect())
    }
}

/// Page fetcher backed by a URL to text map
///
/// Unknown URLs yield an empty string, like a failed fetch.
#[derive(Clone, Default)]
pub struct MockPageFetcher {
    pages: HashMap<String, String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    /// Create a fetcher with no pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` at `url`
    pub fn with_page(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(url.into(), text.into());
        self
    }

    /// URLs fetched so far, in order
    pub fn fetched(&self) -> Vec<String> {
        lock(&self.fetched).clone()
    }
}

impl PageFetcher for MockPageFetcher {
    fn fetch_text(&self, url: &str) -> String {
        lock(&self.fetched).push(url.to_string());
        self.pages.get(url).cloned().unwrap_or_default()
    }
}

/// Knowledge base with a scripted sequence of outcomes
///
/// Scripted outcomes are consumed one per call; once exhausted every call
/// returns the default.
#[derive(Clone)]
pub struct MockKnowledgeBase {
    default: CapabilityResult<Vec<KnowledgeHit>>,
    script: Arc<Mutex<VecDeque<CapabilityResult<Vec<KnowledgeHit>>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockKnowledgeBase {
    /// Return `hits` for every query
    pub fn new(hits: Vec<KnowledgeHit>) -> Self {
        Self {
            default: Ok(hits),
            script: Arc::new(Mutex::new(VecDeque::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return nothing for every query
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Fail every query with `error`
    pub fn failing(error: CapabilityError) -> Self {
        Self {
            default: Err(error),
            ..Self::empty()
        }
    }

    /// Queue a one-shot outcome ahead of the default
    pub fn then(self, outcome: CapabilityResult<Vec<KnowledgeHit>>) -> Self {
        lock(&self.script).push_back(outcome);
        self
    }

    /// Number of queries attempted so far
    pub fn attempts(&self) -> usize {
        lock(&self.queries).len()
    }

    /// Recorded query texts
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }
}

impl KnowledgeBase for MockKnowledgeBase {
    fn query(&self, text: &str) -> CapabilityResult<Vec<KnowledgeHit>> {
        lock(&self.queries).push(text.to_string());
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(label: &str) -> KnowledgeHit {
        KnowledgeHit {
            item: format!("kb:{}", label),
            label: label.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_scorer_overrides_and_count() {
        let scorer = MockScorer::new("m", vec![0.0, 1.0])
            .with_error("bad", CapabilityError::InvalidOutput("nan".into()));
        assert!(scorer.scores("bad").is_err());
        assert_eq!(scorer.scores("ok").unwrap(), vec![0.0, 1.0]);
        assert_eq!(scorer.call_count(), 2);
    }

    #[test]
    fn test_clones_share_recorded_state() {
        let generator = MockGenerator::new("Paris");
        let clone = generator.clone();
        clone.generate("q", "ctx", 50).unwrap();
        assert_eq!(generator.calls(), vec![("q".into(), "ctx".into(), 50)]);
    }

    #[test]
    fn test_similarity_keyed_by_passage() {
        let similarity = MockSimilarity::new(0.1).with_score("close", 0.9);
        assert_eq!(similarity.similarity("claim", "close").unwrap(), 0.9);
        assert_eq!(similarity.similarity("claim", "far").unwrap(), 0.1);
    }

    #[test]
    fn test_search_honours_limit() {
        let search = MockWebSearch::new(["a", "b", "c"]);
        assert_eq!(search.search("q", 2).unwrap().len(), 2);
        assert_eq!(search.queries(), vec![("q".to_string(), 2)]);
    }

    #[test]
    fn test_page_fetcher_unknown_url_is_empty() {
        let fetcher = MockPageFetcher::new().with_page("https://a", "text");
        assert_eq!(fetcher.fetch_text("https://a"), "text");
        assert_eq!(fetcher.fetch_text("https://b"), "");
        assert_eq!(fetcher.fetched(), vec!["https://a", "https://b"]);
    }

    #[test]
    fn test_knowledge_base_script_then_default() {
        let kb = MockKnowledgeBase::new(vec![hit("final")])
            .then(Err(CapabilityError::RateLimited))
            .then(Ok(vec![hit("second")]));
        assert_eq!(kb.query("x"), Err(CapabilityError::RateLimited));
        assert_eq!(kb.query("x").unwrap()[0].label, "second");
        assert_eq!(kb.query("x").unwrap()[0].label, "final");
        assert_eq!(kb.attempts(), 3);
    }

    #[test]
    fn test_entailment_overrides() {
        let nli = MockEntailment::new(NliRelation::Neutral, 0.5)
            .with_relation("Paris", NliRelation::Entailment, 0.9);
        assert_eq!(nli.classify("c", "Paris").unwrap().relation, NliRelation::Entailment);
        assert_eq!(nli.classify("c", "Lyon").unwrap().relation, NliRelation::Neutral);
    }
}
