//! Evidence sourcing from web search and the knowledge base

use crate::clock::Clock;
use crate::config::KnowledgeBaseConfig;
use crate::rate_limit::RateLimiter;
use std::sync::Arc;
use tracing::{debug, warn};
use verity_domain::traits::{KnowledgeBase, PageFetcher, WebSearch};
use verity_domain::{CapabilityError, EvidenceItem, KnowledgeHit};

/// Gathers raw evidence for a claim
pub struct EvidenceSourcer {
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn PageFetcher>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    max_search_results: usize,
    retry: KnowledgeBaseConfig,
}

impl EvidenceSourcer {
    /// Create a sourcer
    pub fn new(
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn PageFetcher>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
        max_search_results: usize,
        retry: KnowledgeBaseConfig,
    ) -> Self {
        Self {
            search,
            fetcher,
            knowledge_base,
            limiter,
            clock,
            max_search_results,
            retry,
        }
    }

    /// Fetched pages for the claim's top search results
    ///
    /// Pages whose fetched text is empty are dropped. A failing search yields
    /// no evidence.
    pub fn web_evidence(&self, claim: &str) -> Vec<EvidenceItem> {
        let hits = match self.search.search(claim, self.max_search_results) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Web search failed for claim '{}': {}", claim, e);
                return Vec::new();
            }
        };
        debug!("Web search returned {} result(s)", hits.len());

        hits.into_iter()
            .take(self.max_search_results)
            .filter_map(|hit| {
                let content = self.fetcher.fetch_text(&hit.url);
                let item = EvidenceItem::new(hit.url, content);
                if item.is_empty() {
                    debug!("No content fetched from {}; dropping", item.source);
                    None
                } else {
                    Some(item)
                }
            })
            .collect()
    }

    /// Knowledge-base entities for the claim, as evidence items
    pub fn knowledge_evidence(&self, claim: &str) -> Vec<EvidenceItem> {
        self.query_knowledge_base(claim)
            .iter()
            .map(KnowledgeHit::to_evidence)
            .collect()
    }

    /// Query the knowledge base with rate-limit backoff
    ///
    /// Rate-limit responses are retried with exponential backoff up to
    /// `max_attempts` total attempts, with no wait after the last one. Any
    /// other error abandons the query. Never fails; exhaustion yields nothing.
    pub fn query_knowledge_base(&self, claim: &str) -> Vec<KnowledgeHit> {
        let hits = self.query_with_backoff(claim);
        self.limiter.settle();
        hits
    }

    fn query_with_backoff(&self, claim: &str) -> Vec<KnowledgeHit> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut delay = self.retry.initial_backoff();

        for attempt in 1..=max_attempts {
            self.limiter.acquire();
            match self.knowledge_base.query(claim) {
                Ok(hits) => {
                    debug!("Knowledge base returned {} hit(s)", hits.len());
                    return hits;
                }
                Err(CapabilityError::RateLimited) if attempt < max_attempts => {
                    warn!(
                        "Knowledge base rate limit hit (attempt {}/{}); retrying in {:?}",
                        attempt, max_attempts, delay
                    );
                    self.clock.sleep(delay);
                    delay *= 2;
                }
                Err(CapabilityError::RateLimited) => {
                    warn!(
                        "Knowledge base still rate limited after {} attempts; giving up",
                        max_attempts
                    );
                }
                Err(e) => {
                    warn!("Knowledge base query failed: {}", e);
                    break;
                }
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Pacing;
    use crate::rate_limit::{self, Unlimited};
    use std::time::Duration;
    use verity_domain::traits::CapabilityResult;
    use verity_domain::SearchHit;
    use verity_providers::mock::{MockKnowledgeBase, MockPageFetcher, MockWebSearch};

    fn hit(label: &str, description: &str) -> KnowledgeHit {
        KnowledgeHit {
            item: format!("http://www.wikidata.org/entity/{}", label),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    fn sourcer(
        search: MockWebSearch,
        fetcher: MockPageFetcher,
        kb: MockKnowledgeBase,
        clock: Arc<ManualClock>,
    ) -> EvidenceSourcer {
        EvidenceSourcer::new(
            Arc::new(search),
            Arc::new(fetcher),
            Arc::new(kb),
            Arc::new(Unlimited),
            clock,
            5,
            KnowledgeBaseConfig::default(),
        )
    }

    #[test]
    fn test_three_rate_limits_back_off_then_give_up() {
        let clock = Arc::new(ManualClock::new());
        let kb = MockKnowledgeBase::failing(CapabilityError::RateLimited);
        let sourcer = sourcer(
            MockWebSearch::new(Vec::<String>::new()),
            MockPageFetcher::new(),
            kb.clone(),
            clock.clone(),
        );

        assert!(sourcer.knowledge_evidence("claim").is_empty());
        assert_eq!(kb.attempts(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn test_rate_limit_then_success() {
        let clock = Arc::new(ManualClock::new());
        let kb = MockKnowledgeBase::new(vec![hit("Q243", "tower in Paris, France")])
            .then(Err(CapabilityError::RateLimited));
        let sourcer = sourcer(
            MockWebSearch::new(Vec::<String>::new()),
            MockPageFetcher::new(),
            kb.clone(),
            clock.clone(),
        );

        let evidence = sourcer.knowledge_evidence("Eiffel Tower");
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].content, "Q243: tower in Paris, France");
        assert_eq!(kb.attempts(), 2);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_other_errors_abandon_immediately() {
        let clock = Arc::new(ManualClock::new());
        let kb = MockKnowledgeBase::failing(CapabilityError::Unavailable("HTTP 500".into()));
        let sourcer = sourcer(
            MockWebSearch::new(Vec::<String>::new()),
            MockPageFetcher::new(),
            kb.clone(),
            clock.clone(),
        );

        assert!(sourcer.knowledge_evidence("claim").is_empty());
        assert_eq!(kb.attempts(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_web_evidence_drops_empty_pages() {
        let search = MockWebSearch::new(["https://a.example", "https://b.example"]);
        let fetcher = MockPageFetcher::new().with_page("https://a.example", "Some text.");
        let sourcer = sourcer(
            search.clone(),
            fetcher.clone(),
            MockKnowledgeBase::empty(),
            Arc::new(ManualClock::new()),
        );

        let items = sourcer.web_evidence("claim");
        assert_eq!(items, vec![EvidenceItem::new("https://a.example", "Some text.")]);
        assert_eq!(search.queries(), vec![("claim".to_string(), 5)]);
        assert_eq!(fetcher.fetched().len(), 2);
    }

    /// Search that ignores the requested limit
    struct OverfullSearch;

    impl WebSearch for OverfullSearch {
        fn search(&self, _query: &str, _limit: usize) -> CapabilityResult<Vec<SearchHit>> {
            Ok((0..8)
                .map(|i| SearchHit {
                    url: format!("https://{}.example", i),
                })
                .collect())
        }
    }

    #[test]
    fn test_web_evidence_caps_fetches_at_max_results() {
        let fetcher = MockPageFetcher::new();
        let sourcer = EvidenceSourcer::new(
            Arc::new(OverfullSearch),
            Arc::new(fetcher.clone()),
            Arc::new(MockKnowledgeBase::empty()),
            Arc::new(Unlimited),
            Arc::new(ManualClock::new()),
            5,
            KnowledgeBaseConfig::default(),
        );

        sourcer.web_evidence("claim");
        assert_eq!(
            fetcher.fetched(),
            (0..5).map(|i| format!("https://{}.example", i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_failing_search_yields_nothing() {
        let fetcher = MockPageFetcher::new();
        let sourcer = sourcer(
            MockWebSearch::failing(CapabilityError::Unavailable("quota".into())),
            fetcher.clone(),
            MockKnowledgeBase::empty(),
            Arc::new(ManualClock::new()),
        );
        assert!(sourcer.web_evidence("claim").is_empty());
        assert!(fetcher.fetched().is_empty());
    }

    #[test]
    fn test_fixed_pause_after_every_query() {
        let clock = Arc::new(ManualClock::new());
        let config = KnowledgeBaseConfig {
            pacing: Pacing::FixedPause,
            ..KnowledgeBaseConfig::default()
        };
        let limiter = rate_limit::from_config(&config, clock.clone());
        let sourcer = EvidenceSourcer::new(
            Arc::new(MockWebSearch::new(Vec::<String>::new())),
            Arc::new(MockPageFetcher::new()),
            Arc::new(MockKnowledgeBase::failing(CapabilityError::Unavailable("x".into()))),
            limiter,
            clock.clone(),
            5,
            config,
        );

        sourcer.knowledge_evidence("one");
        sourcer.knowledge_evidence("two");
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(1)]
        );
    }

    #[test]
    fn test_token_bucket_paces_retries() {
        let clock = Arc::new(ManualClock::new());
        let config = KnowledgeBaseConfig::default();
        let limiter = rate_limit::from_config(&config, clock.clone());
        let sourcer = EvidenceSourcer::new(
            Arc::new(MockWebSearch::new(Vec::<String>::new())),
            Arc::new(MockPageFetcher::new()),
            Arc::new(MockKnowledgeBase::failing(CapabilityError::RateLimited)),
            limiter,
            clock.clone(),
            5,
            config,
        );

        sourcer.knowledge_evidence("claim");
        // Backoff sleeps already cover the token refill, so pacing adds none.
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }
}
