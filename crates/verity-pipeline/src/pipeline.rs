//! Core Pipeline implementation

use crate::clock::{Clock, SystemClock};
use crate::config::PipelineConfig;
use crate::error::{InputError, PipelineError, ScreeningError};
use crate::multihop::MultiHopSynthesizer;
use crate::ranker::RelevanceRanker;
use crate::rate_limit;
use crate::screener::Screener;
use crate::segment::clean_text;
use crate::sourcer::EvidenceSourcer;
use crate::types::{AnalysisInput, AnalysisOutcome, ClaimAssessment, ClaimCheck, InputSource};
use crate::verifier::EvidenceVerifier;
use std::sync::Arc;
use tracing::{debug, info, warn};
use verity_domain::traits::{
    AnswerExtractor, AnswerGenerator, EntailmentClassifier, KnowledgeBase, PageFetcher,
    SentenceSegmenter, SimilarityModel, WebSearch,
};
use verity_domain::{aggregate, Claim, Judgment, RelevantPassage};

/// Every external capability the pipeline orchestrates
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct Capabilities {
    /// Claim screening models
    pub screener: Screener,
    /// Sentence similarity for relevance ranking
    pub similarity: Arc<dyn SimilarityModel>,
    /// Extractive question answering
    pub extractor: Arc<dyn AnswerExtractor>,
    /// Generative multi-hop reasoning
    pub generator: Arc<dyn AnswerGenerator>,
    /// Entailment classification
    pub classifier: Arc<dyn EntailmentClassifier>,
    /// Web search
    pub search: Arc<dyn WebSearch>,
    /// Page text retrieval
    pub fetcher: Arc<dyn PageFetcher>,
    /// Structured knowledge base
    pub knowledge_base: Arc<dyn KnowledgeBase>,
    /// Sentence segmentation
    pub segmenter: Arc<dyn SentenceSegmenter>,
}

/// The fact-checking pipeline
///
/// Sentences, then claims, are processed strictly in order; every capability
/// call blocks.
pub struct Pipeline {
    config: PipelineConfig,
    screener: Screener,
    segmenter: Arc<dyn SentenceSegmenter>,
    fetcher: Arc<dyn PageFetcher>,
    sourcer: EvidenceSourcer,
    ranker: RelevanceRanker,
    verifier: EvidenceVerifier,
    synthesizer: MultiHopSynthesizer,
}

impl Pipeline {
    /// Create a pipeline on the wall clock
    pub fn new(capabilities: Capabilities, config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::with_clock(capabilities, config, Arc::new(SystemClock))
    }

    /// Create a pipeline whose backoff and pacing use `clock`
    pub fn with_clock(
        capabilities: Capabilities,
        config: PipelineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let limiter = rate_limit::from_config(&config.knowledge_base, clock.clone());
        let sourcer = EvidenceSourcer::new(
            capabilities.search,
            capabilities.fetcher.clone(),
            capabilities.knowledge_base,
            limiter,
            clock,
            config.max_search_results,
            config.knowledge_base.clone(),
        );
        let ranker = RelevanceRanker::new(
            capabilities.similarity,
            config.top_k,
            config.relevance_threshold,
        );
        let verifier = EvidenceVerifier::new(
            capabilities.extractor,
            capabilities.classifier,
            config.answer_threshold,
        );
        let synthesizer =
            MultiHopSynthesizer::new(capabilities.generator, config.multi_hop_max_length);

        Ok(Self {
            config,
            screener: capabilities.screener,
            segmenter: capabilities.segmenter,
            fetcher: capabilities.fetcher,
            sourcer,
            ranker,
            verifier,
            synthesizer,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve the request input to the text to analyze
    pub fn resolve_input(&self, input: &AnalysisInput) -> Result<String, InputError> {
        match input.source()? {
            InputSource::Text(text) => Ok(text.to_string()),
            InputSource::Url(url) => {
                info!("Retrieving text from {}", url);
                let text = self.fetcher.fetch_text(url);
                if text.trim().is_empty() {
                    warn!("Unable to retrieve text from {}", url);
                    Err(InputError::UnreachableUrl)
                } else {
                    Ok(text)
                }
            }
        }
    }

    /// Resolve the input, then analyze it
    pub fn run(&self, input: &AnalysisInput) -> Result<AnalysisOutcome, PipelineError> {
        let text = self.resolve_input(input)?;
        self.analyze(&text)
    }

    /// Analyze free text: one verdict per checkable claim
    pub fn analyze(&self, text: &str) -> Result<AnalysisOutcome, PipelineError> {
        let claims = self.screen_claims(text)?;
        if claims.is_empty() {
            info!("No factual claims detected in the text");
            return Ok(AnalysisOutcome::NoClaims);
        }
        info!("Detected {} claim(s)", claims.len());

        let assessments: Vec<ClaimAssessment> =
            claims.into_iter().map(|c| self.assess_claim(c)).collect();

        if assessments.iter().all(|a| a.accepted_passages == 0) {
            info!("No evidence found for the claims");
            return Ok(AnalysisOutcome::NoEvidence);
        }

        let verdicts: Vec<_> = assessments.into_iter().filter_map(|a| a.verdict).collect();
        if verdicts.is_empty() {
            info!("No verifiable claims found");
            return Ok(AnalysisOutcome::NoJudgments);
        }

        info!("Produced {} verdict(s)", verdicts.len());
        Ok(AnalysisOutcome::Verdicts(verdicts))
    }

    /// Preprocess, segment and screen text; keeps sentences screened as claims
    pub fn screen_claims(&self, text: &str) -> Result<Vec<Claim>, ScreeningError> {
        let cleaned = clean_text(text);
        let sentences = self.segmenter.segment(&cleaned);
        debug!("Split into {} sentence(s)", sentences.len());

        let mut claims = Vec::new();
        for sentence in sentences {
            let screening = self.screener.screen(&sentence)?;
            if screening.is_claim() {
                claims.push(Claim::new(sentence, screening));
            }
        }
        Ok(claims)
    }

    /// Source, rank, verify and aggregate one claim
    pub fn assess_claim(&self, claim: Claim) -> ClaimAssessment {
        info!("Checking claim: {}", claim.text());
        let passages = self.gather_passages(claim.text());
        let judgments = self.judge_claim(claim.text(), &passages);
        let verdict = aggregate(claim.text(), &judgments);

        ClaimAssessment {
            claim,
            accepted_passages: passages.len(),
            verdict,
        }
    }

    /// Accepted passages for a claim: ranked web passages, then knowledge-base
    /// evidence
    ///
    /// Knowledge-base text is already targeted at the claim, so it skips
    /// ranking.
    pub fn gather_passages(&self, claim: &str) -> Vec<RelevantPassage> {
        let mut passages: Vec<RelevantPassage> = self
            .sourcer
            .web_evidence(claim)
            .iter()
            .filter_map(|item| self.ranker.rank(claim, item))
            .collect();
        let web = passages.len();

        passages.extend(
            self.sourcer
                .knowledge_evidence(claim)
                .into_iter()
                .map(RelevantPassage::from),
        );
        debug!(
            "Accepted {} web and {} knowledge-base passage(s)",
            web,
            passages.len() - web
        );
        passages
    }

    /// Per-passage judgments plus the multi-hop judgment when it applies
    pub fn judge_claim(&self, claim: &str, passages: &[RelevantPassage]) -> Vec<Judgment> {
        let mut judgments: Vec<Judgment> = passages
            .iter()
            .filter_map(|p| self.verifier.judge_passage(claim, p))
            .collect();

        if let Some(judgment) = self.synthesizer.judge(claim, passages, &self.verifier) {
            judgments.push(judgment);
        }
        judgments
    }

    /// Check one statement as a whole, without segmentation
    ///
    /// Used for dataset evaluation, where every row is a single statement.
    pub fn check_claim(&self, statement: &str) -> Result<ClaimCheck, PipelineError> {
        let cleaned = clean_text(statement);
        let screening = self.screener.screen(&cleaned)?;
        if !screening.is_claim() {
            return Ok(ClaimCheck::NotAClaim);
        }

        let assessment = self.assess_claim(Claim::new(cleaned, screening));
        Ok(match assessment.verdict {
            Some(verdict) => ClaimCheck::Verdict(verdict),
            None if assessment.accepted_passages == 0 => ClaimCheck::NoEvidence,
            None => ClaimCheck::NoJudgments,
        })
    }
}
