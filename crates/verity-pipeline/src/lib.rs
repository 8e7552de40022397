//! Verity Pipeline
//!
//! Orchestrates claim screening, evidence sourcing, relevance ranking,
//! entailment verification and multi-hop synthesis into one verdict per claim.
//!
//! # Architecture
//!
//! ```text
//! text → clean → segment → Screener → Claim
//!   Claim → EvidenceSourcer (web + knowledge base) → RelevanceRanker
//!         → EvidenceVerifier (+ MultiHopSynthesizer) → aggregate → Verdict
//! ```
//!
//! Every inference and retrieval step goes through a capability trait from
//! `verity-domain`; the pipeline owns only the decisions between them.
//!
//! # Example Usage
//!
//! ```no_run
//! use verity_pipeline::{AnalysisOutcome, Capabilities, Pipeline, PipelineConfig};
//! # fn capabilities() -> Capabilities { unimplemented!() }
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(capabilities(), PipelineConfig::interactive())?;
//!
//! match pipeline.analyze("The Eiffel Tower is in Paris. I love sunny days.")? {
//!     AnalysisOutcome::Verdicts(verdicts) => {
//!         for verdict in verdicts {
//!             println!("{}: {} ({:.2})", verdict.claim, verdict.label, verdict.confidence);
//!         }
//!     }
//!     other => println!("{}", other.message().unwrap_or_default()),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod clock;
mod config;
mod error;
mod multihop;
mod pipeline;
mod ranker;
pub mod rate_limit;
mod screener;
mod segment;
mod sourcer;
mod types;
mod verifier;


pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{KnowledgeBaseConfig, Mode, Pacing, PipelineConfig};
pub use error::{InputError, PipelineError, ScreeningError};
pub use multihop::MultiHopSynthesizer;
pub use pipeline::{Capabilities, Pipeline};
pub use ranker::{split_passages, RelevanceRanker};
pub use rate_limit::{FixedPause, RateLimiter, TokenBucket, Unlimited};
pub use screener::Screener;
pub use segment::{clean_text, RuleSegmenter};
pub use sourcer::EvidenceSourcer;
pub use types::{
    AnalysisInput, AnalysisOutcome, ClaimAssessment, ClaimCheck, InputSource,
    NO_CLAIMS_MESSAGE, NO_EVIDENCE_MESSAGE, NO_JUDGMENTS_MESSAGE,
};
pub use verifier::EvidenceVerifier;
