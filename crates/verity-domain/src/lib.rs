//! Verity Domain Layer
//!
//! Core domain model for the Verity fact-checking engine. Like every domain
//! crate in this workspace it has ZERO external dependencies: it defines the
//! value objects that flow through the pipeline, the pure numeric policies
//! (score normalization, verdict aggregation) and the capability traits that
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Claim**: a sentence the screener judged to be a checkable assertion
//! - **Evidence item**: raw text tied to one source (web page or knowledge-base entry)
//! - **Relevant passage**: the claim-relevant excerpt that survived ranking
//! - **Judgment**: one label + confidence derived from one answer for one claim
//! - **Verdict**: the aggregated per-claim result
//!
//! ## Architecture
//!
//! ```text
//! text → segments → Claim → EvidenceItem → RelevantPassage → Judgment → Verdict
//! ```
//!
//! Inference and retrieval live behind the traits in [`traits`]; nothing in this
//! crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregation;
pub mod claim;
pub mod error;
pub mod evidence;
pub mod judgment;
pub mod label;
pub mod scoring;
pub mod traits;

// Re-exports for convenience
pub use aggregation::{aggregate, aggregate_with_policy, ConfidencePolicy};
pub use claim::{Claim, ClaimClass, Screening};
pub use error::CapabilityError;
pub use evidence::{EvidenceItem, ExtractedAnswer, KnowledgeHit, RelevantPassage, SearchHit};
pub use judgment::{Judgment, Verdict};
pub use label::{Entailment, Label, NliRelation};
