//! Request and result types for the Pipeline

use serde::Deserialize;
use verity_domain::{Claim, Label, Verdict};

use crate::error::InputError;

/// Message for [`AnalysisOutcome::NoClaims`]
pub const NO_CLAIMS_MESSAGE: &str = "No factual claims detected in the text.";

/// Message for [`AnalysisOutcome::NoEvidence`]
pub const NO_EVIDENCE_MESSAGE: &str = "No evidence found for the claims.";

/// Message for [`AnalysisOutcome::NoJudgments`]
pub const NO_JUDGMENTS_MESSAGE: &str = "No verifiable claims found.";

/// What to analyze: a page to fetch, or inline text
///
/// Empty strings count as absent. Exactly one of the two must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisInput {
    /// Page whose paragraph text should be analyzed
    #[serde(default)]
    pub url: Option<String>,

    /// Text to analyze directly
    #[serde(default)]
    pub text: Option<String>,
}

/// Validated input source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource<'a> {
    /// Fetch this URL
    Url(&'a str),
    /// Analyze this text
    Text(&'a str),
}

impl AnalysisInput {
    /// Input carrying inline text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            url: None,
            text: Some(text.into()),
        }
    }

    /// Input carrying a URL
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            text: None,
        }
    }

    /// Pick the single non-empty source
    pub fn source(&self) -> Result<InputSource<'_>, InputError> {
        let url = self.url.as_deref().filter(|u| !u.trim().is_empty());
        let text = self.text.as_deref().filter(|t| !t.trim().is_empty());
        match (url, text) {
            (Some(_), Some(_)) => Err(InputError::Ambiguous),
            (Some(url), None) => Ok(InputSource::Url(url)),
            (None, Some(text)) => Ok(InputSource::Text(text)),
            (None, None) => Err(InputError::Missing),
        }
    }
}

/// Terminal state of one analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// No sentence was screened as a claim
    NoClaims,
    /// Claims were found but no evidence survived sourcing and ranking
    NoEvidence,
    /// Evidence was found but no judgment was produced
    NoJudgments,
    /// One verdict per claim that produced at least one judgment
    Verdicts(Vec<Verdict>),
}

impl AnalysisOutcome {
    /// Informational message for the empty terminal states
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AnalysisOutcome::NoClaims => Some(NO_CLAIMS_MESSAGE),
            AnalysisOutcome::NoEvidence => Some(NO_EVIDENCE_MESSAGE),
            AnalysisOutcome::NoJudgments => Some(NO_JUDGMENTS_MESSAGE),
            AnalysisOutcome::Verdicts(_) => None,
        }
    }

    /// Verdicts, empty for the informational states
    pub fn verdicts(&self) -> &[Verdict] {
        match self {
            AnalysisOutcome::Verdicts(verdicts) => verdicts,
            _ => &[],
        }
    }
}

/// Everything the pipeline learned about one claim
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimAssessment {
    /// The screened claim
    pub claim: Claim,

    /// Relevant passages accepted (web and knowledge base)
    pub accepted_passages: usize,

    /// Aggregated verdict, absent when no judgment was produced
    pub verdict: Option<Verdict>,
}

/// Result of checking a single statement as a whole
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimCheck {
    /// The statement was not screened as a claim
    NotAClaim,
    /// No passage was accepted
    NoEvidence,
    /// Passages were accepted but produced no judgment
    NoJudgments,
    /// Aggregated verdict
    Verdict(Verdict),
}

impl ClaimCheck {
    /// Prediction label name
    pub const NOT_A_CLAIM: &'static str = "Not a Claim";

    /// Predicted label and confidence, as scored by evaluation
    ///
    /// Missing evidence or judgments predict Not Enough Information at 0.0.
    pub fn prediction(&self) -> (&'static str, f64) {
        match self {
            ClaimCheck::NotAClaim => (Self::NOT_A_CLAIM, 0.0),
            ClaimCheck::NoEvidence | ClaimCheck::NoJudgments => {
                (Label::NotEnoughInformation.as_str(), 0.0)
            }
            ClaimCheck::Verdict(verdict) => (verdict.label.as_str(), verdict.confidence),
        }
    }
}
