//! Claim module - sentences that survived screening

use std::fmt;

/// Binary screening class for a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimClass {
    /// Opinion, question, greeting or anything else not worth checking
    NonClaim,

    /// A checkable factual assertion
    Claim,
}

impl ClaimClass {
    /// Map a classifier output index (0 = non-claim, 1 = claim)
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ClaimClass::NonClaim),
            1 => Some(ClaimClass::Claim),
            _ => None,
        }
    }

    /// Classifier output index for this class
    pub fn index(&self) -> usize {
        match self {
            ClaimClass::NonClaim => 0,
            ClaimClass::Claim => 1,
        }
    }

    /// Human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimClass::NonClaim => "Non-claim",
            ClaimClass::Claim => "Claim",
        }
    }
}

impl fmt::Display for ClaimClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of screening one sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screening {
    /// Predicted class
    pub class: ClaimClass,

    /// Probability of the predicted class, in [0, 1]
    pub confidence: f64,
}

impl Screening {
    /// Whether the sentence should be checked
    pub fn is_claim(&self) -> bool {
        self.class == ClaimClass::Claim
    }
}

/// A sentence the screener marked checkable
///
/// Claims are immutable once created; downstream stages only borrow them.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    text: String,
    confidence: f64,
    class: ClaimClass,
}

impl Claim {
    /// Create a claim from a sentence and its screening result
    pub fn new(text: impl Into<String>, screening: Screening) -> Self {
        Self {
            text: text.into(),
            confidence: screening.confidence.clamp(0.0, 1.0),
            class: screening.class,
        }
    }

    /// The sentence text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Screening confidence
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Screening label
    pub fn label(&self) -> ClaimClass {
        self.class
    }
}
