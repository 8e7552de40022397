//! Verdict labels and the entailment relation they are derived from

use std::fmt;

/// Three-way verdict label
///
/// Every judgment and verdict carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The evidence entails the claim
    Supported,

    /// The evidence contradicts the claim
    Refuted,

    /// The evidence neither entails nor contradicts the claim
    NotEnoughInformation,
}

impl Label {
    /// All labels in reporting order
    pub const ALL: [Label; 3] = [Label::Supported, Label::Refuted, Label::NotEnoughInformation];

    /// Get the label as its wire string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Label::Supported => "Supported",
            Label::Refuted => "Refuted",
            Label::NotEnoughInformation => "Not Enough Information",
        }
    }

    /// Parse a wire string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "supported" => Some(Label::Supported),
            "refuted" => Some(Label::Refuted),
            "not enough information" => Some(Label::NotEnoughInformation),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural-language-inference relation between a premise and a hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NliRelation {
    /// Premise contradicts the hypothesis
    Contradiction,
    /// Premise is neutral toward the hypothesis
    Neutral,
    /// Premise entails the hypothesis
    Entailment,
}

impl NliRelation {
    /// Parse the label names NLI models commonly emit
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "contradiction" => Some(NliRelation::Contradiction),
            "neutral" => Some(NliRelation::Neutral),
            "entailment" => Some(NliRelation::Entailment),
            _ => None,
        }
    }
}

impl From<NliRelation> for Label {
    fn from(relation: NliRelation) -> Self {
        match relation {
            NliRelation::Entailment => Label::Supported,
            NliRelation::Contradiction => Label::Refuted,
            NliRelation::Neutral => Label::NotEnoughInformation,
        }
    }
}

/// Output of an entailment classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entailment {
    /// Predicted relation
    pub relation: NliRelation,
    /// Probability of the predicted relation
    pub confidence: f64,
}
