//! Configuration for the Pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Operating mode; each mode maps to a configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Serving `/analyze` requests
    #[default]
    Interactive,
    /// Offline dataset evaluation
    Batch,
}

impl Mode {
    /// Lowercase name used in config files and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Interactive => "interactive",
            Mode::Batch => "batch",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive" => Ok(Mode::Interactive),
            "batch" => Ok(Mode::Batch),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// How knowledge-base queries are paced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Token bucket acquired before every attempt
    #[default]
    TokenBucket,
    /// Fixed pause after every completed query
    FixedPause,
    /// No pacing
    Unlimited,
}

/// Knowledge-base retry and pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Total attempts per query, including the first
    pub max_attempts: u32,

    /// Wait before the second attempt; doubles for each further attempt
    pub initial_backoff_ms: u64,

    /// Pacing strategy
    pub pacing: Pacing,

    /// Token refill interval, or pause length for `fixed_pause`
    pub pacing_interval_ms: u64,

    /// Token bucket capacity
    pub burst: u32,
}

impl KnowledgeBaseConfig {
    /// Initial backoff as a Duration
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Pacing interval as a Duration
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1_000,
            pacing: Pacing::TokenBucket,
            pacing_interval_ms: 1_000,
            burst: 1,
        }
    }
}

/// Configuration for the Pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Passages kept per evidence document
    pub top_k: usize,

    /// Minimum claim/excerpt similarity for an evidence item to be kept
    pub relevance_threshold: f64,

    /// QA answers must score strictly above this
    pub answer_threshold: f64,

    /// Web search results fetched per claim
    pub max_search_results: usize,

    /// Output token bound for multi-hop synthesis
    pub multi_hop_max_length: usize,

    /// Knowledge-base retry and pacing
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
}

impl PipelineConfig {
    /// Interactive preset: wide passage selection, permissive thresholds
    pub fn interactive() -> Self {
        Self {
            top_k: 9,
            relevance_threshold: 0.3,
            answer_threshold: 0.01,
            max_search_results: 5,
            multi_hop_max_length: 50,
            knowledge_base: KnowledgeBaseConfig::default(),
        }
    }

    /// Batch preset: narrow passage selection, stricter thresholds
    pub fn batch() -> Self {
        Self {
            top_k: 3,
            relevance_threshold: 0.5,
            answer_threshold: 0.1,
            ..Self::interactive()
        }
    }

    /// Preset for a mode
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Interactive => Self::interactive(),
            Mode::Batch => Self::batch(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if !(-1.0..=1.0).contains(&self.relevance_threshold) {
            return Err("relevance_threshold must be within [-1, 1]".to_string());
        }
        if !(0.0..1.0).contains(&self.answer_threshold) {
            return Err("answer_threshold must be within [0, 1)".to_string());
        }
        if self.max_search_results == 0 || self.max_search_results > 10 {
            return Err("max_search_results must be between 1 and 10".to_string());
        }
        if self.multi_hop_max_length == 0 {
            return Err("multi_hop_max_length must be greater than 0".to_string());
        }
        if self.knowledge_base.max_attempts == 0 {
            return Err("knowledge_base.max_attempts must be greater than 0".to_string());
        }
        if self.knowledge_base.pacing != Pacing::Unlimited {
            if self.knowledge_base.pacing_interval_ms == 0 {
                return Err("knowledge_base.pacing_interval_ms must be greater than 0".to_string());
            }
            if self.knowledge_base.burst == 0 {
                return Err("knowledge_base.burst must be greater than 0".to_string());
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::interactive()
    }
}
