//! Configuration file parsing for the server.
//!
//! Loads bind settings, the operating mode, an optional pipeline override
//! table and provider endpoints from TOML. Search credentials never live in
//! the file; they come from `GOOGLE_API_KEY` and `GOOGLE_CSE_ID`.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use verity_pipeline::{Mode, PipelineConfig};

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Semantically invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Backend answering similarity queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBackend {
    /// Sentence-transformer served by the model sidecar
    #[default]
    ModelServer,
    /// Ollama embeddings compared with cosine similarity
    Ollama,
    /// Offline hashed bag-of-words embeddings
    BagOfWords,
}

/// Backend for multi-hop generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationBackend {
    /// Seq2seq model served by the model sidecar
    #[default]
    ModelServer,
    /// Local Ollama model
    Ollama,
}

/// Provider endpoints and model names
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Model-serving sidecar base URL
    pub model_server_url: String,

    /// Claim-detection models; more than one forms an ensemble
    pub screening_models: Vec<String>,

    /// Similarity backend
    pub similarity: SimilarityBackend,

    /// Generation backend
    pub generation: GenerationBackend,

    /// Ollama base URL
    pub ollama_endpoint: String,

    /// Ollama generation model
    pub ollama_model: String,

    /// Ollama embedding model, defaults to the generation model
    pub ollama_embedding_model: Option<String>,

    /// Wikidata SPARQL endpoint
    pub wikidata_endpoint: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            model_server_url: "http://localhost:8500".to_string(),
            screening_models: vec![
                "Nithiwat/xlm-roberta-base_claim-detection".to_string(),
                "Nithiwat/mdeberta-v3-base_claim-detection".to_string(),
            ],
            similarity: SimilarityBackend::default(),
            generation: GenerationBackend::default(),
            ollama_endpoint: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            ollama_embedding_model: None,
            wikidata_endpoint: "https://query.wikidata.org/sparql".to_string(),
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Preset used when no pipeline table is given
    #[serde(default)]
    pub mode: Mode,

    /// Full pipeline override
    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,

    /// Provider endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.providers.screening_models.is_empty() {
            return Err(ConfigError::Invalid(
                "providers.screening_models must name at least one model".to_string(),
            ));
        }
        self.pipeline_config().validate().map_err(ConfigError::Invalid)
    }

    /// Default configuration: interactive mode on localhost
    pub fn default_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            mode: Mode::Interactive,
            pipeline: None,
            providers: ProvidersConfig::default(),
        }
    }

    /// Effective pipeline configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        self.pipeline
            .clone()
            .unwrap_or_else(|| PipelineConfig::for_mode(self.mode))
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.mode, Mode::Interactive);
        assert_eq!(config.pipeline_config(), PipelineConfig::interactive());
        assert_eq!(config.providers.screening_models.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.bind_port, 5000);
        assert_eq!(config.providers.similarity, SimilarityBackend::ModelServer);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            mode = "batch"

            [providers]
            model_server_url = "http://models:8500"
            screening_models = ["single-model"]
            similarity = "bag_of_words"
            generation = "ollama"
            ollama_model = "mistral"
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.pipeline_config(), PipelineConfig::batch());
        assert_eq!(config.providers.screening_models, vec!["single-model"]);
        assert_eq!(config.providers.similarity, SimilarityBackend::BagOfWords);
        assert_eq!(config.providers.generation, GenerationBackend::Ollama);
        assert_eq!(config.providers.ollama_endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_pipeline_table_overrides_mode() {
        let toml = r#"
            mode = "batch"

            [pipeline]
            top_k = 5
            relevance_threshold = 0.4
            answer_threshold = 0.05
            max_search_results = 3
            multi_hop_max_length = 40

            [pipeline.knowledge_base]
            pacing = "fixed_pause"
        "#;

        let pipeline = ServerConfig::from_toml(toml).unwrap().pipeline_config();
        assert_eq!(pipeline.top_k, 5);
        assert_eq!(pipeline.max_search_results, 3);
        assert_eq!(pipeline.knowledge_base.pacing, verity_pipeline::Pacing::FixedPause);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ServerConfig::from_toml("[providers]\nscreening_models = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ServerConfig::from_toml("mode = \"turbo\""),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
