//! Startup wiring of concrete providers
//!
//! Every provider holds a blocking HTTP client, so this must run before the
//! async runtime starts (or on a blocking thread).

use crate::config::{GenerationBackend, ProvidersConfig, SimilarityBackend};
use crate::ServerError;
use std::sync::Arc;
use tracing::{info, warn};
use verity_domain::traits::{AnswerGenerator, ClaimScorer, SimilarityModel};
use verity_pipeline::{Capabilities, RuleSegmenter, Screener};
use verity_providers::{
    BagOfWordsEmbedding, EmbeddingSimilarity, GoogleSearch, HttpPageFetcher, ModelServerClient,
    OllamaProvider, RemoteScorer, WikidataClient,
};

/// Build every capability handle from the provider configuration
pub fn build_capabilities(config: &ProvidersConfig) -> Result<Capabilities, ServerError> {
    let models = Arc::new(ModelServerClient::new(&config.model_server_url)?);
    if let Err(e) = models.health_check() {
        warn!(
            "Model server at {} is not ready yet: {}",
            config.model_server_url, e
        );
    }

    let scorers: Vec<Arc<dyn ClaimScorer>> = config
        .screening_models
        .iter()
        .map(|name| Arc::new(RemoteScorer::new(models.clone(), name.clone())) as Arc<dyn ClaimScorer>)
        .collect();
    info!("Claim screening with {} model(s)", scorers.len());

    let ollama = || -> Result<OllamaProvider, ServerError> {
        let provider = OllamaProvider::new(&config.ollama_endpoint, &config.ollama_model)?;
        Ok(match &config.ollama_embedding_model {
            Some(model) => provider.with_embedding_model(model),
            None => provider,
        })
    };

    let similarity: Arc<dyn SimilarityModel> = match config.similarity {
        SimilarityBackend::ModelServer => models.clone(),
        SimilarityBackend::Ollama => Arc::new(EmbeddingSimilarity::new(ollama()?)),
        SimilarityBackend::BagOfWords => {
            Arc::new(EmbeddingSimilarity::new(BagOfWordsEmbedding::default()))
        }
    };

    let generator: Arc<dyn AnswerGenerator> = match config.generation {
        GenerationBackend::ModelServer => models.clone(),
        GenerationBackend::Ollama => Arc::new(ollama()?),
    };

    Ok(Capabilities {
        screener: Screener::from_models(scorers),
        similarity,
        extractor: models.clone(),
        generator,
        classifier: models,
        search: Arc::new(GoogleSearch::from_env()?),
        fetcher: Arc::new(HttpPageFetcher::new()?),
        knowledge_base: Arc::new(WikidataClient::with_endpoint(&config.wikidata_endpoint)?),
        segmenter: Arc::new(RuleSegmenter),
    })
}
