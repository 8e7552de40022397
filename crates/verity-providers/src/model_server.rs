//! Model-serving sidecar client
//!
//! Transformer inference (claim detection, extractive QA, NLI, UnifiedQA-style
//! generation, sentence similarity) runs in a separate model server. This
//! client speaks its small JSON protocol:
//!
//! | Route         | Request                                   | Response                 |
//! |---------------|-------------------------------------------|--------------------------|
//! | `/classify`   | `{model, text}`                           | `{scores: [f64]}` (raw)  |
//! | `/similarity` | `{a, b}`                                  | `{score}`                |
//! | `/qa`         | `{question, context, max_answer_len}`     | `{answer, score}`        |
//! | `/generate`   | `{question, context, max_length}`         | `{text}`                 |
//! | `/nli`        | `{premise, hypothesis}`                   | `{label, score}`         |
//! | `/health`     | (none)                                    | 2xx when models are hot  |

use crate::http::{build_client, check_status, join_url};
use crate::ProviderError;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use verity_domain::traits::{
    AnswerExtractor, AnswerGenerator, CapabilityResult, ClaimScorer, EntailmentClassifier,
    SimilarityModel,
};
use verity_domain::{CapabilityError, Entailment, ExtractedAnswer, NliRelation};

/// Default sidecar endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8500";

/// Longest answer span requested from extractive QA
pub const MAX_ANSWER_LEN: usize = 50;

/// Model inference can be slow on CPU
const TIMEOUT_SECS: u64 = 120;

/// Client for the model-serving sidecar
#[derive(Clone)]
pub struct ModelServerClient {
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    scores: Vec<f64>,
}

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    a: &'a str,
    b: &'a str,
}

#[derive(Deserialize)]
struct SimilarityResponse {
    score: f64,
}

#[derive(Serialize)]
struct QaRequest<'a> {
    question: &'a str,
    context: &'a str,
    max_answer_len: usize,
}

#[derive(Deserialize)]
struct QaResponse {
    #[serde(default)]
    answer: String,
    #[serde(default)]
    score: f64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    question: &'a str,
    context: &'a str,
    max_length: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

#[derive(Serialize)]
struct NliRequest<'a> {
    premise: &'a str,
    hypothesis: &'a str,
}

#[derive(Deserialize)]
struct NliResponse {
    label: String,
    score: f64,
}

impl ModelServerClient {
    /// Create a client for the sidecar at `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_client(Duration::from_secs(TIMEOUT_SECS))?,
        })
    }

    /// Check that the sidecar is up and its models are loaded
    pub fn health_check(&self) -> Result<(), ProviderError> {
        let response = self.client.get(join_url(&self.endpoint, "health")).send()?;
        check_status(response).map(|_| ())
    }

    /// Raw claim-detection scores from one named model
    pub fn classify(&self, model: &str, text: &str) -> Result<Vec<f64>, ProviderError> {
        let body: ClassifyResponse = self.post("classify", &ClassifyRequest { model, text })?;
        Ok(body.scores)
    }

    fn post<B, R>(&self, route: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(join_url(&self.endpoint, route))
            .json(body)
            .send()?;
        let response = check_status(response)?;
        response
            .json::<R>()
            .map_err(|e| ProviderError::InvalidResponse(format!("{} response: {}", route, e)))
    }
}

impl SimilarityModel for ModelServerClient {
    fn similarity(&self, a: &str, b: &str) -> CapabilityResult<f64> {
        let body: SimilarityResponse = self.post("similarity", &SimilarityRequest { a, b })?;
        Ok(body.score)
    }
}

impl AnswerExtractor for ModelServerClient {
    fn extract(&self, question: &str, context: &str) -> CapabilityResult<ExtractedAnswer> {
        let body: QaResponse = self.post(
            "qa",
            &QaRequest {
                question,
                context,
                max_answer_len: MAX_ANSWER_LEN,
            },
        )?;
        Ok(ExtractedAnswer {
            answer: body.answer,
            score: body.score,
        })
    }
}

impl AnswerGenerator for ModelServerClient {
    fn generate(
        &self,
        question: &str,
        context: &str,
        max_length: usize,
    ) -> CapabilityResult<String> {
        let body: GenerateResponse = self.post(
            "generate",
            &GenerateRequest {
                question,
                context,
                max_length,
            },
        )?;
        Ok(body.text)
    }
}

impl EntailmentClassifier for ModelServerClient {
    fn classify(&self, claim: &str, answer: &str) -> CapabilityResult<Entailment> {
        let body: NliResponse = self.post(
            "nli",
            &NliRequest {
                premise: claim,
                hypothesis: answer,
            },
        )?;
        let relation = NliRelation::parse(&body.label).ok_or_else(|| {
            CapabilityError::InvalidOutput(format!("unknown NLI label '{}'", body.label))
        })?;
        Ok(Entailment {
            relation,
            confidence: body.score,
        })
    }
}

/// One named claim-detection model served by the sidecar
pub struct RemoteScorer {
    client: Arc<ModelServerClient>,
    model: String,
}

impl RemoteScorer {
    /// Score with `model` through a shared client
    pub fn new(client: Arc<ModelServerClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl ClaimScorer for RemoteScorer {
    fn name(&self) -> &str {
        &self.model
    }

    fn scores(&self, text: &str) -> CapabilityResult<Vec<f64>> {
        Ok(self.client.classify(&self.model, text)?)
    }
}
