//! HTTP request handlers for the analysis service.
//!
//! Implements claim analysis and health check endpoints using axum. The
//! pipeline blocks on every capability call, so it runs on the blocking pool.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use verity_domain::Verdict;
use verity_pipeline::{AnalysisInput, AnalysisOutcome, InputError, Mode, Pipeline, PipelineError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The pipeline shared by every request
    pub pipeline: Arc<Pipeline>,
    /// Preset the pipeline was configured from
    pub mode: Mode,
}

/// One per-claim result
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClaimResult {
    /// Claim sentence
    pub claim: String,
    /// Supported, Refuted or Not Enough Information
    pub classification: String,
    /// Aggregated confidence
    pub confidence: f64,
    /// Deduplicated evidence sources
    pub evidence_links: Vec<String>,
}

impl From<Verdict> for ClaimResult {
    fn from(verdict: Verdict) -> Self {
        Self {
            claim: verdict.claim,
            classification: verdict.label.as_str().to_string(),
            confidence: verdict.confidence,
            evidence_links: verdict.evidence_links,
        }
    }
}

/// Successful analysis response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    /// Verdicts for the detected claims
    Results {
        /// One entry per claim with at least one judgment
        results: Vec<ClaimResult>,
    },
    /// Informational terminal state
    Message {
        /// Human-readable explanation
        message: String,
    },
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Verdicts(verdicts) => AnalyzeResponse::Results {
                results: verdicts.into_iter().map(ClaimResult::from).collect(),
            },
            other => AnalyzeResponse::Message {
                message: other.message().unwrap_or_default().to_string(),
            },
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Active preset
    pub mode: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body
    BadRequest(String),
    /// Pipeline failure
    Pipeline(PipelineError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Pipeline(PipelineError::Input(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Pipeline(e) => {
                error!("Analysis failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        AppError::Pipeline(e)
    }
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::Pipeline(PipelineError::Input(e))
    }
}

/// POST /analyze - Fact-check a URL or a block of text
async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalysisInput>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // Reject bad input before touching the blocking pool
    input.source()?;
    info!("Received analysis request");

    let pipeline = state.pipeline.clone();
    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&input))
        .await
        .map_err(|e| AppError::InternalError(format!("Analysis task failed: {}", e)))??;

    Ok(Json(AnalyzeResponse::from(outcome)))
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        mode: state.mode.to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::Label;

    #[test]
    fn test_verdict_serializes_as_claim_result() {
        let result = ClaimResult::from(Verdict {
            claim: "The Eiffel Tower is in Paris.".to_string(),
            label: Label::NotEnoughInformation,
            confidence: 0.4,
            evidence_links: vec!["https://a.example".to_string()],
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["classification"], "Not Enough Information");
        assert_eq!(json["evidence_links"][0], "https://a.example");
    }

    #[test]
    fn test_outcome_messages_serialize_flat() {
        let json = serde_json::to_value(AnalyzeResponse::from(AnalysisOutcome::NoClaims)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "No factual claims detected in the text."})
        );
    }

    #[test]
    fn test_input_errors_are_bad_requests() {
        let response = AppError::from(InputError::Ambiguous).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_screening_errors_are_server_errors() {
        let err = PipelineError::Screening(
            verity_pipeline::ScreeningError::InsufficientModelOutput { attempted: 2 },
        );
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
