//! Batch evaluation loop

use crate::dataset::LiarRecord;
use crate::error::Result;
use crate::metrics::{ClassificationReport, REPORT_LABELS};
use serde::Serialize;
use tracing::info;
use verity_pipeline::Pipeline;

/// One scored row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub id: String,
    pub statement: String,
    pub truth: String,
    pub predicted: String,
    pub confidence: f64,
}

/// Predictions plus the report computed from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub predictions: Vec<Prediction>,
    pub report: ClassificationReport,
}

/// Check every record (or the first `limit`) as a single statement
///
/// Rows are processed in order. A pipeline error aborts the run.
pub fn evaluate(pipeline: &Pipeline, records: &[LiarRecord], limit: Option<usize>) -> Result<Evaluation> {
    let total = limit.map_or(records.len(), |n| n.min(records.len()));
    info!("Total samples to process: {}", total);

    let mut predictions = Vec::with_capacity(total);
    for (index, record) in records.iter().take(total).enumerate() {
        let truth = record.ground_truth();
        info!("Processing claim {}/{}: {}", index + 1, total, record.statement);

        let check = pipeline.check_claim(&record.statement)?;
        let (predicted, confidence) = check.prediction();
        info!(
            "Ground truth: {}, predicted: {} ({:.4})",
            truth, predicted, confidence
        );

        predictions.push(Prediction {
            id: record.id.clone(),
            statement: record.statement.clone(),
            truth: truth.as_str().to_string(),
            predicted: predicted.to_string(),
            confidence,
        });
    }

    let truth: Vec<&str> = predictions.iter().map(|p| p.truth.as_str()).collect();
    let predicted: Vec<&str> = predictions.iter().map(|p| p.predicted.as_str()).collect();
    let report = ClassificationReport::compute(&truth, &predicted, &REPORT_LABELS);

    Ok(Evaluation {
        predictions,
        report,
    })
}
