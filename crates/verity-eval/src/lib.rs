//! Verity evaluation library.
//!
//! Scores the single-statement pipeline path against the LIAR dataset and
//! reports per-class precision, recall and F1.

pub mod cli;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod output;

pub use cli::{Cli, CliFormat};
pub use dataset::{load_dataset, map_ground_truth, parse_dataset, LiarRecord};
pub use error::{EvalError, Result};
pub use evaluate::{evaluate, Evaluation, Prediction};
pub use metrics::{Averages, ClassMetrics, ClassificationReport, REPORT_LABELS};
pub use output::Formatter;
