//! Output formatting for evaluation results.

use crate::cli::CliFormat;
use crate::error::Result;
use crate::evaluate::Evaluation;
use crate::metrics::{Averages, ClassificationReport};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an evaluation run.
    pub fn format_evaluation(&self, evaluation: &Evaluation) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(evaluation)?),
            CliFormat::Table => Ok(self.format_report_table(&evaluation.report)),
        }
    }

    /// Format the classification report as a table.
    fn format_report_table(&self, report: &ClassificationReport) -> String {
        if report.total == 0 {
            return self.colorize("No samples evaluated.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Class", "Precision", "Recall", "F1", "Support"]);

        for class in &report.classes {
            builder.push_record([
                class.label.clone(),
                format!("{:.4}", class.precision),
                format!("{:.4}", class.recall),
                format!("{:.4}", class.f1),
                class.support.to_string(),
            ]);
        }
        builder.push_record(average_row("macro avg", &report.macro_avg, report.total));
        builder.push_record(average_row("weighted avg", &report.weighted_avg, report.total));

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let accuracy = format!("Overall Accuracy: {:.4}", report.accuracy);
        format!("{}\n{}", table, self.colorize(&accuracy, "green"))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn average_row(name: &str, averages: &Averages, total: usize) -> [String; 5] {
    [
        name.to_string(),
        format!("{:.4}", averages.precision),
        format!("{:.4}", averages.recall),
        format!("{:.4}", averages.f1),
        total.to_string(),
    ]
}
