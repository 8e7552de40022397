//! LIAR dataset loading
//!
//! Each line is one labelled political statement with 14 tab-separated
//! columns and no header row.

use crate::error::{EvalError, Result};
use std::path::Path;
use tracing::debug;
use verity_domain::Label;

/// Number of columns in a LIAR row
pub const COLUMNS: usize = 14;

/// One row of the LIAR dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiarRecord {
    pub id: String,
    pub label: String,
    pub statement: String,
    pub subject: String,
    pub speaker: String,
    pub speaker_job_title: String,
    pub state_info: String,
    pub party_affiliation: String,
    pub barely_true_counts: String,
    pub false_counts: String,
    pub half_true_counts: String,
    pub mostly_true_counts: String,
    pub pants_on_fire_counts: String,
    pub context: String,
}

impl LiarRecord {
    /// Ground-truth verdict label for this row
    pub fn ground_truth(&self) -> Label {
        map_ground_truth(&self.label)
    }

    fn from_columns(line: usize, columns: Vec<&str>) -> Result<Self> {
        if columns.len() < 3 {
            return Err(EvalError::Dataset {
                line,
                message: format!("expected {} columns, found {}", COLUMNS, columns.len()),
            });
        }

        // Trailing metadata is often missing; only id, label and statement are required
        let mut fields = columns.into_iter().map(str::to_string);
        let mut next = || fields.next().unwrap_or_default();
        Ok(Self {
            id: next(),
            label: next(),
            statement: next(),
            subject: next(),
            speaker: next(),
            speaker_job_title: next(),
            state_info: next(),
            party_affiliation: next(),
            barely_true_counts: next(),
            false_counts: next(),
            half_true_counts: next(),
            mostly_true_counts: next(),
            pants_on_fire_counts: next(),
            context: next(),
        })
    }
}

/// Map a six-way LIAR truthfulness rating onto a verdict label
///
/// Unknown ratings count as Not Enough Information.
pub fn map_ground_truth(label: &str) -> Label {
    match label.trim().to_lowercase().as_str() {
        "true" | "mostly-true" => Label::Supported,
        "half-true" => Label::NotEnoughInformation,
        "barely-true" | "false" | "pants-fire" => Label::Refuted,
        _ => Label::NotEnoughInformation,
    }
}

/// Parse LIAR rows from tab-separated text, skipping blank lines
pub fn parse_dataset(contents: &str) -> Result<Vec<LiarRecord>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            LiarRecord::from_columns(index + 1, line.split('\t').collect())
        })
        .collect()
}

/// Load a LIAR dataset file
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<LiarRecord>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let records = parse_dataset(&contents)?;
    debug!(
        "Loaded {} record(s) from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROW: &str = "2635.json\tfalse\tSays the Annies List political group supports \
        third-trimester abortions on demand.\tabortion\tdwayne-bohac\tState representative\t\
        Texas\trepublican\t0\t1\t0\t0\t0\ta mailer";

    #[test]
    fn test_parse_full_row() {
        let records = parse_dataset(ROW).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "2635.json");
        assert_eq!(record.label, "false");
        assert!(record.statement.starts_with("Says the Annies List"));
        assert_eq!(record.party_affiliation, "republican");
        assert_eq!(record.false_counts, "1");
        assert_eq!(record.context, "a mailer");
        assert_eq!(record.ground_truth(), Label::Refuted);
    }

    #[test]
    fn test_missing_trailing_columns_default_empty() {
        let records = parse_dataset("1.json\ttrue\tThe sky is blue.\r\n\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].statement, "The sky is blue.");
        assert_eq!(records[0].context, "");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = parse_dataset("1.json\ttrue\tok\n2.json\tfalse").unwrap_err();
        assert!(matches!(err, EvalError::Dataset { line: 2, .. }));
    }

    #[test]
    fn test_ground_truth_mapping() {
        assert_eq!(map_ground_truth("true"), Label::Supported);
        assert_eq!(map_ground_truth("Mostly-True"), Label::Supported);
        assert_eq!(map_ground_truth("half-true"), Label::NotEnoughInformation);
        assert_eq!(map_ground_truth("barely-true"), Label::Refuted);
        assert_eq!(map_ground_truth("false"), Label::Refuted);
        assert_eq!(map_ground_truth("pants-fire"), Label::Refuted);
        assert_eq!(map_ground_truth("unrated"), Label::NotEnoughInformation);
    }

    #[test]
    fn test_load_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", ROW).unwrap();
        writeln!(file, "3.json\tmostly-true\tUnemployment fell last year.").unwrap();

        let records = load_dataset(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].ground_truth(), Label::Supported);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path().join("absent.tsv")).unwrap_err();
        assert!(matches!(err, EvalError::Io(_)));
    }
}
