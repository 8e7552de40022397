//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Verity Eval - Score the fact-checking pipeline against the LIAR dataset.
#[derive(Debug, Parser)]
#[command(name = "verity-eval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// LIAR tab-separated dataset file
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Evaluate only the first N rows
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Server configuration file for provider endpoints
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliFormat::Table)]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "verity-eval",
            "--dataset",
            "data/train.tsv",
            "--limit",
            "25",
            "--config",
            "server.toml",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.dataset, PathBuf::from("data/train.tsv"));
        assert_eq!(cli.limit, Some(25));
        assert_eq!(cli.config, Some(PathBuf::from("server.toml")));
        assert_eq!(cli.format, CliFormat::Json);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["verity-eval", "-d", "train.tsv"]).unwrap();
        assert_eq!(cli.limit, None);
        assert_eq!(cli.format, CliFormat::Table);
    }

    #[test]
    fn test_dataset_is_required() {
        assert!(Cli::try_parse_from(["verity-eval"]).is_err());
    }
}
