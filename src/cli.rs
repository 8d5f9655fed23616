//! Command-line interface.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{ReportFormat, RunConfig};
use crate::data::loader::OutputEncoding;
use crate::scoring::NumberMode;

/// lexiscore: dictionary-based category scoring of text columns, with
/// per-author averages and a two-group comparison.
#[derive(Parser, Debug)]
#[command(name = "lexiscore")]
#[command(about = "Dictionary-based word-count scoring of tabular text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON run configuration; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dictionary file (`%`-delimited categories and terms).
    #[arg(short, long)]
    pub dictionary: Option<PathBuf>,

    /// Undesired-term list, one term per line.
    #[arg(short, long)]
    pub undesired: Option<PathBuf>,

    /// Tab-separated input table.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 1-based columns to score (repeatable or comma separated).
    #[arg(short = 'c', long = "column", value_delimiter = ',')]
    pub target_columns: Vec<usize>,

    /// Score representation.
    #[arg(short, long, value_enum)]
    pub mode: Option<NumberMode>,

    /// Treat the input's first line as data rather than a header.
    #[arg(long)]
    pub no_header: bool,

    /// Destination of the scored table.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Author → label mapping (`author,label` per line).
    #[arg(short, long)]
    pub labels: Option<PathBuf>,

    /// 1-based column holding the author identifier.
    #[arg(short, long)]
    pub author_column: Option<usize>,

    /// Name given to the joined label column.
    #[arg(long)]
    pub label_column_name: Option<String>,

    /// First group label for the t-test.
    #[arg(long)]
    pub group_a: Option<String>,

    /// Second group label for the t-test.
    #[arg(long)]
    pub group_b: Option<String>,

    /// 1-based columns of the scored table to average and summarise.
    #[arg(short, long, value_delimiter = ',')]
    pub numeric_columns: Vec<usize>,

    /// Destination of the per-author table.
    #[arg(long)]
    pub aggregated_output: Option<PathBuf>,

    /// Encoding of written tables.
    #[arg(long, value_enum)]
    pub output_encoding: Option<OutputEncoding>,

    /// Report format.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter for `env_logger` when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            _ => "trace",
        }
    }

    /// Merge the configuration file (if any) with the flags.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = RunConfig::load_from_path(path)?;
                if let Some(base) = path.parent() {
                    config.rebase_paths(base);
                }
                config
            }
            None => RunConfig::default(),
        };

        if self.dictionary.is_some() {
            config.dictionary = self.dictionary;
        }
        if self.undesired.is_some() {
            config.undesired_terms = self.undesired;
        }
        if self.input.is_some() {
            config.input = self.input;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.labels.is_some() {
            config.labels = self.labels;
        }
        if self.group_a.is_some() {
            config.group_a = self.group_a;
        }
        if self.group_b.is_some() {
            config.group_b = self.group_b;
        }
        if self.aggregated_output.is_some() {
            config.aggregated_output = self.aggregated_output;
        }
        if !self.target_columns.is_empty() {
            config.target_columns = self.target_columns;
        }
        if !self.numeric_columns.is_empty() {
            config.numeric_columns = self.numeric_columns;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.no_header {
            config.source_has_header = false;
        }
        if let Some(column) = self.author_column {
            config.author_column = column;
        }
        if let Some(name) = self.label_column_name {
            config.label_column_name = name;
        }
        if let Some(encoding) = self.output_encoding {
            config.output_encoding = encoding;
        }
        if let Some(format) = self.format {
            config.report_format = format;
        }
        Ok(config)
    }
}
