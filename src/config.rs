//! Run configuration.
//!
//! Settings come from an optional JSON file and are then overridden by
//! command-line flags. Column indices are 1-based throughout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::data::loader::OutputEncoding;
use crate::scoring::NumberMode;

/// How the statistics report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub dictionary: Option<PathBuf>,
    pub undesired_terms: Option<PathBuf>,
    pub input: Option<PathBuf>,
    /// Columns holding text to score.
    pub target_columns: Vec<usize>,
    pub mode: NumberMode,
    /// Whether the input's first line names its columns.
    pub source_has_header: bool,
    /// Scored table destination.
    pub output: Option<PathBuf>,
    /// Author → label mapping used for the group comparison.
    pub labels: Option<PathBuf>,
    /// Column holding the author identifier, in the input table.
    pub author_column: usize,
    pub label_column_name: String,
    pub group_a: Option<String>,
    pub group_b: Option<String>,
    /// Columns to average and summarise, in the scored table. Empty means
    /// every numeric column the scorer appended.
    pub numeric_columns: Vec<usize>,
    pub aggregated_output: Option<PathBuf>,
    pub output_encoding: OutputEncoding,
    pub report_format: ReportFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            undesired_terms: None,
            input: None,
            target_columns: Vec::new(),
            mode: NumberMode::default(),
            source_has_header: true,
            output: None,
            labels: None,
            author_column: 1,
            label_column_name: "Label".to_string(),
            group_a: None,
            group_b: None,
            numeric_columns: Vec::new(),
            aggregated_output: None,
            output_encoding: OutputEncoding::default(),
            report_format: ReportFormat::default(),
        }
    }
}

impl RunConfig {
    /// Load a JSON configuration file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Check the settings that do not depend on file contents.
    pub fn validate(&self) -> Result<()> {
        if self.dictionary.is_none() {
            bail!("no dictionary given (--dictionary)");
        }
        if self.input.is_none() {
            bail!("no input table given (--input)");
        }
        if self.output.is_none() {
            bail!("no output path given (--output)");
        }
        if self.target_columns.is_empty() {
            bail!("no target columns given (--column)");
        }
        if let Some(bad) = self
            .target_columns
            .iter()
            .chain(&self.numeric_columns)
            .chain([&self.author_column])
            .find(|&&c| c == 0)
        {
            bail!("column indices are 1-based; got {bad}");
        }
        match (&self.group_a, &self.group_b) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                if a == b {
                    bail!("group labels must differ; both are '{a}'");
                }
                if self.labels.is_none() {
                    bail!("group comparison needs a label lookup (--labels)");
                }
            }
            _ => bail!("--group-a and --group-b must be given together"),
        }
        Ok(())
    }

    /// Make relative paths relative to `base`, the configuration file's
    /// directory.
    pub fn rebase_paths(&mut self, base: &Path) {
        for path in [
            &mut self.dictionary,
            &mut self.undesired_terms,
            &mut self.input,
            &mut self.output,
            &mut self.labels,
            &mut self.aggregated_output,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete() -> RunConfig {
        RunConfig {
            dictionary: Some("mfd.dic".into()),
            input: Some("tweets.tsv".into()),
            output: Some("scored.tsv".into()),
            target_columns: vec![3],
            ..RunConfig::default()
        }
    }

    #[test]
    fn parses_json_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{
                "dictionary": "mfd.dic",
                "input": "tweets.tsv",
                "output": "scored.tsv",
                "target_columns": [3],
                "mode": "fraction",
                "output_encoding": "utf16"
            }"#,
        )
        .unwrap();

        let config = RunConfig::load_from_path(&path).unwrap();
        assert_eq!(config.target_columns, vec![3]);
        assert_eq!(config.mode, NumberMode::Fraction);
        assert_eq!(config.output_encoding, OutputEncoding::Utf16);
        assert_eq!(config.author_column, 1);
        assert!(config.source_has_header);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{ "dictonary": "typo.dic" }"#).unwrap();
        assert!(RunConfig::load_from_path(&path).is_err());
    }

    #[test]
    fn validation_catches_missing_and_inconsistent_settings() {
        assert!(RunConfig::default().validate().is_err());

        let mut zero = complete();
        zero.target_columns = vec![0];
        assert!(zero.validate().is_err());

        let mut half_groups = complete();
        half_groups.group_a = Some("R".into());
        assert!(half_groups.validate().is_err());

        let mut no_labels = complete();
        no_labels.group_a = Some("R".into());
        no_labels.group_b = Some("D".into());
        assert!(no_labels.validate().is_err());

        no_labels.labels = Some("parties.csv".into());
        assert!(no_labels.validate().is_ok());
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut config = complete();
        config.labels = Some("/abs/parties.csv".into());
        config.rebase_paths(Path::new("/runs/a"));
        assert_eq!(config.dictionary, Some(PathBuf::from("/runs/a/mfd.dic")));
        assert_eq!(config.labels, Some(PathBuf::from("/abs/parties.csv")));
    }
}
