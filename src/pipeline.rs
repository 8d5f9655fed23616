use anyhow::{Context, Result};

use crate::aggregate::{aggregate_by_author, join_label};
use crate::config::RunConfig;
use crate::data::filter::rows_with_label;
use crate::data::loader;
use crate::data::model::Table;
use crate::scoring::{score_table, ScoreReport};
use crate::stats::{self, ColumnSummary, TTestResult};

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Summaries of the rows carrying one label.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub label: String,
    pub authors: usize,
    pub summaries: Vec<ColumnSummary>,
}

/// Everything a run produced, independent of how it is reported.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Input table plus word-count and score columns.
    pub scored: Table,
    pub score_report: ScoreReport,
    /// One row per author; carries the label column when labels were given.
    pub aggregated: Table,
    /// 0-based numeric columns of `aggregated`.
    pub numeric_columns: Vec<usize>,
    /// Over all authors.
    pub summaries: Vec<ColumnSummary>,
    pub groups: Vec<GroupSummary>,
    pub t_tests: Vec<TTestResult>,
}

/// Stage names used in error context.
const LOADING: &str = "loading inputs";
const SCORING: &str = "scoring stage";
const JOINING: &str = "label join";
const AGGREGATING: &str = "author aggregation";
const STATISTICS: &str = "statistics stage";

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run every stage: load, score, join labels, aggregate by author, export,
/// summarise and compare groups. Stops at the first failing stage; tables
/// are only exported once scoring, joining and aggregation have succeeded.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    config.validate().context("invalid configuration")?;
    let dictionary = config.dictionary.as_deref().context("no dictionary given")?;
    let input = config.input.as_deref().context("no input table given")?;
    let output = config.output.as_deref().context("no output path given")?;

    // ---- Load ----
    let lexicon = loader::load_dictionary(dictionary).context(LOADING)?;
    let undesired = match &config.undesired_terms {
        Some(path) => loader::load_undesired_terms(path).context(LOADING)?,
        None => Vec::new(),
    };
    let mut table = loader::load_table(input, config.source_has_header).context(LOADING)?;
    if table.is_empty() {
        log::warn!("{} has no data rows", input.display());
    }
    let author_column = table
        .resolve_column(config.author_column)
        .context("author column")
        .context(LOADING)?;

    // ---- Score ----
    let score_report = score_table(
        &mut table,
        &lexicon,
        &config.target_columns,
        &undesired,
        config.mode,
    )
    .context(SCORING)?;
    let scored = table;

    let mut numeric_columns = if config.numeric_columns.is_empty() {
        score_report.numeric_columns(config.mode)
    } else {
        scored
            .resolve_columns(&config.numeric_columns)
            .context("numeric columns")
            .context(AGGREGATING)?
    };

    // ---- Label join ----
    let (labeled, author_column, label_column) = match &config.labels {
        Some(path) => {
            let lookup = loader::load_label_lookup(path).context(LOADING)?;
            let joined = join_label(&scored, author_column, &lookup, &config.label_column_name)
                .context(JOINING)?;
            for column in &mut numeric_columns {
                *column += 1;
            }
            (joined, author_column + 1, Some(0))
        }
        None => (scored.clone(), author_column, None),
    };

    // ---- Aggregate ----
    let aggregated =
        aggregate_by_author(&labeled, author_column, &numeric_columns).context(AGGREGATING)?;

    // Nothing is written until every input has been checked.
    loader::export_table(&scored, output, config.output_encoding).context(SCORING)?;
    if let Some(path) = &config.aggregated_output {
        loader::export_table(&aggregated, path, config.output_encoding).context(AGGREGATING)?;
    }

    // ---- Statistics ----
    let summaries = stats::summarize(&aggregated, &numeric_columns, None).context(STATISTICS)?;
    let mut groups = Vec::new();
    let mut t_tests = Vec::new();
    if let (Some(label_column), Some(a), Some(b)) = (label_column, &config.group_a, &config.group_b)
    {
        t_tests = stats::t_test(&aggregated, label_column, a, b, &numeric_columns)
            .context(STATISTICS)?;
        for label in [a, b] {
            groups.push(group_summary(&aggregated, label_column, label, &numeric_columns)?);
        }
    }

    Ok(RunOutcome {
        scored,
        score_report,
        aggregated,
        numeric_columns,
        summaries,
        groups,
        t_tests,
    })
}

fn group_summary(
    table: &Table,
    label_column: usize,
    label: &str,
    columns: &[usize],
) -> Result<GroupSummary> {
    let rows = rows_with_label(table, label_column, label);
    let summaries = stats::summarize(table, columns, Some(rows.as_slice()))
        .with_context(|| format!("summarising group '{label}'"))
        .context(STATISTICS)?;
    Ok(GroupSummary {
        label: label.to_string(),
        authors: rows.len(),
        summaries,
    })
}
