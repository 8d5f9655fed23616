//! Category scoring of text cells and whole tables.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::data::model::Table;
use crate::error::AnalysisError;
use crate::excise::excise;
use crate::lexicon::Lexicon;

/// Cell text written in place of a score that could not be computed.
pub const DEGENERATE_CELL: &str = "n/a";

/// How category scores are written into the table. Fixed for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NumberMode {
    /// Share of words in the category, as a percentage with two decimals.
    #[default]
    Percentage,
    /// Literal `"hits of words"`.
    Fraction,
}

impl NumberMode {
    /// Secondary-header descriptor for score columns.
    pub fn unit(self) -> &'static str {
        match self {
            NumberMode::Percentage => "percent",
            NumberMode::Fraction => "fraction",
        }
    }
}

/// Score of one cell for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Percentage(f64),
    Fraction { hits: usize, words: usize },
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Percentage(v) => write!(f, "{v}"),
            Score::Fraction { hits, words } => write!(f, "{hits} of {words}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Row scorer
// ---------------------------------------------------------------------------

/// Word and hit counts for one cell and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCounts {
    /// Tokens left after excision plus the number of excised spans.
    pub words: usize,
    /// Tokens whose lowercase form maps to the category.
    pub hits: usize,
}

/// Count words and category hits in `text`.
pub fn count_cell<S: AsRef<str>>(
    text: &str,
    lexicon: &Lexicon,
    category: &str,
    undesired: &[S],
) -> CellCounts {
    let cleaned = excise(text, undesired);
    let mut tokens = 0;
    let mut hits = 0;
    for token in cleaned.text.split_whitespace() {
        tokens += 1;
        if lexicon.category_of(&token.to_lowercase()) == Some(category) {
            hits += 1;
        }
    }
    CellCounts {
        words: tokens + cleaned.removed,
        hits,
    }
}

/// Score one cell against one category code.
///
/// Percentage mode fails with [`AnalysisError::ZeroWordCount`] when the cell
/// has no words. Percentages are `hits / words` rounded half to even at
/// four decimals, times 100.
pub fn score_cell<S: AsRef<str>>(
    text: &str,
    lexicon: &Lexicon,
    category: &str,
    undesired: &[S],
    mode: NumberMode,
) -> Result<Score, AnalysisError> {
    let CellCounts { words, hits } = count_cell(text, lexicon, category, undesired);
    match mode {
        NumberMode::Fraction => Ok(Score::Fraction { hits, words }),
        NumberMode::Percentage if words == 0 => Err(AnalysisError::ZeroWordCount),
        NumberMode::Percentage => {
            let ratio = hits as f64 / words as f64;
            Ok(Score::Percentage((ratio * 10_000.0).round_ties_even() / 100.0))
        }
    }
}

// ---------------------------------------------------------------------------
// Table scorer
// ---------------------------------------------------------------------------

/// What [`score_table`] appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    /// 0-based indices of the word-count columns, in target-column order.
    pub word_count_columns: Vec<usize>,
    /// 0-based indices of the category-score columns.
    pub score_columns: Vec<usize>,
    /// Cells written as [`DEGENERATE_CELL`].
    pub degenerate_cells: usize,
}

impl ScoreReport {
    /// Appended columns holding plain numbers under `mode`.
    pub fn numeric_columns(&self, mode: NumberMode) -> Vec<usize> {
        let mut columns = self.word_count_columns.clone();
        if mode == NumberMode::Percentage {
            columns.extend(&self.score_columns);
        }
        columns
    }
}

/// Append word-count and category-score columns for each target column.
///
/// `target_columns` are 1-based; a single bad index rejects the whole set
/// before anything is scored. Word-count columns (raw whitespace tokens, no
/// excision) come first, then one score column per target column and
/// category, categories in dictionary order.
pub fn score_table<S: AsRef<str>>(
    table: &mut Table,
    lexicon: &Lexicon,
    target_columns: &[usize],
    undesired: &[S],
    mode: NumberMode,
) -> Result<ScoreReport, AnalysisError> {
    let targets = table.resolve_columns(target_columns)?;
    let mut report = ScoreReport::default();

    for &column in &targets {
        let counts: Vec<String> = table
            .data_rows()
            .map(|(_, row)| row[column].split_whitespace().count().to_string())
            .collect();
        report.word_count_columns.push(table.width());
        table.push_column(format!("Word Count ({})", column + 1), "words".into(), counts);
    }

    for &column in &targets {
        for category in lexicon.categories() {
            let mut values = Vec::with_capacity(table.len());
            for (row_index, row) in table.data_rows() {
                match score_cell(&row[column], lexicon, &category.code, undesired, mode) {
                    Ok(score) => values.push(score.to_string()),
                    Err(err) => {
                        log::warn!(
                            "row {row_index}, column {}, category {}: {err}",
                            column + 1,
                            category.label
                        );
                        report.degenerate_cells += 1;
                        values.push(DEGENERATE_CELL.to_string());
                    }
                }
            }
            report.score_columns.push(table.width());
            table.push_column(
                format!("{} ({})", category.label, column + 1),
                mode.unit().into(),
                values,
            );
        }
    }

    log::info!(
        "appended {} word-count and {} score columns ({} degenerate cells)",
        report.word_count_columns.len(),
        report.score_columns.len(),
        report.degenerate_cells
    );
    Ok(report)
}
