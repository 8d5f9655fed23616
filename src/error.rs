use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Broad class of an [`AnalysisError`], used to decide how the failure is
/// reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input or settings; the run stops before producing output.
    Configuration,
    /// An author identifier had no entry in the label lookup.
    LookupMiss,
    /// A computation had no meaningful value (empty denominator, too few samples).
    ArithmeticDegenerate,
}

/// Errors raised by the scoring, aggregation and statistics stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A 1-based column index outside the table.
    #[error("column {column} is out of range (table has {available} columns)")]
    ColumnOutOfRange { column: usize, available: usize },

    /// The table has no header row to validate columns against.
    #[error("table is empty; expected at least a header row")]
    EmptyTable,

    /// The dictionary never completed its category block.
    #[error("dictionary cannot be read: {reason}")]
    MalformedDictionary { reason: String },

    /// A cell in a column treated as numeric could not be parsed.
    #[error("row {row}, column {column}: '{value}' is not a number")]
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },

    /// An author identifier is absent from the label lookup.
    #[error("row {row}: author '{author}' has no label association")]
    MissingLabel { author: String, row: usize },

    /// Percentage score requested for a cell without any words.
    #[error("cell has no words; percentage is undefined")]
    ZeroWordCount,

    /// One side of a two-group comparison selected no rows.
    #[error("no rows carry the label '{label}'")]
    EmptyGroup { label: String },

    /// Not enough observations for the requested statistic.
    #[error("column {column}: need at least {needed} values, found {found}")]
    TooFewSamples {
        column: usize,
        needed: usize,
        found: usize,
    },
}

impl AnalysisError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        use AnalysisError::*;
        match self {
            ColumnOutOfRange { .. }
            | EmptyTable
            | MalformedDictionary { .. }
            | NonNumericCell { .. } => ErrorKind::Configuration,
            MissingLabel { .. } => ErrorKind::LookupMiss,
            ZeroWordCount | EmptyGroup { .. } | TooFewSamples { .. } => {
                ErrorKind::ArithmeticDegenerate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let out_of_range = AnalysisError::ColumnOutOfRange {
            column: 10,
            available: 5,
        };
        assert_eq!(out_of_range.kind(), ErrorKind::Configuration);
        assert_eq!(
            out_of_range.to_string(),
            "column 10 is out of range (table has 5 columns)"
        );

        let miss = AnalysisError::MissingLabel {
            author: "gov_x".into(),
            row: 4,
        };
        assert_eq!(miss.kind(), ErrorKind::LookupMiss);
        assert_eq!(AnalysisError::ZeroWordCount.kind(), ErrorKind::ArithmeticDegenerate);
    }
}
