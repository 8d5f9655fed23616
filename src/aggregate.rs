//! Label join and per-author averaging.

use std::collections::HashMap;

use crate::data::model::{Table, HEADER_ROWS};
use crate::error::AnalysisError;
use crate::scoring::DEGENERATE_CELL;

/// Parse a numeric cell. Degenerate cells yield `None`; `NaN` and infinite
/// values are rejected like any other non-number.
pub(crate) fn numeric_cell(
    table: &Table,
    row: usize,
    column: usize,
) -> Result<Option<f64>, AnalysisError> {
    let value = table.cell(row, column).trim();
    if value == DEGENERATE_CELL {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(AnalysisError::NonNumericCell {
            row,
            column: column + 1,
            value: value.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Label join
// ---------------------------------------------------------------------------

/// Return a copy of `table` with a label column in front, looked up by the
/// author identifier in `author_column` (0-based).
///
/// Header rows receive `label_name`. An author missing from `lookup` aborts
/// the join; no partial table is returned.
pub fn join_label(
    table: &Table,
    author_column: usize,
    lookup: &HashMap<String, String>,
    label_name: &str,
) -> Result<Table, AnalysisError> {
    if author_column >= table.width() {
        return Err(AnalysisError::ColumnOutOfRange {
            column: author_column + 1,
            available: table.width(),
        });
    }
    let labels = table
        .data_rows()
        .map(|(row, cells)| {
            let author = &cells[author_column];
            lookup
                .get(author)
                .cloned()
                .ok_or_else(|| AnalysisError::MissingLabel {
                    author: author.clone(),
                    row,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut joined = table.clone();
    joined.prepend_column(label_name.to_string(), label_name.to_string(), labels);
    Ok(joined)
}

// ---------------------------------------------------------------------------
// Per-author aggregation
// ---------------------------------------------------------------------------

/// Running state for one author.
#[derive(Debug)]
struct AuthorAggregate {
    /// First row seen for the author; non-numeric cells are reported from it.
    representative: Vec<String>,
    /// Per numeric column: sum and number of observations.
    sums: Vec<(f64, usize)>,
}

impl AuthorAggregate {
    fn new(representative: Vec<String>, columns: usize) -> Self {
        Self {
            representative,
            sums: vec![(0.0, 0); columns],
        }
    }

    fn add(&mut self, slot: usize, value: Option<f64>) {
        if let Some(v) = value {
            let (sum, count) = &mut self.sums[slot];
            *sum += v;
            *count += 1;
        }
    }

    fn finish(mut self, numeric_columns: &[usize]) -> Vec<String> {
        for (&column, (sum, count)) in numeric_columns.iter().zip(self.sums) {
            self.representative[column] = if count == 0 {
                DEGENERATE_CELL.to_string()
            } else {
                (sum / count as f64).to_string()
            };
        }
        self.representative
    }
}

/// Collapse rows sharing an author into one row of per-column means.
///
/// `author_column` and `numeric_columns` are 0-based. Header rows are kept
/// as-is; authors are emitted in order of first appearance. Non-numeric
/// columns keep the author's first row. Degenerate cells are left out of
/// the mean for their column.
pub fn aggregate_by_author(
    table: &Table,
    author_column: usize,
    numeric_columns: &[usize],
) -> Result<Table, AnalysisError> {
    for &column in numeric_columns.iter().chain([&author_column]) {
        if column >= table.width() {
            return Err(AnalysisError::ColumnOutOfRange {
                column: column + 1,
                available: table.width(),
            });
        }
    }

    let mut order: Vec<String> = Vec::new();
    let mut authors: HashMap<String, AuthorAggregate> = HashMap::new();

    for (row, cells) in table.data_rows() {
        let author = &cells[author_column];
        if !authors.contains_key(author) {
            order.push(author.clone());
        }
        let aggregate = authors
            .entry(author.clone())
            .or_insert_with(|| AuthorAggregate::new(cells.clone(), numeric_columns.len()));
        for (slot, &column) in numeric_columns.iter().enumerate() {
            aggregate.add(slot, numeric_cell(table, row, column)?);
        }
    }

    let mut rows: Vec<Vec<String>> = table.rows()[..HEADER_ROWS.min(table.len())].to_vec();
    for author in &order {
        if let Some(aggregate) = authors.remove(author) {
            rows.push(aggregate.finish(numeric_columns));
        }
    }

    log::info!(
        "aggregated {} rows into {} authors",
        table.data_rows().count(),
        order.len()
    );
    Ok(Table::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn tweets() -> Table {
        Table::with_header(
            &["user", "tweet", "score"],
            vec![
                row(&["gov_a", "first", "4"]),
                row(&["gov_b", "other", "1"]),
                row(&["gov_a", "second", "6"]),
            ],
        )
    }

    #[test]
    fn averages_per_author_in_first_seen_order() {
        let aggregated = aggregate_by_author(&tweets(), 0, &[2]).unwrap();
        assert_eq!(aggregated.len(), 4);
        assert_eq!(aggregated.rows()[2], row(&["gov_a", "first", "5"]));
        assert_eq!(aggregated.rows()[3], row(&["gov_b", "other", "1"]));
        let mean: f64 = aggregated.cell(2, 2).parse().unwrap();
        assert_eq!(mean, 5.0);
    }

    #[test]
    fn header_rows_are_preserved() {
        let aggregated = aggregate_by_author(&tweets(), 0, &[2]).unwrap();
        assert_eq!(aggregated.rows()[..2], tweets().rows()[..2]);
    }

    #[test]
    fn degenerate_cells_are_left_out_of_the_mean() {
        let table = Table::with_header(
            &["user", "score"],
            vec![row(&["a", "n/a"]), row(&["a", "3"]), row(&["b", "n/a"])],
        );
        let aggregated = aggregate_by_author(&table, 0, &[1]).unwrap();
        assert_eq!(aggregated.cell(2, 1), "3");
        assert_eq!(aggregated.cell(3, 1), "n/a");
    }

    #[test]
    fn non_numeric_target_is_rejected() {
        let err = aggregate_by_author(&tweets(), 0, &[1]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NonNumericCell {
                row: 2,
                column: 2,
                value: "first".into()
            }
        );
    }

    #[test]
    fn join_prepends_labels() {
        let lookup = HashMap::from([
            ("gov_a".to_string(), "R".to_string()),
            ("gov_b".to_string(), "D".to_string()),
        ]);
        let joined = join_label(&tweets(), 0, &lookup, "Political Party").unwrap();
        assert_eq!(joined.rows()[0][0], "Political Party");
        assert_eq!(joined.rows()[1][0], "Political Party");
        assert_eq!(joined.rows()[2], row(&["R", "gov_a", "first", "4"]));
        assert_eq!(joined.rows()[3][0], "D");
    }

    #[test]
    fn join_aborts_on_missing_author() {
        let lookup = HashMap::from([("gov_a".to_string(), "R".to_string())]);
        let err = join_label(&tweets(), 0, &lookup, "Party").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingLabel {
                author: "gov_b".into(),
                row: 3
            }
        );
    }

    #[test]
    fn join_rejects_author_column_outside_table() {
        let lookup = HashMap::from([("gov_a".to_string(), "R".to_string())]);
        let err = join_label(&tweets(), 7, &lookup, "Party").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ColumnOutOfRange {
                column: 8,
                available: 3
            }
        );
    }

    #[test]
    fn nan_and_infinite_cells_are_not_numbers() {
        for literal in ["NaN", "inf", "-infinity"] {
            let table = Table::with_header(
                &["user", "score"],
                vec![row(&["a", "2"]), row(&["a", literal])],
            );
            let err = aggregate_by_author(&table, 0, &[1]).unwrap_err();
            assert_eq!(
                err,
                AnalysisError::NonNumericCell {
                    row: 3,
                    column: 2,
                    value: literal.into()
                }
            );
        }
    }
}
