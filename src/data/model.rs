use std::collections::BTreeSet;

use crate::error::AnalysisError;

/// Number of leading header rows every [`Table`] carries.
///
/// Row 0 holds the column names, row 1 a secondary header (the source
/// file's own first line, or a unit descriptor for appended columns).
pub const HEADER_ROWS: usize = 2;

// ---------------------------------------------------------------------------
// Table – rows of string cells with a two-row header
// ---------------------------------------------------------------------------

/// An in-memory table of string cells. All rows have the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from raw source rows, generating `Column N` names.
    ///
    /// When `source_has_header` is set the first source row becomes the
    /// secondary header; otherwise the generated names are repeated there and
    /// every source row is data.
    pub fn from_source(mut source: Vec<Vec<String>>, source_has_header: bool) -> Self {
        let width = source.iter().map(Vec::len).max().unwrap_or(0);
        let names: Vec<String> = (1..=width).map(|n| format!("Column {n}")).collect();

        let secondary = if source_has_header && !source.is_empty() {
            source.remove(0)
        } else {
            names.clone()
        };

        let mut rows = Vec::with_capacity(source.len() + HEADER_ROWS);
        rows.push(names);
        rows.push(secondary);
        rows.extend(source);
        Self::from_rows(rows)
    }

    /// Build a table from rows that already include both header rows.
    /// Short rows are padded with empty cells.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Table { rows }
    }

    /// `names` becomes both header rows.
    #[cfg(test)]
    pub fn with_header(names: &[&str], data: Vec<Vec<String>>) -> Self {
        let header: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let mut rows = vec![header.clone(), header];
        rows.extend(data);
        Self::from_rows(rows)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Total number of rows, header rows included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.len() <= HEADER_ROWS
    }

    /// All rows, header rows included.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Row indices of the data rows.
    pub fn data_row_indices(&self) -> std::ops::Range<usize> {
        HEADER_ROWS.min(self.rows.len())..self.rows.len()
    }

    /// Data rows paired with their absolute row index.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        self.rows.iter().enumerate().skip(HEADER_ROWS)
    }

    /// Column name from header row 0.
    pub fn column_name(&self, column: usize) -> &str {
        self.cell(0, column)
    }

    /// Cell text, or `""` when out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }

    /// Translate a 1-based column index into a 0-based one.
    pub fn resolve_column(&self, one_based: usize) -> Result<usize, AnalysisError> {
        let available = self.width();
        if self.rows.is_empty() {
            return Err(AnalysisError::EmptyTable);
        }
        if one_based == 0 || one_based > available {
            return Err(AnalysisError::ColumnOutOfRange {
                column: one_based,
                available,
            });
        }
        Ok(one_based - 1)
    }

    /// Resolve a whole set of 1-based indices; any bad index rejects the set.
    pub fn resolve_columns(&self, one_based: &[usize]) -> Result<Vec<usize>, AnalysisError> {
        one_based.iter().map(|&c| self.resolve_column(c)).collect()
    }

    /// Append a column. `values` holds one cell per data row.
    pub fn push_column(&mut self, name: String, unit: String, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len().saturating_sub(HEADER_ROWS));
        let cells = [name, unit].into_iter().chain(values);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Insert a column in front of all others, with the same layout as
    /// [`Table::push_column`].
    pub fn prepend_column(&mut self, name: String, unit: String, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len().saturating_sub(HEADER_ROWS));
        let cells = [name, unit].into_iter().chain(values);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.insert(0, cell);
        }
    }

    /// Sorted set of distinct data values in a column.
    pub fn unique_values(&self, column: usize) -> BTreeSet<&str> {
        self.data_rows()
            .map(|(_, row)| row.get(column).map_or("", String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_source_keeps_file_header_as_secondary_row() {
        let table = Table::from_source(
            vec![
                strings(&["User Name", "Tweet"]),
                strings(&["alice", "hello"]),
                strings(&["bob"]),
            ],
            true,
        );
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[0], strings(&["Column 1", "Column 2"]));
        assert_eq!(table.rows()[1], strings(&["User Name", "Tweet"]));
        assert_eq!(table.rows()[3], strings(&["bob", ""]));
    }

    #[test]
    fn from_source_without_header_treats_every_row_as_data() {
        let table = Table::from_source(vec![strings(&["alice", "hello"])], false);
        assert_eq!(table.rows()[1], strings(&["Column 1", "Column 2"]));
        assert_eq!(table.data_rows().count(), 1);
    }

    #[test]
    fn resolve_column_is_one_based() {
        let table = Table::with_header(&["a", "b", "c", "d", "e"], vec![]);
        assert_eq!(table.resolve_column(1), Ok(0));
        assert_eq!(table.resolve_column(5), Ok(4));
        assert_eq!(
            table.resolve_column(10),
            Err(AnalysisError::ColumnOutOfRange {
                column: 10,
                available: 5
            })
        );
        assert!(table.resolve_column(0).is_err());
        assert!(table.resolve_columns(&[1, 6]).is_err());
    }

    #[test]
    fn push_and_prepend_columns() {
        let mut table = Table::with_header(&["a"], vec![strings(&["x"]), strings(&["y"])]);
        table.push_column("n".into(), "words".into(), strings(&["1", "2"]));
        table.prepend_column("Label".into(), "Label".into(), strings(&["L1", "L2"]));
        assert_eq!(table.rows()[0], strings(&["Label", "a", "n"]));
        assert_eq!(table.rows()[1], strings(&["Label", "a", "words"]));
        assert_eq!(table.rows()[3], strings(&["L2", "y", "2"]));
    }

    #[test]
    fn unique_values_skip_headers() {
        let table = Table::with_header(
            &["party"],
            vec![strings(&["R"]), strings(&["D"]), strings(&["R"])],
        );
        let values: Vec<&str> = table.unique_values(0).into_iter().collect();
        assert_eq!(values, vec!["D", "R"]);
    }
}
