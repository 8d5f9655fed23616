use super::model::Table;

// ---------------------------------------------------------------------------
// Row selection by label
// ---------------------------------------------------------------------------

/// Return indices of data rows whose `column` cell equals `label` exactly.
pub fn rows_with_label(table: &Table, column: usize, label: &str) -> Vec<usize> {
    table
        .data_rows()
        .filter(|(_, row)| row.get(column).is_some_and(|cell| cell == label))
        .map(|(i, _)| i)
        .collect()
}

/// Split the data rows into the two groups compared by a t-test.
/// Rows carrying any other label belong to neither group.
pub fn partition_by_label(
    table: &Table,
    column: usize,
    label_a: &str,
    label_b: &str,
) -> (Vec<usize>, Vec<usize>) {
    (
        rows_with_label(table, column, label_a),
        rows_with_label(table, column, label_b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> Table {
        let data = ["R", "D", "R", "I", "r"]
            .iter()
            .map(|p| vec![p.to_string(), "x".to_string()])
            .collect();
        Table::with_header(&["party", "text"], data)
    }

    #[test]
    fn selects_exact_matches_only() {
        assert_eq!(rows_with_label(&parties(), 0, "R"), vec![2, 4]);
        assert!(rows_with_label(&parties(), 0, "party").is_empty());
    }

    #[test]
    fn partition_ignores_other_labels() {
        let (a, b) = partition_by_label(&parties(), 0, "R", "D");
        assert_eq!(a, vec![2, 4]);
        assert_eq!(b, vec![3]);
    }
}
