//! Rendering of a run's statistics for the terminal.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ReportFormat;
use crate::pipeline::RunOutcome;
use crate::stats::{ColumnSummary, TTestResult};

#[derive(Serialize)]
struct GroupReport<'a> {
    label: &'a str,
    authors: usize,
    summaries: &'a [ColumnSummary],
}

#[derive(Serialize)]
struct Report<'a> {
    rows_scored: usize,
    authors: usize,
    numeric_columns: usize,
    degenerate_cells: usize,
    summaries: &'a [ColumnSummary],
    groups: Vec<GroupReport<'a>>,
    t_tests: &'a [TTestResult],
}

impl<'a> Report<'a> {
    fn new(outcome: &'a RunOutcome) -> Self {
        Report {
            rows_scored: outcome.scored.data_rows().count(),
            authors: outcome.aggregated.data_rows().count(),
            numeric_columns: outcome.numeric_columns.len(),
            degenerate_cells: outcome.score_report.degenerate_cells,
            summaries: &outcome.summaries,
            groups: outcome
                .groups
                .iter()
                .map(|g| GroupReport {
                    label: &g.label,
                    authors: g.authors,
                    summaries: &g.summaries,
                })
                .collect(),
            t_tests: &outcome.t_tests,
        }
    }
}

/// Render the outcome in the requested format.
pub fn render(outcome: &RunOutcome, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(&Report::new(outcome)).context("serialising report")
        }
        ReportFormat::Text => Ok(render_text(outcome)),
    }
}

fn render_text(outcome: &RunOutcome) -> String {
    let report = Report::new(outcome);
    let width = outcome
        .summaries
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{} rows scored, {} authors, {} numeric columns, {} degenerate cells",
        report.rows_scored, report.authors, report.numeric_columns, report.degenerate_cells
    );

    let _ = writeln!(out, "\nAll authors");
    write_summaries(&mut out, report.summaries, width);
    for group in &report.groups {
        let _ = writeln!(out, "\nGroup '{}' ({} authors)", group.label, group.authors);
        write_summaries(&mut out, group.summaries, width);
    }

    if !report.t_tests.is_empty() {
        let _ = writeln!(out, "\nWelch's t-test");
        let _ = writeln!(out, "{:<width$}  {:>10}  {:>8}  {:>10}", "Column", "t", "df", "p");
        for t in report.t_tests {
            let _ = writeln!(
                out,
                "{:<width$}  {:>10.4}  {:>8.2}  {:>10.6}",
                t.name, t.t_statistic, t.degrees_of_freedom, t.p_value
            );
        }
    }
    out
}

fn write_summaries(out: &mut String, summaries: &[ColumnSummary], width: usize) {
    let _ = writeln!(out, "{:<width$}  {:>6}  {:>10}  {:>10}", "Column", "n", "mean", "sd");
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>10.4}  {:>10.4}",
            s.name, s.count, s.mean, s.std_dev
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;
    use crate::pipeline::GroupSummary;
    use crate::scoring::ScoreReport;

    fn outcome() -> RunOutcome {
        let summary = ColumnSummary {
            column: 3,
            name: "care (3)".into(),
            count: 4,
            mean: 12.5,
            std_dev: 2.0,
        };
        RunOutcome {
            scored: Table::from_rows(vec![vec!["h".into()], vec!["h".into()], vec!["x".into()]]),
            score_report: ScoreReport {
                word_count_columns: vec![],
                score_columns: vec![3],
                degenerate_cells: 1,
            },
            aggregated: Table::from_rows(vec![vec!["h".into()], vec!["h".into()]]),
            numeric_columns: vec![3],
            summaries: vec![summary.clone()],
            groups: vec![GroupSummary {
                label: "R".into(),
                authors: 2,
                summaries: vec![summary],
            }],
            t_tests: vec![TTestResult {
                column: 3,
                name: "care (3)".into(),
                t_statistic: -1.5,
                p_value: 0.2,
                degrees_of_freedom: 3.1,
            }],
        }
    }

    #[test]
    fn text_report_lists_every_section() {
        let text = render(&outcome(), ReportFormat::Text).unwrap();
        assert!(text.starts_with("1 rows scored, 0 authors, 1 numeric columns, 1 degenerate cells"));
        assert!(text.contains("Group 'R' (2 authors)"));
        assert!(text.contains("Welch's t-test"));
        assert!(text.contains("12.5000"));
        assert!(text.contains("0.200000"));
    }

    #[test]
    fn json_report_is_machine_readable() {
        let json = render(&outcome(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["degenerate_cells"], 1);
        assert_eq!(value["groups"][0]["label"], "R");
        assert_eq!(value["t_tests"][0]["p_value"], 0.2);
    }
}
