//! Summary statistics and Welch's two-sample t-test over table columns.

use serde::Serialize;

use crate::aggregate::numeric_cell;
use crate::data::filter::partition_by_label;
use crate::data::model::Table;
use crate::error::AnalysisError;

/// Mean and sample standard deviation of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// 0-based column index.
    pub column: usize,
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Result of comparing one column between two groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTestResult {
    pub column: usize,
    pub name: String,
    pub t_statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// Numeric values of `column`.
///
/// With `rows == None` every data row is read (both header rows skipped);
/// otherwise exactly the given row indices are read. Degenerate cells are
/// skipped.
pub fn column_values(
    table: &Table,
    column: usize,
    rows: Option<&[usize]>,
) -> Result<Vec<f64>, AnalysisError> {
    let indices: Vec<usize> = match rows {
        Some(rows) => rows.to_vec(),
        None => table.data_row_indices().collect(),
    };
    let mut values = Vec::with_capacity(indices.len());
    for row in indices {
        if let Some(v) = numeric_cell(table, row, column)? {
            values.push(v);
        }
    }
    Ok(values)
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased (n − 1) sample variance; `NaN` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

fn summarize_values(
    table: &Table,
    column: usize,
    values: &[f64],
) -> Result<ColumnSummary, AnalysisError> {
    if values.len() < 2 {
        return Err(AnalysisError::TooFewSamples {
            column: column + 1,
            needed: 2,
            found: values.len(),
        });
    }
    Ok(ColumnSummary {
        column,
        name: table.column_name(column).to_string(),
        count: values.len(),
        mean: mean(values),
        std_dev: sample_variance(values).sqrt(),
    })
}

/// Mean and sample standard deviation for each column, over `rows` (or all
/// data rows).
pub fn summarize(
    table: &Table,
    columns: &[usize],
    rows: Option<&[usize]>,
) -> Result<Vec<ColumnSummary>, AnalysisError> {
    columns
        .iter()
        .map(|&column| {
            let values = column_values(table, column, rows)?;
            summarize_values(table, column, &values)
        })
        .collect()
}

/// Welch's unequal-variance t-test between the rows labelled `label_a` and
/// `label_b` in `label_column`, for each target column.
pub fn t_test(
    table: &Table,
    label_column: usize,
    label_a: &str,
    label_b: &str,
    columns: &[usize],
) -> Result<Vec<TTestResult>, AnalysisError> {
    let (rows_a, rows_b) = partition_by_label(table, label_column, label_a, label_b);
    for (label, rows) in [(label_a, &rows_a), (label_b, &rows_b)] {
        if rows.is_empty() {
            log::warn!(
                "labels present in column {}: {:?}",
                label_column + 1,
                table.unique_values(label_column)
            );
            return Err(AnalysisError::EmptyGroup {
                label: label.to_string(),
            });
        }
    }

    columns
        .iter()
        .map(|&column| {
            let a = column_values(table, column, Some(rows_a.as_slice()))?;
            let b = column_values(table, column, Some(rows_b.as_slice()))?;
            for group in [&a, &b] {
                if group.len() < 2 {
                    return Err(AnalysisError::TooFewSamples {
                        column: column + 1,
                        needed: 2,
                        found: group.len(),
                    });
                }
            }
            let (t_statistic, degrees_of_freedom, p_value) = welch(&a, &b);
            Ok(TTestResult {
                column,
                name: table.column_name(column).to_string(),
                t_statistic,
                p_value,
                degrees_of_freedom,
            })
        })
        .collect()
}

/// Returns `(t, df, two-sided p)`. Both groups need at least two values.
///
/// Two constant groups have no standard error: equal means give `t = 0,
/// p = 1`, different means give `t = ±inf, p = 0`.
fn welch(a: &[f64], b: &[f64]) -> (f64, f64, f64) {
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (ma, mb) = (mean(a), mean(b));
    let (sa, sb) = (sample_variance(a) / na, sample_variance(b) / nb);
    let se2 = sa + sb;
    let diff = ma - mb;

    if se2 == 0.0 {
        let df = na + nb - 2.0;
        return if diff == 0.0 {
            (0.0, df, 1.0)
        } else {
            (diff.signum() * f64::INFINITY, df, 0.0)
        };
    }

    let t = diff / se2.sqrt();
    let df = se2.powi(2) / (sa.powi(2) / (na - 1.0) + sb.powi(2) / (nb - 1.0));
    (t, df, students_t_two_sided(t, df))
}

// ---------------------------------------------------------------------------
// Student's t distribution
// ---------------------------------------------------------------------------

/// Two-sided tail probability `P(|T| >= |t|)` for `df` degrees of freedom.
pub fn students_t_two_sided(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Lanczos approximation of `ln Γ(x)` for `x > 0`.
fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 6] = [
        76.180_091_729_471_46,
        -86.505_320_329_416_77,
        24.014_098_240_830_91,
        -1.231_739_572_450_155,
        0.120_865_097_386_617_9e-2,
        -0.539_523_938_495_3e-5,
    ];
    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut series = 1.000_000_000_190_015;
    for c in COEFFICIENTS {
        y += 1.0;
        series += c / y;
    }
    -tmp + (2.506_628_274_631_000_5 * series / x).ln()
}

/// `I_x(a, b)`.
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln())
        .exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 3.0e-14;
    const TINY: f64 = 1.0e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };
    let (qab, qap, qam) = (a + b, a + 1.0, a - 1.0);
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    h
}
