//! Dataset profiling: schema, summary statistics, missingness, correlations.
//!
//! These are direct, idempotent reads over the loaded dataset. None of them
//! mutate anything, and all of them are plain single-pass computations.

use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;

use crate::datatype::Value;
use crate::execute::ResultTable;
use crate::store::{Column, Dataset};

type SeenHasher = BuildHasherDefault<SeaHasher>;

fn distinct_count(col: &Column) -> usize {
    let mut seen: HashSet<String, SeenHasher> = HashSet::default();
    col.non_null().filter(|v| seen.insert(v.dedup_key())).count()
}

fn numeric_cells(col: &Column) -> Vec<f64> {
    col.values
        .iter()
        .filter_map(|v| match v {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        })
        .collect()
}

/// Column, dtype, non-null / null counts and distinct count per column.
pub fn schema(dataset: &Dataset) -> ResultTable {
    let rows = dataset
        .columns
        .iter()
        .map(|c| {
            let nulls = c.values.iter().filter(|v| v.is_null()).count();
            vec![
                Value::Text(c.name.clone()),
                Value::Text(c.dtype.to_string()),
                Value::Int((c.values.len() - nulls) as i64),
                Value::Int(nulls as i64),
                Value::Int(distinct_count(c) as i64),
            ]
        })
        .collect::<Vec<_>>();
    table(
        vec!["column", "dtype", "non_null", "nulls", "unique"],
        rows,
    )
}

/// Per-column summary statistics. Mean/std/min/max are Null for non-numeric
/// columns; std is the sample standard deviation and needs two observations.
pub fn stats(dataset: &Dataset) -> ResultTable {
    let rows = dataset
        .columns
        .iter()
        .map(|c| {
            let count = c.non_null().count();
            let mut row = vec![
                Value::Text(c.name.clone()),
                Value::Int(count as i64),
                Value::Int(distinct_count(c) as i64),
            ];
            if c.dtype.is_numeric() {
                let cells = numeric_cells(c);
                row.push(mean_of(&cells).map(Value::Float).unwrap_or(Value::Null));
                row.push(std_of(&cells).map(Value::Float).unwrap_or(Value::Null));
                row.push(extreme(&cells, f64::min));
                row.push(extreme(&cells, f64::max));
            } else {
                row.extend([Value::Null, Value::Null, Value::Null, Value::Null]);
            }
            row
        })
        .collect::<Vec<_>>();
    table(
        vec!["column", "count", "unique", "mean", "std", "min", "max"],
        rows,
    )
}

/// Fraction of null cells per column, worst first.
pub fn missingness(dataset: &Dataset) -> ResultTable {
    let total = dataset.row_count();
    let mut ratios: Vec<(String, f64)> = dataset
        .columns
        .iter()
        .map(|c| {
            let nulls = c.values.iter().filter(|v| v.is_null()).count();
            let ratio = if total == 0 {
                0.0
            } else {
                nulls as f64 / total as f64
            };
            (c.name.clone(), ratio)
        })
        .collect();
    ratios.sort_by(|a, b| b.1.total_cmp(&a.1));
    let rows = ratios
        .into_iter()
        .map(|(name, ratio)| vec![Value::Text(name), Value::Float(ratio)])
        .collect();
    table(vec!["column", "missing_ratio"], rows)
}

/// Pearson correlation matrix over the numeric columns, pairwise-complete
/// observations. With zero numeric columns a one-cell sentinel table is
/// returned instead of an error.
pub fn correlations(dataset: &Dataset) -> ResultTable {
    let numeric: Vec<&Column> = dataset
        .columns
        .iter()
        .filter(|c| c.dtype.is_numeric())
        .collect();
    if numeric.is_empty() {
        return table(
            vec!["note"],
            vec![vec![Value::Text(
                "No numeric columns for correlation".to_string(),
            )]],
        );
    }

    let mut columns = vec!["column".to_string()];
    columns.extend(numeric.iter().map(|c| c.name.clone()));
    let rows = numeric
        .iter()
        .map(|a| {
            let mut row = vec![Value::Text(a.name.clone())];
            for b in &numeric {
                row.push(pearson(a, b).map(Value::Float).unwrap_or(Value::Null));
            }
            row
        })
        .collect::<Vec<_>>();
    let row_count = rows.len();
    ResultTable {
        columns,
        rows,
        row_count,
        limited: false,
    }
}

fn table(columns: Vec<&str>, rows: Vec<Vec<Value>>) -> ResultTable {
    let row_count = rows.len();
    ResultTable {
        columns: columns.into_iter().map(String::from).collect(),
        rows,
        row_count,
        limited: false,
    }
}

fn mean_of(cells: &[f64]) -> Option<f64> {
    if cells.is_empty() {
        None
    } else {
        Some(cells.iter().sum::<f64>() / cells.len() as f64)
    }
}

fn std_of(cells: &[f64]) -> Option<f64> {
    if cells.len() < 2 {
        return None;
    }
    let mean = mean_of(cells)?;
    let variance =
        cells.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (cells.len() - 1) as f64;
    Some(variance.sqrt())
}

fn extreme(cells: &[f64], pick: fn(f64, f64) -> f64) -> Value {
    cells
        .iter()
        .copied()
        .reduce(pick)
        .map(Value::Float)
        .unwrap_or(Value::Null)
}

fn pearson(a: &Column, b: &Column) -> Option<f64> {
    // pairwise-complete rows only
    let pairs: Vec<(f64, f64)> = a
        .values
        .iter()
        .zip(&b.values)
        .filter_map(|(x, y)| match (cell_f64(x), cell_f64(y)) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        None
    } else {
        Some(cov / denom)
    }
}

fn cell_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) if !f.is_nan() => Some(*f),
        _ => None,
    }
}
