//! The tabular store: owns the one currently loaded dataset.
//!
//! A [`Dataset`] is an ordered set of named, equal-length columns. It is
//! replaced wholesale on every load; nothing mutates it in place. On a failed
//! load the previous dataset stays exactly as it was.

use csv::ReaderBuilder;

use crate::datatype::{ColumnType, Value};
use crate::error::{Result, TabsiftError};
use crate::execute::ResultTable;

/// One named column with its inferred type.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<Value>,
}

impl Column {
    /// Non-null cells in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }
}

/// An in-memory table of named, equal-length columns plus its provenance.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Materialize the rows at the given positions, in the given order.
    pub fn rows_at(&self, positions: &[usize]) -> Vec<Vec<Value>> {
        positions
            .iter()
            .map(|&i| self.columns.iter().map(|c| c.values[i].clone()).collect())
            .collect()
    }
}

/// Parse options passed through to the CSV reader.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Field delimiter override; comma when absent.
    pub delimiter: Option<u8>,
}

/// Holds the currently loaded dataset. Single writer (load), any number of
/// sequential readers; the session serializes access.
#[derive(Debug, Default)]
pub struct TabularStore {
    dataset: Option<Dataset>,
}

impl TabularStore {
    pub fn new() -> Self {
        Self { dataset: None }
    }

    /// Parse CSV bytes into a fresh dataset and swap it in. The swap only
    /// happens once parsing has fully succeeded, so a malformed upload leaves
    /// any prior dataset intact.
    pub fn load(&mut self, bytes: &[u8], name: &str, options: &LoadOptions) -> Result<String> {
        let dataset = parse_csv(bytes, name, options)?;
        let message = format!(
            "Loaded '{}' with {} rows × {} columns.",
            name,
            dataset.row_count(),
            dataset.column_count()
        );
        self.dataset = Some(dataset);
        Ok(message)
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dataset(&self) -> Result<&Dataset> {
        self.dataset.as_ref().ok_or(TabsiftError::NotLoaded)
    }

    /// First `n` rows (fewer if the dataset is shorter).
    pub fn preview(&self, n: usize) -> Result<ResultTable> {
        let dataset = self.dataset()?;
        let take = n.min(dataset.row_count());
        let positions: Vec<usize> = (0..take).collect();
        Ok(ResultTable {
            columns: dataset.column_names(),
            rows: dataset.rows_at(&positions),
            row_count: take,
            limited: take < dataset.row_count(),
        })
    }
}

fn parse_csv(bytes: &[u8], name: &str, options: &LoadOptions) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter.unwrap_or(b','))
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(TabsiftError::Parse {
            message: "no columns found in input".to_string(),
        });
    }

    // Raw cells first; typing is decided per column once everything is read.
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        // the reader is strict about field counts, so ragged rows error here
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            raw[i].push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();
    Ok(Dataset {
        name: name.to_string(),
        columns,
    })
}

/// Column-wise type inference. A column is Int only if every non-empty cell
/// parses as an integer, Float if every cell is int-or-float (ints promoted),
/// Bool if every cell is a boolean keyword; otherwise the raw text is kept.
/// Empty cells become Null in all cases.
fn infer_column(name: String, cells: Vec<String>) -> Column {
    let coerced: Vec<Value> = cells
        .iter()
        .map(|c| {
            let trimmed = c.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::coerce(trimmed)
            }
        })
        .collect();

    let mut ints = 0;
    let mut floats = 0;
    let mut bools = 0;
    let mut nulls = 0;
    for v in &coerced {
        match v {
            Value::Int(_) => ints += 1,
            Value::Float(_) => floats += 1,
            Value::Bool(_) => bools += 1,
            Value::Text(_) => (),
            Value::Null => nulls += 1,
        }
    }
    let non_null = coerced.len() - nulls;

    let (dtype, values) = if non_null > 0 && ints == non_null {
        (ColumnType::Int, coerced)
    } else if non_null > 0 && ints + floats == non_null {
        let promoted = coerced
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => Value::Float(i as f64),
                other => other,
            })
            .collect();
        (ColumnType::Float, promoted)
    } else if non_null > 0 && bools == non_null {
        (ColumnType::Bool, coerced)
    } else {
        // Mixed or plain text columns keep their raw cells verbatim.
        let textual = cells
            .into_iter()
            .map(|c| {
                let trimmed = c.trim();
                if trimmed.is_empty() {
                    Value::Null
                } else {
                    Value::Text(trimmed.to_string())
                }
            })
            .collect();
        (ColumnType::Text, textual)
    };

    Column {
        name,
        dtype,
        values,
    }
}
