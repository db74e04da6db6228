//! The query executor: runs a [`RecognizedQuery`] against the loaded dataset
//! and produces a tagged [`Answer`].
//!
//! Aggregates, row counts, unique values and filters are evaluated directly
//! over the column store. The `sql:` pass-through materializes the dataset
//! into an in-memory SQLite database under the fixed table name `df` and
//! hands the query text to the engine verbatim; engine errors propagate with
//! their own messages.
//!
//! Note the deliberate asymmetry carried over from the legacy explorer: a
//! missing column in an aggregate/unique/filter shape answers with a
//! `Message`, while type failures and SQL failures are hard errors.

use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use rusqlite::Connection;
use seahash::SeaHasher;

use crate::datatype::Value;
use crate::error::{Result, TabsiftError};
use crate::resolve::{AggregateOp, RecognizedQuery};
use crate::store::{Column, Dataset};

type SeenHasher = BuildHasherDefault<SeaHasher>;

/// Table name the dataset is bound under for pass-through queries.
pub const SQL_TABLE: &str = "df";

/// A rectangular query result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    /// True when rows were cut off by a limit (or preview length).
    pub limited: bool,
}

/// The tagged result of executing a query. Callers match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Scalar(Value),
    Values(Vec<Value>),
    Table(ResultTable),
    Message(String),
}

impl Answer {
    pub fn kind(&self) -> &'static str {
        match self {
            Answer::Scalar(_) => "scalar",
            Answer::Values(_) => "values",
            Answer::Table(_) => "table",
            Answer::Message(_) => "message",
        }
    }
}

fn column_or_message<'d>(
    dataset: &'d Dataset,
    name: &str,
) -> std::result::Result<&'d Column, Answer> {
    dataset
        .column(name)
        .ok_or_else(|| Answer::Message(format!("Column '{}' not found.", name)))
}

pub fn execute(query: RecognizedQuery, dataset: &Dataset) -> Result<Answer> {
    match query {
        RecognizedQuery::CountRows => Ok(Answer::Scalar(Value::Int(dataset.row_count() as i64))),
        RecognizedQuery::Aggregate { column, op } => {
            let col = match column_or_message(dataset, &column) {
                Ok(col) => col,
                Err(message) => return Ok(message),
            };
            aggregate(col, op).map(Answer::Scalar)
        }
        RecognizedQuery::UniqueValues { column } => {
            let col = match column_or_message(dataset, &column) {
                Ok(col) => col,
                Err(message) => return Ok(message),
            };
            Ok(Answer::Values(unique_values(col)))
        }
        RecognizedQuery::Filter {
            column,
            op,
            value,
            limit,
        } => {
            let col = match column_or_message(dataset, &column) {
                Ok(col) => col,
                Err(message) => return Ok(message),
            };
            // The whole mask is evaluated before truncation, so a type
            // mismatch surfaces no matter where the offending row sits.
            let mut matches = Vec::new();
            for (i, cell) in col.values.iter().enumerate() {
                if op.eval(cell, &value)? {
                    matches.push(i);
                }
            }
            let limited = matches.len() > limit;
            matches.truncate(limit);
            Ok(Answer::Table(ResultTable {
                columns: dataset.column_names(),
                rows: dataset.rows_at(&matches),
                row_count: matches.len(),
                limited,
            }))
        }
        RecognizedQuery::RawRelational(sql) => relational(dataset, &sql).map(Answer::Table),
    }
}

fn aggregate(col: &Column, op: AggregateOp) -> Result<Value> {
    match op {
        AggregateOp::Mean | AggregateOp::Sum => {
            let mut cast = Vec::new();
            for v in col.non_null() {
                match v.as_f64() {
                    Some(f) => cast.push(f),
                    None => {
                        return Err(TabsiftError::Type(format!(
                            "could not cast column '{}' to float: '{}'",
                            col.name, v
                        )));
                    }
                }
            }
            let sum: f64 = cast.iter().sum();
            Ok(match op {
                AggregateOp::Sum => Value::Float(sum),
                _ if cast.is_empty() => Value::Null,
                _ => Value::Float(sum / cast.len() as f64),
            })
        }
        AggregateOp::Max | AggregateOp::Min => {
            // NaN cells are skipped along with nulls
            let mut best: Option<&Value> = None;
            for v in col.non_null() {
                if matches!(v, Value::Float(f) if f.is_nan()) {
                    continue;
                }
                best = Some(match best {
                    None => v,
                    Some(b) => match v.natural_cmp(b) {
                        Some(ordering) => {
                            let wins = if op == AggregateOp::Max {
                                ordering == std::cmp::Ordering::Greater
                            } else {
                                ordering == std::cmp::Ordering::Less
                            };
                            if wins { v } else { b }
                        }
                        None => {
                            return Err(TabsiftError::Type(format!(
                                "mixed types in column '{}' cannot be ordered",
                                col.name
                            )));
                        }
                    },
                });
            }
            Ok(best.cloned().unwrap_or(Value::Null))
        }
    }
}

/// Distinct non-null values in first-occurrence order, native column type.
fn unique_values(col: &Column) -> Vec<Value> {
    let mut seen: HashSet<String, SeenHasher> = HashSet::default();
    let mut out = Vec::new();
    for v in col.non_null() {
        if seen.insert(v.dedup_key()) {
            out.push(v.clone());
        }
    }
    out
}

/// Run a pass-through relational query with the dataset bound as `df`.
pub fn relational(dataset: &Dataset, sql: &str) -> Result<ResultTable> {
    let conn = Connection::open_in_memory()?;

    let ddl_columns: Vec<String> = dataset
        .columns
        .iter()
        .map(|c| {
            format!(
                "\"{}\" {}",
                c.name.replace('"', "\"\""),
                c.dtype.sql_affinity()
            )
        })
        .collect();
    conn.execute(
        &format!("CREATE TABLE {} ({})", SQL_TABLE, ddl_columns.join(", ")),
        [],
    )?;

    if dataset.column_count() > 0 {
        let placeholders: Vec<&str> = dataset.columns.iter().map(|_| "?").collect();
        let mut insert = conn.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            SQL_TABLE,
            placeholders.join(", ")
        ))?;
        for i in 0..dataset.row_count() {
            insert.execute(rusqlite::params_from_iter(
                dataset.columns.iter().map(|c| &c.values[i]),
            ))?;
        }
    }

    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    let mut rows = Vec::new();
    let mut result = stmt.query([])?;
    while let Some(row) = result.next()? {
        let mut out = Vec::with_capacity(width);
        for i in 0..width {
            out.push(Value::from_sql_ref(row.get_ref(i)?));
        }
        rows.push(out);
    }
    let row_count = rows.len();
    Ok(ResultTable {
        columns,
        rows,
        row_count,
        limited: false,
    })
}
