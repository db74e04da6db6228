// used so values can cross into the sql: pass-through
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

// used to print out readable forms of a value
use std::fmt;

use std::cmp::Ordering;

use crate::error::{Result, TabsiftError};

/// A single typed cell or scalar. This is the unit everything else trades in:
/// dataset cells, coerced filter operands, aggregate results.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Value {
    /// Coerce a raw text token into the most specific typed value.
    ///
    /// The order is fixed and total: integer, then float, then the literal
    /// words "true"/"false" (case-insensitive), else the token itself with
    /// surrounding quote characters stripped. `"1"` becomes `Int(1)`, never
    /// text. Never fails.
    pub fn coerce(token: &str) -> Value {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = token.parse::<f64>() {
            return Value::Float(f);
        }
        match token.to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(token.trim_matches(|c| c == '\'' || c == '"').to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used by mean/sum. Booleans count as 0/1, text only if it
    /// parses cleanly. Null has no numeric view and is excluded upstream.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Null => None,
        }
    }

    /// Key for dedup containers. Carries a type tag so `Int(1)` and
    /// `Text("1")` stay distinct.
    pub fn dedup_key(&self) -> String {
        match self {
            Value::Int(i) => format!("i:{i}"),
            Value::Float(f) => format!("f:{f}"),
            Value::Bool(b) => format!("b:{b}"),
            Value::Text(s) => format!("t:{s}"),
            Value::Null => "n:".to_string(),
        }
    }

    fn family(&self) -> &'static str {
        match self {
            Value::Int(_) | Value::Float(_) => "numeric",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Null => "null",
        }
    }

    /// Natural ordering within a type family. Int and Float compare
    /// numerically; anything cross-family is `None`.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (a, b) if a.family() == "numeric" && b.family() == "numeric" => {
                a.as_f64().unwrap().partial_cmp(&b.as_f64().unwrap())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Null => Ok(()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Int(i) => ToSqlOutput::from(*i),
            Value::Float(f) => ToSqlOutput::from(*f),
            // SQLite has no boolean type; 0/1 matches what the legacy engine saw
            Value::Bool(b) => ToSqlOutput::from(*b as i64),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
        })
    }
}

impl Value {
    /// Read a value back out of a SQLite result cell.
    pub fn from_sql_ref(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Int(i),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

/// Comparison operators usable in a filter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// `==` and `=` both mean equality.
    pub fn from_symbol(symbol: &str) -> Option<CompareOp> {
        match symbol {
            "==" | "=" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }

    /// Evaluate `cell <op> rhs`.
    ///
    /// Null cells match only `!=`: a null is never equal to, greater than or
    /// less than anything, but it does differ from everything. Equality
    /// across different non-null families is simply false; ordering across
    /// families is a hard type error rather than a silent all-false scan.
    pub fn eval(&self, cell: &Value, rhs: &Value) -> Result<bool> {
        if cell.is_null() || rhs.is_null() {
            return Ok(matches!(self, CompareOp::Ne));
        }
        match cell.natural_cmp(rhs) {
            Some(ordering) => Ok(match self {
                CompareOp::Eq => ordering == Ordering::Equal,
                CompareOp::Ne => ordering != Ordering::Equal,
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Ge => ordering != Ordering::Less,
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
            }),
            // NaN never compares within the numeric family
            None if cell.family() == rhs.family() => {
                Ok(matches!(self, CompareOp::Ne))
            }
            None => match self {
                CompareOp::Eq => Ok(false),
                CompareOp::Ne => Ok(true),
                _ => Err(TabsiftError::Type(format!(
                    "Ordering comparison not allowed between {} and {}",
                    cell.family(),
                    rhs.family()
                ))),
            },
        }
    }
}

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }

    /// SQLite column affinity used when the dataset is materialized for the
    /// sql: pass-through.
    pub fn sql_affinity(&self) -> &'static str {
        match self {
            ColumnType::Int | ColumnType::Bool => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // dtype names kept in the shape users of the legacy explorer know
        let name = match self {
            ColumnType::Int => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "object",
        };
        write!(f, "{}", name)
    }
}
