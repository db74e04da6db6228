//! The pattern matcher: classifies free text into exactly one
//! [`RecognizedQuery`], or nothing.
//!
//! Recognition is an ordered table of `(Regex, builder)` pairs evaluated in
//! fixed priority order; the first full match wins. The filter shape is tried
//! before the aggregate shapes. All patterns are anchored to the entire
//! trimmed input and matching is case-insensitive (the input is lowercased
//! up front, so extracted column names come out lowercased too).

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::datatype::{CompareOp, Value};

/// A reducing operation over one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Mean,
    Sum,
    Max,
    Min,
}

/// The tagged outcome of recognition. Built once per input, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizedQuery {
    Aggregate { column: String, op: AggregateOp },
    CountRows,
    UniqueValues { column: String },
    Filter {
        column: String,
        op: CompareOp,
        value: Value,
        limit: usize,
    },
    RawRelational(String),
}

/// Prefix that routes the remainder of the input straight to the relational
/// engine.
pub const SQL_PREFIX: &str = "sql:";

/// Returned (as a successful answer, not an error) when no shape matches.
pub const HELP: &str = "Unrecognized pattern. Try: 'average of <col>', 'sum of <col>', \
'count rows', 'unique values of <col>', or 'filter <col> > 10 and show top 5'. \
To use SQL, start with 'sql:'.";

type Builder = fn(&Captures) -> Option<RecognizedQuery>;

fn column_of(caps: &Captures) -> String {
    caps.get(1).unwrap().as_str().trim().to_string()
}

fn build_filter(caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::Filter {
        column: column_of(caps),
        op: CompareOp::from_symbol(caps.get(2).unwrap().as_str()).unwrap(),
        value: Value::coerce(caps.get(3).unwrap().as_str()),
        // an N beyond the platform integer is not a recognized shape
        limit: caps.get(4).unwrap().as_str().parse().ok()?,
    })
}

fn build_mean(caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::Aggregate { column: column_of(caps), op: AggregateOp::Mean })
}

fn build_sum(caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::Aggregate { column: column_of(caps), op: AggregateOp::Sum })
}

fn build_max(caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::Aggregate { column: column_of(caps), op: AggregateOp::Max })
}

fn build_min(caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::Aggregate { column: column_of(caps), op: AggregateOp::Min })
}

fn build_count(_caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::CountRows)
}

fn build_unique(caps: &Captures) -> Option<RecognizedQuery> {
    Some(RecognizedQuery::UniqueValues { column: column_of(caps) })
}

lazy_static! {
    // Priority order matters: filter first, then the aggregate shapes.
    static ref SHAPES: Vec<(Regex, Builder)> = vec![
        (
            Regex::new(r"^filter ([\w\-\s]+)\s*(==|=|>=|<=|>|<|!=)\s*(\S+)\s*and show top\s*(\d+)$")
                .unwrap(),
            build_filter as Builder,
        ),
        (Regex::new(r"^average of ([\w\-\s]+)$").unwrap(), build_mean as Builder),
        (Regex::new(r"^mean of ([\w\-\s]+)$").unwrap(), build_mean as Builder),
        (Regex::new(r"^sum of ([\w\-\s]+)$").unwrap(), build_sum as Builder),
        (Regex::new(r"^max of ([\w\-\s]+)$").unwrap(), build_max as Builder),
        (Regex::new(r"^min of ([\w\-\s]+)$").unwrap(), build_min as Builder),
        (Regex::new(r"^count rows$").unwrap(), build_count as Builder),
        (Regex::new(r"^unique values of ([\w\-\s]+)$").unwrap(), build_unique as Builder),
    ];
}

/// Classify the input, or `None` when no shape matches (the caller answers
/// with [`HELP`] in that case).
pub fn resolve(text: &str) -> Option<RecognizedQuery> {
    let normalized = text.trim().to_lowercase();
    for (pattern, build) in SHAPES.iter() {
        if let Some(caps) = pattern.captures(&normalized) {
            return build(&caps);
        }
    }
    None
}

/// Split off the `sql:` escape prefix, case-insensitively. Returns the
/// trailing query text verbatim (original casing) when present.
pub fn strip_sql_prefix(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    match trimmed.split_at_checked(SQL_PREFIX.len()) {
        Some((prefix, rest)) if prefix.eq_ignore_ascii_case(SQL_PREFIX) => Some(rest.trim()),
        _ => None,
    }
}
