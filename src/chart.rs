//! Chart data projections. Pixel rendering is someone else's job; this only
//! selects the one or two columns a renderer needs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::datatype::Value;
use crate::error::{Result, TabsiftError};
use crate::execute::ResultTable;
use crate::store::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Hist,
}

impl FromStr for ChartKind {
    type Err = TabsiftError;

    fn from_str(s: &str) -> Result<ChartKind> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "scatter" => Ok(ChartKind::Scatter),
            "hist" => Ok(ChartKind::Hist),
            other => Err(TabsiftError::Parse {
                message: format!("unknown chart kind '{}'", other),
            }),
        }
    }
}

/// The projection handed to an external renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub table: ResultTable,
}

/// Project the x (and optional y) columns in original row order. Unknown
/// columns are hard errors on this path, unlike the ask() shapes.
pub fn chart_data(
    dataset: &Dataset,
    x: &str,
    y: Option<&str>,
    kind: ChartKind,
) -> Result<ChartData> {
    let mut picked = Vec::new();
    for name in std::iter::once(x).chain(y) {
        let col = dataset
            .column(name)
            .ok_or_else(|| TabsiftError::ColumnNotFound {
                name: name.to_string(),
            })?;
        picked.push(col);
    }

    let rows: Vec<Vec<Value>> = (0..dataset.row_count())
        .map(|i| picked.iter().map(|c| c.values[i].clone()).collect())
        .collect();
    let row_count = rows.len();
    Ok(ChartData {
        kind,
        table: ResultTable {
            columns: picked.iter().map(|c| c.name.clone()).collect(),
            rows,
            row_count,
            limited: false,
        },
    })
}
