//! Feature matrix handed to the classifier: every kept column as f32, nulls filled with 0.

use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use serde::{Deserialize, Serialize};

/// Row-major `rows × columns` matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: usize,
    values: Vec<f32>,
}

/// Numeric value of a pass-through text cell. Null → 0, booleans as 0/1.
fn text_value(cell: &Option<String>) -> Option<f64> {
    let Some(s) = cell else { return Some(0.0) };
    match s.as_str() {
        "True" | "TRUE" | "true" => Some(1.0),
        "False" | "FALSE" | "false" => Some(0.0),
        other => other.trim().parse::<f64>().ok().map(|v| if v.is_nan() { 0.0 } else { v }),
    }
}

fn column_values(name: &str, column: &Column) -> Result<Vec<f32>> {
    let non_numeric = |row: usize, value: String| PipelineError::NonNumericFeature {
        column: name.to_string(),
        row,
        value,
    };
    match column {
        Column::Number(v) => Ok(v.iter().map(|n| n.or(0.0) as f32).collect()),
        Column::Text(v) => v
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                text_value(cell)
                    .map(|x| x as f32)
                    .ok_or_else(|| non_numeric(row, cell.clone().unwrap_or_default()))
            })
            .collect(),
        Column::Time(v) => match v.iter().position(Option::is_some) {
            Some(row) => Err(non_numeric(row, v[row].map(|t| t.to_string()).unwrap_or_default())),
            None => Ok(vec![0.0; v.len()]),
        },
        Column::Label(v) => match v.first() {
            Some(first) => Err(non_numeric(0, first.clone())),
            None => Ok(Vec::new()),
        },
    }
}

impl FeatureMatrix {
    /// Build from every column of `frame` not listed in `drop`, in frame order.
    pub fn build(frame: &Frame, drop: &[String]) -> Result<Self> {
        let mut columns = Vec::new();
        let mut data = Vec::new();
        for (name, column) in frame.without(drop) {
            data.push(column_values(name, column)?);
            columns.push(name.to_string());
        }

        let rows = frame.len();
        let mut values = Vec::with_capacity(rows * columns.len());
        for r in 0..rows {
            values.extend(data.iter().map(|col| col[r]));
        }
        Ok(Self {
            columns,
            rows,
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn row(&self, i: usize) -> &[f32] {
        let w = self.width();
        &self.values[i * w..(i + 1) * w]
    }

    pub fn column(&self, name: &str) -> Option<Vec<f32>> {
        let c = self.columns.iter().position(|n| n == name)?;
        Some((0..self.rows).map(|r| self.values[r * self.width() + c]).collect())
    }
}
