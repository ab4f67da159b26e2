//! Batch-level failures. Per-cell coercion problems never surface here; they become nulls.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not read log export: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line} has {got} fields, header has {expected}")]
    RaggedRow { line: u64, expected: usize, got: usize },

    #[error("log export contains no rows")]
    EmptyInput,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column {column:?} contains values unseen by the encoder: {}", .values.join(", "))]
    UnseenCategory { column: String, values: Vec<String> },

    #[error("column {column:?} has non-numeric value {value:?} at row {row}")]
    NonNumericFeature {
        column: String,
        row: usize,
        value: String,
    },

    #[error("feature matrix has {got} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("feature columns [{}] do not match model columns [{}]", .got.join(", "), .expected.join(", "))]
    ColumnMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("model returned {got} predictions for {expected} rows")]
    PredictionCount { expected: usize, got: usize },

    #[error("model inference failed: {0}")]
    Model(String),

    #[error("could not load artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
