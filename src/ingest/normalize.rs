//! Normalization: typed timestamps and ports, global chronological order.

use crate::error::{PipelineError, Result};
use crate::features::Nullable;
use crate::frame::{Column, Frame};
use crate::sensor::SensorStrategy;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "timestamp", "src_ip", "dst_ip", "src_port", "dst_port", "protocol",
];

/// A frame whose `timestamp` column is typed and whose rows are in ascending
/// timestamp order (stable, null timestamps last). Only [`normalize`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable(Frame);

impl NormalizedTable {
    pub fn frame(&self) -> &Frame {
        &self.0
    }

    pub fn into_frame(self) -> Frame {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn null_last(a: &Option<NaiveDateTime>, b: &Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn text_column<'a>(frame: &'a Frame, name: &str) -> Result<&'a [Option<String>]> {
    frame
        .text(name)
        .ok_or_else(|| PipelineError::MissingColumns(vec![name.to_string()]))
}

/// Parse timestamps, sort the whole table by them, then coerce ports per the strategy.
pub fn normalize(mut frame: Frame, strategy: &dyn SensorStrategy) -> Result<NormalizedTable> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| frame.position(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }
    if frame.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let timestamps: Vec<Option<NaiveDateTime>> = text_column(&frame, "timestamp")?
        .iter()
        .map(|cell| cell.as_deref().and_then(|s| strategy.parse_timestamp(s)))
        .collect();
    let unparsed = timestamps.iter().filter(|t| t.is_none()).count();

    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by(|&a, &b| null_last(&timestamps[a], &timestamps[b]));

    frame.set("timestamp", Column::Time(timestamps));
    frame.reorder(&order);

    for name in ["src_port", "dst_port"] {
        let ports: Vec<Nullable> = text_column(&frame, name)?
            .iter()
            .map(|cell| strategy.coerce_port(cell.as_deref()))
            .collect();
        frame.set(name, Column::Number(ports));
    }

    if unparsed > 0 {
        tracing::warn!(
            sensor = %strategy.variant(),
            rows = unparsed,
            "timestamps could not be parsed; rows kept with null timestamp"
        );
    }
    tracing::debug!(sensor = %strategy.variant(), rows = frame.len(), "normalized log export");
    Ok(NormalizedTable(frame))
}
