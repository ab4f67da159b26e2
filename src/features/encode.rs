use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use crate::features::Nullable;
use crate::model::CategoryEncoder;

pub const PROTOCOL: &str = "protocol";

/// Text the encoder sees for a null protocol cell.
const NULL_TEXT: &str = "nan";

/// Replace the `protocol` column with its encoder codes. One unseen value fails the batch.
pub fn encode_protocol(frame: &mut Frame, encoder: &CategoryEncoder) -> Result<()> {
    let values: Vec<String> = frame
        .text(PROTOCOL)
        .ok_or_else(|| PipelineError::MissingColumns(vec![PROTOCOL.to_string()]))?
        .iter()
        .map(|cell| cell.clone().unwrap_or_else(|| NULL_TEXT.to_string()))
        .collect();
    let codes = encoder.transform(PROTOCOL, &values)?;
    frame.set(
        PROTOCOL,
        Column::Number(codes.into_iter().map(|c| Nullable::new(c as f64)).collect()),
    );
    Ok(())
}
