//! CSV reader producing an all-text [`Frame`] with null cells resolved.

use crate::error::{PipelineError, Result};
use crate::frame::Frame;
use std::io::Read;
use std::path::Path;

/// Cell values read as null, the same set the training exports were loaded with.
pub const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn to_cell(raw: &str) -> Option<String> {
    if NULL_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Read a delimited export with a header row. Short rows are padded with nulls; rows
/// longer than the header, an empty file and a header without rows are batch failures.
pub fn read_csv<R: Read>(input: R) -> Result<Frame> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(PipelineError::EmptyInput);
    }

    let width = headers.len();
    let mut rows = Vec::new();
    let mut padded = 0usize;
    for record in rdr.records() {
        let record = record?;
        if record.len() > width {
            return Err(PipelineError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                got: record.len(),
            });
        }
        let mut row: Vec<Option<String>> = record.iter().map(to_cell).collect();
        if row.len() < width {
            padded += 1;
            row.resize(width, None);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    if padded > 0 {
        tracing::warn!(rows = padded, "short rows padded with null cells");
    }
    tracing::debug!(rows = rows.len(), columns = width, "read log export");
    Ok(Frame::from_rows(headers, rows))
}

pub fn read_csv_path(path: &Path) -> Result<Frame> {
    let file = std::fs::File::open(path)?;
    read_csv(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tokens_become_null_cells() {
        let f = read_csv("a,b,c\nNaN,,x\n".as_bytes()).unwrap();
        assert_eq!(f.len(), 1);
        assert_eq!(f.text("a").unwrap(), &[None]);
        assert_eq!(f.text("b").unwrap(), &[None]);
        assert_eq!(f.text("c").unwrap(), &[Some("x".to_string())]);
    }

    #[test]
    fn empty_inputs_fail() {
        assert!(matches!(read_csv("".as_bytes()), Err(PipelineError::EmptyInput)));
        assert!(matches!(read_csv("a,b\n".as_bytes()), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let f = read_csv("a,b,c\n1,2,3\n4,5\n".as_bytes()).unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.text("b").unwrap(), &[Some("2".to_string()), Some("5".to_string())]);
        assert_eq!(f.text("c").unwrap(), &[Some("3".to_string()), None]);
    }

    #[test]
    fn long_rows_fail() {
        match read_csv("a,b\n1,2\n3,4,5\n".as_bytes()) {
            Err(PipelineError::RaggedRow { line, expected, got }) => {
                assert_eq!((line, expected, got), (3, 2, 3));
            }
            other => panic!("expected ragged row error, got {:?}", other.map(|f| f.len())),
        }
    }
}
