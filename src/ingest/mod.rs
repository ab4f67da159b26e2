//! Log export ingestion: CSV reading, then normalization into a chronologically sorted table.

mod reader;
mod normalize;

pub use reader::{read_csv, read_csv_path, NULL_TOKENS};
pub use normalize::{normalize, NormalizedTable, REQUIRED_COLUMNS};
