//! Result artifacts: the labeled CSV and the per-technique summary.

mod summary;
mod writer;

pub use summary::{LabelCount, LabelSummary};
pub use writer::{format_number, write_csv, write_csv_file};
