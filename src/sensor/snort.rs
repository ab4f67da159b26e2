//! Snort alert exports: `MM/DD-HH:MM:SS.ffffff` timestamps without a year, ports zero-filled on ingest.

use super::{SensorStrategy, SensorVariant};
use crate::features::Nullable;
use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S%.f";

pub struct SnortStrategy {
    assumed_year: i32,
    drop_columns: Vec<String>,
}

impl SnortStrategy {
    pub fn new(assumed_year: i32, drop_columns: Vec<String>) -> Self {
        Self {
            assumed_year,
            drop_columns,
        }
    }
}

/// The fraction must be present and 1 to 9 digits (up to nanosecond precision).
fn has_fraction(s: &str) -> bool {
    match s.rsplit_once('.') {
        Some((head, frac)) => {
            head.contains(':') && (1..=9).contains(&frac.len()) && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

impl SensorStrategy for SnortStrategy {
    fn variant(&self) -> SensorVariant {
        SensorVariant::Snort
    }

    fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let rewritten = format!("{}-{}", self.assumed_year, raw.replace('/', "-"));
        if !has_fraction(&rewritten) {
            return None;
        }
        NaiveDateTime::parse_from_str(&rewritten, TIMESTAMP_FORMAT).ok()
    }

    fn coerce_port(&self, raw: Option<&str>) -> Nullable {
        let port = raw.map(Nullable::parse).unwrap_or(Nullable::NULL);
        Nullable::new(port.or(0.0))
    }

    fn same_dst_port(&self, diff: Nullable) -> bool {
        diff.or(1.0) == 0.0
    }

    fn diff_src_port(&self, diff: Nullable) -> bool {
        diff.or(1.0) != 0.0
    }

    fn drop_columns(&self) -> &[String] {
        &self.drop_columns
    }
}
