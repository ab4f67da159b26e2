//! Suricata exports: timestamps in whatever shape the sensor was configured for, ports left null.

use super::{SensorStrategy, SensorVariant};
use crate::features::Nullable;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y-%H:%M:%S%.f",
    "%m/%d/%y-%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

pub struct SuricataStrategy {
    drop_columns: Vec<String>,
}

impl SuricataStrategy {
    pub fn new(drop_columns: Vec<String>) -> Self {
        Self { drop_columns }
    }
}

/// Try the common layouts in turn. Values with an offset are normalised to UTC.
fn parse_any(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl SensorStrategy for SuricataStrategy {
    fn variant(&self) -> SensorVariant {
        SensorVariant::Suricata
    }

    fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        parse_any(raw)
    }

    fn coerce_port(&self, raw: Option<&str>) -> Nullable {
        raw.map(Nullable::parse).unwrap_or(Nullable::NULL)
    }

    fn same_dst_port(&self, diff: Nullable) -> bool {
        diff.eq_zero()
    }

    fn diff_src_port(&self, diff: Nullable) -> bool {
        diff.ne_zero()
    }

    fn drop_columns(&self) -> &[String] {
        &self.drop_columns
    }
}
