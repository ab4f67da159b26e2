//! Sensor variants and the per-variant rules the pipeline is parameterised by.
//!
//! Everything that differs between Snort and Suricata exports goes through
//! [`SensorStrategy`]; the pipeline itself has a single code path.

mod snort;
mod suricata;

pub use snort::SnortStrategy;
pub use suricata::SuricataStrategy;

use crate::config::AppConfig;
use crate::features::Nullable;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorVariant {
    Snort,
    Suricata,
}

impl SensorVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorVariant::Snort => "snort",
            SensorVariant::Suricata => "suricata",
        }
    }

    /// Strategy configured from `config` for this variant.
    pub fn strategy(self, config: &AppConfig) -> Box<dyn SensorStrategy> {
        match self {
            SensorVariant::Snort => Box::new(SnortStrategy::new(
                config.snort.assumed_year,
                config.snort.drop_columns.clone(),
            )),
            SensorVariant::Suricata => {
                Box::new(SuricataStrategy::new(config.suricata.drop_columns.clone()))
            }
        }
    }
}

impl fmt::Display for SensorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snort" => Ok(SensorVariant::Snort),
            "suricata" => Ok(SensorVariant::Suricata),
            other => Err(format!("unknown sensor {:?} (expected snort or suricata)", other)),
        }
    }
}

/// Variant-specific ingestion and derivation rules.
pub trait SensorStrategy: Send + Sync {
    fn variant(&self) -> SensorVariant;

    /// Parse one non-null timestamp cell; `None` when unparseable.
    fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime>;

    /// Coerce one port cell to a number.
    fn coerce_port(&self, raw: Option<&str>) -> Nullable;

    /// `same_dst_port` flag from the diff to the previous dst_port in the group.
    fn same_dst_port(&self, diff: Nullable) -> bool;

    /// `diff_src_port` flag from the diff to the previous src_port in the group.
    fn diff_src_port(&self, diff: Nullable) -> bool;

    /// Identifier and annotation columns the classifier never sees.
    fn drop_columns(&self) -> &[String];
}
