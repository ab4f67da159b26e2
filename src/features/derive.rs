//! Per-source-IP derived features: time since previous packet, 1s packet rate, port repetition.
//!
//! Groups are never re-sorted; each group's order is the table's chronological order.

use super::Nullable;
use crate::error::{PipelineError, Result};
use crate::frame::{Column, Frame};
use crate::ingest::NormalizedTable;
use crate::sensor::SensorStrategy;
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::HashMap;

pub const TIME_DIFF: &str = "time_diff";
pub const PKT_RATE_1S: &str = "pkt_rate_1s";
pub const SAME_DST_PORT: &str = "same_dst_port";
pub const DIFF_SRC_PORT: &str = "diff_src_port";

/// Derived column names in the order they are appended.
pub const DERIVED_COLUMNS: [&str; 4] = [TIME_DIFF, PKT_RATE_1S, SAME_DST_PORT, DIFF_SRC_PORT];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFeatures {
    pub time_diff: Vec<f64>,
    /// Null for rows outside any (src_ip, second) bucket
    pub pkt_rate_1s: Vec<Nullable>,
    pub same_dst_port: Vec<u8>,
    pub diff_src_port: Vec<u8>,
}

impl DerivedFeatures {
    /// Write the four columns into `frame`, overwriting same-named input columns in place.
    pub fn attach(self, frame: &mut Frame) {
        let flags = |v: Vec<u8>| Column::Number(v.into_iter().map(|f| Nullable::new(f as f64)).collect());
        frame.set(
            TIME_DIFF,
            Column::Number(self.time_diff.into_iter().map(Nullable::new).collect()),
        );
        frame.set(PKT_RATE_1S, Column::Number(self.pkt_rate_1s));
        frame.set(SAME_DST_PORT, flags(self.same_dst_port));
        frame.set(DIFF_SRC_PORT, flags(self.diff_src_port));
    }
}

fn seconds(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

fn floor_second(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp()
}

fn column<'a, T: ?Sized>(value: Option<&'a T>, name: &str) -> Result<&'a T> {
    value.ok_or_else(|| PipelineError::MissingColumns(vec![name.to_string()]))
}

/// Compute the derived features for every row of `table`.
///
/// Rows with a null `src_ip` belong to no group: they are treated as a group's first row
/// and get no packet rate. A null timestamp on either side of a diff yields `time_diff = 0`.
pub fn derive_features(table: &NormalizedTable, strategy: &dyn SensorStrategy) -> Result<DerivedFeatures> {
    let frame = table.frame();
    let ts = column(frame.times("timestamp"), "timestamp")?;
    let ips = column(frame.text("src_ip"), "src_ip")?;
    let src = column(frame.numbers("src_port"), "src_port")?;
    let dst = column(frame.numbers("dst_port"), "dst_port")?;

    let n = frame.len();
    let mut out = DerivedFeatures {
        time_diff: Vec::with_capacity(n),
        pkt_rate_1s: Vec::with_capacity(n),
        same_dst_port: Vec::with_capacity(n),
        diff_src_port: Vec::with_capacity(n),
    };

    // Bucket sizes count rows with a non-null src_port, the column the model was trained on.
    let mut buckets: HashMap<(&str, i64), usize> = HashMap::new();
    for i in 0..n {
        if let (Some(ip), Some(t)) = (ips[i].as_deref(), ts[i]) {
            let count = buckets.entry((ip, floor_second(t))).or_insert(0);
            if !src[i].is_null() {
                *count += 1;
            }
        }
    }

    let mut previous: HashMap<&str, usize> = HashMap::new();
    for i in 0..n {
        let prev = ips[i].as_deref().and_then(|ip| previous.insert(ip, i));

        let (dt, dst_diff, src_diff) = match prev {
            Some(p) => {
                let dt = match (ts[i], ts[p]) {
                    (Some(cur), Some(before)) => seconds(cur - before),
                    _ => 0.0,
                };
                (dt, dst[i].diff(dst[p]), src[i].diff(src[p]))
            }
            None => (0.0, Nullable::NULL, Nullable::NULL),
        };

        let rate = match (ips[i].as_deref(), ts[i]) {
            (Some(ip), Some(t)) => buckets
                .get(&(ip, floor_second(t)))
                .map(|&c| Nullable::new(c as f64))
                .unwrap_or(Nullable::NULL),
            _ => Nullable::NULL,
        };

        out.time_diff.push(dt);
        out.pkt_rate_1s.push(rate);
        out.same_dst_port.push(strategy.same_dst_port(dst_diff) as u8);
        out.diff_src_port.push(strategy.diff_src_port(src_diff) as u8);
    }

    tracing::debug!(
        sensor = %strategy.variant(),
        rows = n,
        groups = previous.len(),
        buckets = buckets.len(),
        "derived features"
    );
    Ok(out)
}
