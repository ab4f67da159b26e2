//! Labeled table → CSV.

use crate::error::Result;
use crate::features::Nullable;
use crate::frame::{Column, Frame};
use chrono::{NaiveDateTime, Timelike};
use std::io::Write;
use std::path::Path;

const BASE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Integral values without a fraction, everything else in shortest round-trip form.
pub fn format_number(n: Nullable) -> String {
    match n.get() {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
    }
}

/// Fraction digits needed to render every timestamp of a column losslessly.
fn time_precision(v: &[Option<NaiveDateTime>]) -> usize {
    let nanos = v.iter().flatten().map(|t| t.nanosecond() % 1_000_000_000);
    let mut digits = 0;
    for n in nanos {
        if n % 1_000 != 0 {
            return 9;
        }
        if n != 0 {
            digits = 6;
        }
    }
    digits
}

fn format_time(t: &Option<NaiveDateTime>, precision: usize) -> String {
    let Some(t) = t else { return String::new() };
    let base = t.format(BASE_TIME_FORMAT);
    let nanos = t.nanosecond() % 1_000_000_000;
    match precision {
        9 => format!("{}.{:09}", base, nanos),
        6 => format!("{}.{:06}", base, nanos / 1_000),
        _ => base.to_string(),
    }
}

fn rendered(column: &Column) -> Vec<String> {
    match column {
        Column::Text(v) => v.iter().map(|c| c.clone().unwrap_or_default()).collect(),
        Column::Number(v) => v.iter().map(|&n| format_number(n)).collect(),
        Column::Time(v) => {
            let p = time_precision(v);
            v.iter().map(|t| format_time(t, p)).collect()
        }
        Column::Label(v) => v.clone(),
    }
}

pub fn write_csv<W: Write>(frame: &Frame, out: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(frame.names())?;
    let cells: Vec<Vec<String>> = frame.iter().map(|(_, c)| rendered(c)).collect();
    for r in 0..frame.len() {
        w.write_record(cells.iter().map(|col| col[r].as_str()))?;
    }
    w.flush()?;
    Ok(())
}

/// Write to a sibling temp file and rename, so a failed write never leaves a partial result.
pub fn write_csv_file(path: &Path, frame: &Frame) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    let written = std::fs::File::create(&tmp)
        .map_err(Into::into)
        .and_then(|f| write_csv(frame, std::io::BufWriter::new(f)));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path)?;
    tracing::info!(path = %path.display(), rows = frame.len(), "wrote labeled table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(ms: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2025, 10, 5)
            .and_then(|d| d.and_hms_milli_opt(12, 0, 0, ms))
    }

    #[test]
    fn numbers_render_like_the_export() {
        assert_eq!(format_number(Nullable::new(80.0)), "80");
        assert_eq!(format_number(Nullable::new(0.4)), "0.4");
        assert_eq!(format_number(Nullable::new(-0.0)), "0");
        assert_eq!(format_number(Nullable::NULL), "");
    }

    #[test]
    fn time_column_uses_shared_precision() {
        let v = vec![at(0), at(100), None];
        let p = time_precision(&v);
        assert_eq!(p, 6);
        assert_eq!(format_time(&v[0], p), "2025-10-05 12:00:00.000000");
        assert_eq!(format_time(&v[1], p), "2025-10-05 12:00:00.100000");
        assert_eq!(format_time(&v[2], p), "");
        assert_eq!(time_precision(&[at(0)]), 0);
    }

    #[test]
    fn writes_header_and_rows() {
        let mut f = Frame::from_rows(vec!["msg".into()], vec![vec![Some("a,b".into())], vec![None]]);
        f.set("n", Column::Number(vec![Nullable::new(1.0), Nullable::new(2.5)]));
        let mut buf = Vec::new();
        write_csv(&f, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "msg,n\n\"a,b\",1\n,2.5\n");
    }

    #[test]
    fn file_write_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let f = Frame::from_rows(vec!["x".into()], vec![vec![Some("1".into())]]);
        write_csv_file(&path, &f).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n1\n");
        assert!(!dir.path().join("out.csv.tmp").exists());
    }
}
