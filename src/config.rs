//! Predictor configuration: artifact locations, per-sensor drop lists (the training contract), logging.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding model, model metadata and encoder files
    pub artifacts_dir: PathBuf,
    /// Snort settings
    pub snort: SnortConfig,
    /// Suricata settings
    pub suricata: SuricataConfig,
    /// Logging
    pub log: LogConfig,
}

/// File names of one variant's artifacts, relative to `artifacts_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFiles {
    pub model: PathBuf,
    /// JSON with `feature_columns` and `labels`; optional on disk
    pub model_meta: PathBuf,
    pub protocol_encoder: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnortConfig {
    pub artifacts: ArtifactFiles,
    pub drop_columns: Vec<String>,
    /// Snort timestamps carry no year; this one is assumed
    pub assumed_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuricataConfig {
    pub artifacts: ArtifactFiles,
    pub drop_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

pub const SNORT_DROP_COLUMNS: [&str; 8] = [
    "timestamp", "src_ip", "dst_ip", "mitre", "pkt_num", "action", "msg", "label",
];

pub const SURICATA_DROP_COLUMNS: [&str; 10] = [
    "timestamp",
    "src_ip",
    "dst_ip",
    "gid",
    "sid",
    "rev",
    "message",
    "classification",
    "priority",
    "mitre",
];

impl ArtifactFiles {
    fn for_prefix(prefix: &str) -> Self {
        Self {
            model: PathBuf::from(format!("{}.onnx", prefix)),
            model_meta: PathBuf::from(format!("{}.meta.json", prefix)),
            protocol_encoder: PathBuf::from(format!("proto_{}.json", prefix)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            snort: SnortConfig::default(),
            suricata: SuricataConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for SnortConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactFiles::for_prefix("snort"),
            drop_columns: SNORT_DROP_COLUMNS.iter().map(|c| c.to_string()).collect(),
            assumed_year: 2025,
        }
    }
}

impl Default for SuricataConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactFiles::for_prefix("suricata"),
            drop_columns: SURICATA_DROP_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from JSON file if present; otherwise return default.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_err = |reason: String| PipelineError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let data = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| config_err(e.to_string()))
    }

    pub fn artifact_path(&self, file: &Path) -> PathBuf {
        self.artifacts_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_exact_drop_lists() {
        let c = AppConfig::default();
        assert_eq!(
            c.snort.drop_columns,
            vec!["timestamp", "src_ip", "dst_ip", "mitre", "pkt_num", "action", "msg", "label"]
        );
        assert_eq!(c.suricata.drop_columns.len(), 10);
        assert_eq!(c.suricata.drop_columns[9], "mitre");
        assert_eq!(c.snort.assumed_year, 2025);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c: AppConfig =
            serde_json::from_str(r#"{"snort": {"assumed_year": 2024}, "log": {"json": true}}"#).unwrap();
        assert_eq!(c.snort.assumed_year, 2024);
        assert_eq!(c.snort.drop_columns.len(), 8);
        assert_eq!(c.suricata.artifacts.model, PathBuf::from("suricata.onnx"));
        assert!(c.log.json);
        assert_eq!(c.log.level, "info");
    }

    #[test]
    fn absent_file_gives_defaults() {
        let c = AppConfig::load(Path::new("no-such-config.json")).unwrap();
        assert_eq!(c.snort.drop_columns.len(), 8);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"snort": {"drop_columns": ["timestamp","src_ip",]}}"#).unwrap();
        match AppConfig::load(&path) {
            Err(PipelineError::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_field_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"snort": {"assumed_year": "2025"}}"#).unwrap();
        assert!(matches!(AppConfig::load(&path), Err(PipelineError::Config { .. })));
    }
}
