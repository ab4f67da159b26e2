//! Trained artifacts: the technique classifier and the protocol encoder, loaded per sensor.

mod encoder;
mod onnx;
mod registry;

pub use encoder::CategoryEncoder;
pub use onnx::OnnxClassifier;
pub use registry::{ArtifactLoader, ArtifactRegistry, FileArtifactLoader};

use crate::error::{PipelineError, Result};
use crate::features::FeatureMatrix;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Predicts one technique label per feature matrix row.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>>;

    /// Column names (and order) the model was trained on, when known.
    fn expected_columns(&self) -> Option<&[String]> {
        None
    }
}

/// Sidecar metadata exported next to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMeta {
    pub feature_columns: Option<Vec<String>>,
    /// Technique label per class index
    pub labels: Vec<String>,
}

impl ModelMeta {
    /// Read metadata if the file exists; a missing file means no column contract and raw indices.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "model metadata not found; column contract unchecked");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|e| PipelineError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&data).map_err(|e| PipelineError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn label_for(&self, index: i64) -> String {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.labels.get(i))
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }
}

/// Read-only artifacts of one sensor variant.
pub struct Artifacts {
    pub classifier: Box<dyn Classifier>,
    pub protocol_encoder: CategoryEncoder,
}

/// Reject a matrix whose shape or columns differ from what the classifier expects.
pub fn check_contract(classifier: &dyn Classifier, features: &FeatureMatrix) -> Result<()> {
    let Some(expected) = classifier.expected_columns() else {
        return Ok(());
    };
    if expected.len() != features.width() {
        return Err(PipelineError::ShapeMismatch {
            expected: expected.len(),
            got: features.width(),
        });
    }
    if expected != features.columns() {
        return Err(PipelineError::ColumnMismatch {
            expected: expected.to_vec(),
            got: features.columns().to_vec(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_indices_and_fall_back_to_numbers() {
        let meta = ModelMeta {
            feature_columns: None,
            labels: vec!["T1046".into(), "T1110".into()],
        };
        assert_eq!(meta.label_for(1), "T1110");
        assert_eq!(meta.label_for(7), "7");
        assert_eq!(meta.label_for(-1), "-1");
    }

    #[test]
    fn missing_meta_file_is_default() {
        let meta = ModelMeta::load(Path::new("nonexistent.meta.json")).unwrap();
        assert_eq!(meta, ModelMeta::default());
    }
}
