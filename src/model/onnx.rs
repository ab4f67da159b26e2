//! ONNX Runtime classifier. Input: [rows, n_features] f32, output: one label per row.
//! String label tensors are used as-is; int64 class indices are mapped to technique
//! labels through the model metadata.

use super::{Classifier, ModelMeta};
use crate::error::{PipelineError, Result};
use crate::features::FeatureMatrix;
use ndarray::Array2;
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    meta: ModelMeta,
}

fn model_err(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Model(e.to_string())
}

/// Label output as extracted from the session.
#[derive(Debug)]
enum LabelTensor {
    Names(Vec<String>),
    Indices(Vec<i64>),
}

impl LabelTensor {
    fn into_labels(self, meta: &ModelMeta) -> Vec<String> {
        match self {
            LabelTensor::Names(names) => names,
            LabelTensor::Indices(indices) => indices.into_iter().map(|i| meta.label_for(i)).collect(),
        }
    }
}

impl OnnxClassifier {
    /// Load model from path. A missing or invalid model is an artifact error.
    pub fn load(path: &Path, meta: ModelMeta) -> Result<Self> {
        let artifact_err = |reason: String| PipelineError::Artifact {
            path: path.to_path_buf(),
            reason,
        };
        if !path.exists() {
            return Err(artifact_err("model file not found".to_string()));
        }

        let session = Session::builder()
            .and_then(|mut b| b.commit_from_file(path))
            .map_err(|e| artifact_err(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());
        // skl2onnx classifiers emit the label first, probabilities second
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| artifact_err("model declares no outputs".to_string()))?;

        tracing::info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            labels = meta.labels.len(),
            "ONNX classifier loaded"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            meta,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>> {
        let arr = Array2::from_shape_vec((features.rows(), features.width()), features.values().to_vec())
            .map_err(model_err)?;
        let input = Tensor::from_array(arr).map_err(model_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PipelineError::Model("session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(model_err)?;
        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| PipelineError::Model(format!("missing output {:?}", self.output_name)))?;
        let labels = match output.dtype().tensor_type() {
            Some(TensorElementType::String) => {
                let (_, names) = output.try_extract_strings().map_err(model_err)?;
                LabelTensor::Names(names)
            }
            Some(TensorElementType::Int64) => {
                let (_, indices) = output.try_extract_tensor::<i64>().map_err(model_err)?;
                LabelTensor::Indices(indices.to_vec())
            }
            other => {
                return Err(PipelineError::Model(format!(
                    "output {:?} has unsupported label type {:?}",
                    self.output_name, other
                )))
            }
        };

        Ok(labels.into_labels(&self.meta))
    }

    fn expected_columns(&self) -> Option<&[String]> {
        self.meta.feature_columns.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(labels: &[&str]) -> ModelMeta {
        ModelMeta {
            feature_columns: None,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn string_labels_pass_through() {
        let out = LabelTensor::Names(vec!["T1046".into(), "T1110".into()]).into_labels(&meta(&["ignored"]));
        assert_eq!(out, vec!["T1046", "T1110"]);
    }

    #[test]
    fn index_labels_map_through_metadata() {
        let out = LabelTensor::Indices(vec![1, 0, 1]).into_labels(&meta(&["T1046", "T1110"]));
        assert_eq!(out, vec!["T1110", "T1046", "T1110"]);
    }

    #[test]
    fn missing_model_is_artifact_error() {
        let err = OnnxClassifier::load(Path::new("no-such-model.onnx"), ModelMeta::default());
        assert!(matches!(err, Err(PipelineError::Artifact { .. })));
    }
}
