//! Pre-fitted categorical encoder: sorted class list, value → index.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Classes are sorted and deduplicated, so the index of a class is stable
    /// regardless of the order it was stored in.
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Load `{"classes": [...]}` from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact_err = |reason: String| PipelineError::Artifact {
            path: path.to_path_buf(),
            reason,
        };
        let data = std::fs::read_to_string(path).map_err(|e| artifact_err(e.to_string()))?;
        let stored: CategoryEncoder =
            serde_json::from_str(&data).map_err(|e| artifact_err(e.to_string()))?;
        if stored.classes.is_empty() {
            return Err(artifact_err("encoder has no classes".to_string()));
        }
        Ok(Self::new(stored.classes))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode every value or fail naming all unseen ones.
    pub fn transform(&self, column: &str, values: &[String]) -> Result<Vec<i64>> {
        let mut unseen = BTreeSet::new();
        let codes: Vec<i64> = values
            .iter()
            .map(|v| match self.classes.binary_search(v) {
                Ok(i) => i as i64,
                Err(_) => {
                    unseen.insert(v.clone());
                    -1
                }
            })
            .collect();
        if !unseen.is_empty() {
            return Err(PipelineError::UnseenCategory {
                column: column.to_string(),
                values: unseen.into_iter().collect(),
            });
        }
        Ok(codes)
    }
}
