//! Artifact registry: loads each variant's artifacts at most once and shares them read-only.

use super::{Artifacts, CategoryEncoder, ModelMeta, OnnxClassifier};
use crate::config::AppConfig;
use crate::error::Result;
use crate::sensor::SensorVariant;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait ArtifactLoader: Send + Sync {
    fn load(&self, variant: SensorVariant) -> Result<Artifacts>;
}

impl<F> ArtifactLoader for F
where
    F: Fn(SensorVariant) -> Result<Artifacts> + Send + Sync,
{
    fn load(&self, variant: SensorVariant) -> Result<Artifacts> {
        self(variant)
    }
}

/// Loads ONNX model, metadata and encoder from `artifacts_dir`.
pub struct FileArtifactLoader {
    config: AppConfig,
}

impl FileArtifactLoader {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl ArtifactLoader for FileArtifactLoader {
    fn load(&self, variant: SensorVariant) -> Result<Artifacts> {
        let files = match variant {
            SensorVariant::Snort => &self.config.snort.artifacts,
            SensorVariant::Suricata => &self.config.suricata.artifacts,
        };
        let meta = ModelMeta::load(&self.config.artifact_path(&files.model_meta))?;
        let classifier = OnnxClassifier::load(&self.config.artifact_path(&files.model), meta)?;
        let protocol_encoder = CategoryEncoder::load(&self.config.artifact_path(&files.protocol_encoder))?;
        Ok(Artifacts {
            classifier: Box::new(classifier),
            protocol_encoder,
        })
    }
}

pub struct ArtifactRegistry {
    loader: Box<dyn ArtifactLoader>,
    loaded: Mutex<HashMap<SensorVariant, Arc<Artifacts>>>,
}

impl ArtifactRegistry {
    pub fn new(loader: impl ArtifactLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self::new(FileArtifactLoader::new(config))
    }

    /// Artifacts for `variant`, loading them on first use. The lock is held while loading
    /// so concurrent callers never load the same variant twice. A failed load is not cached.
    pub fn get(&self, variant: SensorVariant) -> Result<Arc<Artifacts>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(a) = loaded.get(&variant) {
            return Ok(Arc::clone(a));
        }
        tracing::info!(sensor = %variant, "loading artifacts");
        let artifacts = Arc::new(self.loader.load(variant)?);
        loaded.insert(variant, Arc::clone(&artifacts));
        Ok(artifacts)
    }

    pub fn is_loaded(&self, variant: SensorVariant) -> bool {
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&variant)
    }
}
