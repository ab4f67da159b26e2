//! IDS technique predictor: labels Snort / Suricata log exports with attack techniques.
//!
//! Modular structure:
//! - [`ingest`]: CSV reading, timestamp parsing, port coercion, global time sort
//! - [`sensor`]: Per-sensor rules behind one strategy interface
//! - [`features`]: Per-source-IP derived features, protocol encoding, feature matrix
//! - [`model`]: Classifier and encoder artifacts, loaded once per sensor
//! - [`pipeline`]: One upload-and-predict pass
//! - [`report`]: Labeled CSV and per-technique summary
//! - [`logging`]: Structured logging

pub mod config;
pub mod error;
pub mod frame;
pub mod sensor;
pub mod ingest;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod logging;

pub use config::AppConfig;
pub use error::{PipelineError, Result};
pub use frame::{Column, Frame};
pub use sensor::{SensorStrategy, SensorVariant};
pub use features::{FeatureMatrix, Nullable};
pub use model::{ArtifactRegistry, Artifacts, CategoryEncoder, Classifier, OnnxClassifier};
pub use pipeline::{Pipeline, Prediction, PREDICTED_COLUMN};
pub use report::LabelSummary;
pub use logging::StructuredLogger;
