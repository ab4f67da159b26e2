//! Feature derivation: per-source-IP signals, protocol encoding and the classifier's matrix.

mod nullable;
mod derive;
mod encode;
mod matrix;

pub use nullable::Nullable;
pub use derive::{
    derive_features, DerivedFeatures, DERIVED_COLUMNS, DIFF_SRC_PORT, PKT_RATE_1S, SAME_DST_PORT,
    TIME_DIFF,
};
pub use encode::{encode_protocol, PROTOCOL};
pub use matrix::FeatureMatrix;
