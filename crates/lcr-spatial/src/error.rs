//! Spatial-subsystem error type.

use thiserror::Error;

use lcr_core::{FeatureId, LayerKind};

/// Errors produced by `lcr-spatial`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("{layer} {feature} has a non-finite coordinate")]
    NonFinite { layer: LayerKind, feature: FeatureId },

    #[error("{layer} {feature} has no segments")]
    EmptyFeature { layer: LayerKind, feature: FeatureId },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
