//! Cost-surface error type.

use lcr_core::{Cancelled, CoreError};
use lcr_spatial::SpatialError;
use thiserror::Error;

/// Errors produced while building a [`CostGrid`](crate::CostGrid).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("layer geometry: {0}")]
    Spatial(#[from] SpatialError),

    #[error("no grid cell centre lies inside the AOI")]
    EmptyAoi,

    #[error("grid of {rows} × {cols} cells exceeds the limit of {max} cells")]
    GridTooLarge { rows: u64, cols: u64, max: usize },

    #[error("grid length {got} does not match {rows} × {cols}")]
    ShapeMismatch { rows: u32, cols: u32, got: usize },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
