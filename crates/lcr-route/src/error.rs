//! Public error type of the routing pipeline.
//!
//! Every lower-level error is folded into one of the kinds below so callers
//! can tell a bad AOI from a disconnected one from a cancelled request.

use thiserror::Error;

use lcr_core::{Cancelled, CoreError, Endpoint, EndpointFault};
use lcr_solver::SolverError;
use lcr_spatial::SpatialError;
use lcr_surface::SurfaceError;

/// Errors returned by route generation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    /// Malformed or degenerate AOI or layer geometry.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The AOI covers no grid cell centre.
    #[error("area of interest contains no traversable cells")]
    EmptyAoi,

    #[error("invalid {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: Endpoint, reason: EndpointFault },

    /// Origin and destination are separated by barriers.
    #[error("no path connects origin and destination; consider relaxing barrier weights")]
    NoPath,

    /// Internal invariant violated while post-processing a route.
    #[error("route post-processing failed: {0}")]
    PostProcess(String),

    #[error("route generation cancelled")]
    Cancelled,

    /// Rejected configuration or weight values.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RouteError {
    /// Cancellation is a terminal outcome, not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RouteError::Cancelled)
    }
}

pub type RouteResult<T> = Result<T, RouteError>;

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<Cancelled> for RouteError {
    fn from(_: Cancelled) -> Self {
        RouteError::Cancelled
    }
}

impl From<CoreError> for RouteError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Geometry(msg) => RouteError::Geometry(msg),
            other => RouteError::Config(other.to_string()),
        }
    }
}

impl From<SpatialError> for RouteError {
    fn from(e: SpatialError) -> Self {
        RouteError::Geometry(e.to_string())
    }
}

impl From<SurfaceError> for RouteError {
    fn from(e: SurfaceError) -> Self {
        match e {
            SurfaceError::Core(e)                => e.into(),
            SurfaceError::Spatial(e)             => e.into(),
            SurfaceError::EmptyAoi               => RouteError::EmptyAoi,
            SurfaceError::Cancelled(_)           => RouteError::Cancelled,
            e @ SurfaceError::GridTooLarge { .. } => RouteError::Config(e.to_string()),
            e @ SurfaceError::ThreadPool(_)      => RouteError::Config(e.to_string()),
            e @ SurfaceError::ShapeMismatch { .. } => RouteError::PostProcess(e.to_string()),
        }
    }
}

impl From<SolverError> for RouteError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidEndpoint { endpoint, fault, .. } => {
                RouteError::InvalidEndpoint { endpoint, reason: fault }
            }
            SolverError::NoPath { .. } => RouteError::NoPath,
            SolverError::Cancelled(_)  => RouteError::Cancelled,
        }
    }
}
