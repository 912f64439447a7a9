//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::LayerKind;

/// Errors raised while validating inputs in `lcr-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid weight for {layer}/{subcategory}: {reason}")]
    Weight {
        layer:       LayerKind,
        subcategory: String,
        reason:      String,
    },
}

/// Shorthand result type for `lcr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
