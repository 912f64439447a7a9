//! Path-search error type.

use thiserror::Error;

use lcr_core::{Cancelled, CellId, Endpoint, EndpointFault};

/// Errors produced by `lcr-solver`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("{endpoint} {cell}: {fault}")]
    InvalidEndpoint { endpoint: Endpoint, cell: CellId, fault: EndpointFault },

    #[error("no passable path from {from} to {to}")]
    NoPath { from: CellId, to: CellId },

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

pub type SolverResult<T> = Result<T, SolverError>;
