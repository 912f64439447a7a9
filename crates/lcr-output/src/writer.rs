//! The `RouteWriter` trait implemented by all export backends.

use lcr_route::CandidateRoute;

use crate::OutputResult;

/// Trait implemented by the CSV and GeoJSON writers.
pub trait RouteWriter {
    /// Append one route.  Routes are numbered in call order from 0.
    fn write_route(&mut self, route: &CandidateRoute) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}
