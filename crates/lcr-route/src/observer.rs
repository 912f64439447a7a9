//! Stage callbacks for inspecting a route generation as it runs.

use lcr_solver::CellPath;
use lcr_surface::CostGrid;

use crate::CandidateRoute;

/// Callbacks invoked by [`RouteEngine::generate_observed`][crate::RouteEngine::generate_observed]
/// after each pipeline stage.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: keep the cost surface for a heat-map
///
/// ```rust,ignore
/// struct KeepGrid(Option<CostGrid>);
///
/// impl RouteObserver for KeepGrid {
///     fn on_grid_built(&mut self, grid: &CostGrid) {
///         self.0 = Some(grid.clone());
///     }
/// }
/// ```
pub trait RouteObserver {
    /// Called once the cost surface is complete.
    fn on_grid_built(&mut self, _grid: &CostGrid) {}

    /// Called with the raw cell path before simplification.
    fn on_path_found(&mut self, _grid: &CostGrid, _path: &CellPath) {}

    /// Called with the finished route.
    fn on_route_ready(&mut self, _route: &CandidateRoute) {}
}

/// A [`RouteObserver`] that does nothing.
pub struct NoopObserver;

impl RouteObserver for NoopObserver {}
