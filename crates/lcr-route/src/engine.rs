//! The route-generation pipeline.

use std::time::Instant;

use geo::Polygon;
use tracing::{debug, info};

use lcr_core::{
    AreaOfInterest, CancelToken, CellId, Endpoint, EndpointFault, GeoPoint, LayerSet, RouteConfig,
    WeightProfile, WeightTable,
};
use lcr_solver::{PathSolver, solver_for};
use lcr_spatial::LayerIndexes;
use lcr_surface::{CostGrid, CostSurfaceBuilder};

use crate::{
    AnalyticsReport, CandidateRoute, ElevationSampler, NoopObserver, PostProcessor, RouteError,
    RouteObserver, RouteResult, SearchStats,
};

/// Inputs of one route generation.  Everything is borrowed; nothing is
/// mutated.
#[derive(Clone, Copy, Debug)]
pub struct RouteRequest<'a> {
    pub aoi:         &'a AreaOfInterest,
    pub layers:      &'a LayerSet,
    pub weights:     &'a [WeightProfile],
    pub origin:      GeoPoint,
    pub destination: GeoPoint,
}

impl<'a> RouteRequest<'a> {
    pub fn new(
        aoi:         &'a AreaOfInterest,
        layers:      &'a LayerSet,
        weights:     &'a [WeightProfile],
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> Self {
        Self { aoi, layers, weights, origin, destination }
    }
}

/// Runs the full pipeline with a configurable [`PathSolver`].
///
/// # Example
///
/// ```rust,ignore
/// let engine = RouteEngine::new(AStarSolver, RouteConfig::default());
/// let route = engine.generate(
///     &RouteRequest::new(&aoi, &layers, &weights, origin, destination),
///     &no_elevation,
///     &CancelToken::new(),
/// )?;
/// println!("{:.0} m, cost {:.1}", route.length_m, route.total_cost);
/// ```
pub struct RouteEngine<S: PathSolver> {
    solver: S,
    config: RouteConfig,
}

impl RouteEngine<Box<dyn PathSolver>> {
    /// Engine using the solver named by `config.search`.
    pub fn from_config(config: RouteConfig) -> Self {
        Self { solver: solver_for(config.search), config }
    }
}

impl<S: PathSolver> RouteEngine<S> {
    pub fn new(solver: S, config: RouteConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn generate(
        &self,
        request: &RouteRequest<'_>,
        sampler: &dyn ElevationSampler,
        cancel:  &CancelToken,
    ) -> RouteResult<CandidateRoute> {
        self.generate_observed(request, sampler, cancel, &mut NoopObserver)
    }

    /// [`generate`](Self::generate) with stage callbacks.
    pub fn generate_observed(
        &self,
        request:  &RouteRequest<'_>,
        sampler:  &dyn ElevationSampler,
        cancel:   &CancelToken,
        observer: &mut dyn RouteObserver,
    ) -> RouteResult<CandidateRoute> {
        let started = Instant::now();
        let config = &self.config;
        config.validate()?;
        let table = WeightTable::new(request.weights, config.land_cover_polarity)?;

        check_point(request.aoi, Endpoint::Origin, request.origin)?;
        check_point(request.aoi, Endpoint::Destination, request.destination)?;
        cancel.check()?;

        info!(
            origin = %request.origin,
            destination = %request.destination,
            resolution_m = config.resolution_m,
            "generating route"
        );

        // ── Cost surface ──────────────────────────────────────────────────
        let frame = request.aoi.frame();
        let indexes = LayerIndexes::build(request.layers, &frame)?;
        let grid = CostSurfaceBuilder::new(request.aoi, request.layers, &table, config).build(&indexes, cancel)?;
        observer.on_grid_built(&grid);
        debug!(
            rows = grid.geometry.rows,
            cols = grid.geometry.cols,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cost surface built"
        );

        // ── Search ────────────────────────────────────────────────────────
        let from = locate(&grid, Endpoint::Origin, request.origin)?;
        let to = locate(&grid, Endpoint::Destination, request.destination)?;
        let path = self.solver.solve(&grid, from, to, cancel)?;
        observer.on_path_found(&grid, &path);
        cancel.check()?;

        // ── Post-processing and analytics ─────────────────────────────────
        let metrics = PostProcessor::new(&grid, &indexes, request.layers, config).process(
            &path,
            request.origin,
            request.destination,
            sampler,
        )?;
        let analytics = AnalyticsReport::aggregate(&metrics, path.total_cost, path.length_in_cells(&grid), config);

        let stats = SearchStats {
            grid_rows:      grid.geometry.rows,
            grid_cols:      grid.geometry.cols,
            cells_in_aoi:   grid.in_aoi_count(),
            cells_passable: grid.passable_count(),
            expanded:       path.expanded,
            path_cells:     path.cells.len(),
            raw_vertices:   metrics.raw_vertices,
            simplified:     metrics.simplified,
        };
        let route = CandidateRoute {
            vertices:   metrics.vertices,
            length_m:   metrics.length_m,
            total_cost: path.total_cost,
            cells:      path.cells,
            crossings:  metrics.crossings,
            analytics,
            stats,
        };

        info!(
            length_m = route.length_m,
            total_cost = route.total_cost,
            vertices = route.vertices.len(),
            expanded = stats.expanded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "route generated"
        );
        observer.on_route_ready(&route);
        Ok(route)
    }
}

/// Validate the AOI polygon and run one generation with the solver chosen
/// by `config.search`.
#[allow(clippy::too_many_arguments)]
pub fn generate_route(
    aoi:         &Polygon<f64>,
    layers:      &LayerSet,
    weights:     &[WeightProfile],
    origin:      GeoPoint,
    destination: GeoPoint,
    config:      &RouteConfig,
    sampler:     &dyn ElevationSampler,
    cancel:      &CancelToken,
) -> RouteResult<CandidateRoute> {
    let aoi = AreaOfInterest::new(aoi.clone())?;
    let request = RouteRequest::new(&aoi, layers, weights, origin, destination);
    RouteEngine::from_config(config.clone()).generate(&request, sampler, cancel)
}

fn check_point(aoi: &AreaOfInterest, endpoint: Endpoint, p: GeoPoint) -> RouteResult<()> {
    let reason = if !p.is_valid() {
        EndpointFault::InvalidCoordinate
    } else if !aoi.contains(p) {
        EndpointFault::OutsideAoi
    } else {
        return Ok(());
    };
    Err(RouteError::InvalidEndpoint { endpoint, reason })
}

fn locate(grid: &CostGrid, endpoint: Endpoint, p: GeoPoint) -> RouteResult<CellId> {
    grid.locate(grid.frame.project(p))
        .ok_or(RouteError::InvalidEndpoint { endpoint, reason: EndpointFault::OffGrid })
}
