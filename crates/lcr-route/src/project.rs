//! Per-project routing state.
//!
//! A project owns exactly one AOI, its clipped layers and weights, at most
//! one origin and one destination, and the last generated route.  Any edit
//! to the inputs discards the route; regeneration replaces it wholesale.

use lcr_core::{AreaOfInterest, CancelToken, Endpoint, EndpointFault, LayerSet, RoutePoint, WeightProfile};
use lcr_solver::PathSolver;

use crate::{
    CandidateRoute, ElevationSampler, NoopObserver, RouteEngine, RouteError, RouteObserver, RouteRequest,
    RouteResult,
};

#[derive(Clone, Debug)]
pub struct Project {
    aoi:         AreaOfInterest,
    layers:      LayerSet,
    weights:     Vec<WeightProfile>,
    origin:      Option<RoutePoint>,
    destination: Option<RoutePoint>,
    route:       Option<CandidateRoute>,
}

impl Project {
    /// New project with the default weight table and no points.
    pub fn new(aoi: AreaOfInterest, layers: LayerSet) -> Self {
        Self {
            aoi,
            layers,
            weights:     WeightProfile::default_table(),
            origin:      None,
            destination: None,
            route:       None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn aoi(&self) -> &AreaOfInterest {
        &self.aoi
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn weights(&self) -> &[WeightProfile] {
        &self.weights
    }

    pub fn point(&self, kind: Endpoint) -> Option<RoutePoint> {
        match kind {
            Endpoint::Origin      => self.origin,
            Endpoint::Destination => self.destination,
        }
    }

    pub fn route(&self) -> Option<&CandidateRoute> {
        self.route.as_ref()
    }

    // ── Edits (each invalidates the route) ───────────────────────────────

    pub fn set_aoi(&mut self, aoi: AreaOfInterest) {
        self.aoi = aoi;
        self.route = None;
    }

    pub fn set_layers(&mut self, layers: LayerSet) {
        self.layers = layers;
        self.route = None;
    }

    pub fn set_weights(&mut self, weights: Vec<WeightProfile>) {
        self.weights = weights;
        self.route = None;
    }

    /// Place a point, replacing any previous point of the same kind.
    pub fn set_point(&mut self, point: RoutePoint) {
        match point.kind {
            Endpoint::Origin      => self.origin = Some(point),
            Endpoint::Destination => self.destination = Some(point),
        }
        self.route = None;
    }

    pub fn clear_point(&mut self, kind: Endpoint) {
        match kind {
            Endpoint::Origin      => self.origin = None,
            Endpoint::Destination => self.destination = None,
        }
        self.route = None;
    }

    // ── Generation ────────────────────────────────────────────────────────

    /// Generate a route between the current points.  On any failure the
    /// project is left without a route.
    pub fn generate<S: PathSolver>(
        &mut self,
        engine:  &RouteEngine<S>,
        sampler: &dyn ElevationSampler,
        cancel:  &CancelToken,
    ) -> RouteResult<&CandidateRoute> {
        self.generate_observed(engine, sampler, cancel, &mut NoopObserver)
    }

    /// [`generate`](Self::generate) with stage callbacks.
    pub fn generate_observed<S: PathSolver>(
        &mut self,
        engine:   &RouteEngine<S>,
        sampler:  &dyn ElevationSampler,
        cancel:   &CancelToken,
        observer: &mut dyn RouteObserver,
    ) -> RouteResult<&CandidateRoute> {
        self.route = None;
        let origin = self.require(Endpoint::Origin)?;
        let destination = self.require(Endpoint::Destination)?;

        let request = RouteRequest::new(&self.aoi, &self.layers, &self.weights, origin.location, destination.location);
        let route = engine.generate_observed(&request, sampler, cancel, observer)?;
        Ok(self.route.insert(route))
    }

    fn require(&self, kind: Endpoint) -> RouteResult<RoutePoint> {
        self.point(kind)
            .ok_or(RouteError::InvalidEndpoint { endpoint: kind, reason: EndpointFault::Missing })
    }
}
