//! The computed route handed to presentation and export.

use lcr_core::{CellId, GeoPoint};

use crate::{AnalyticsReport, RouteCrossing};

/// Grid and search figures for one generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchStats {
    pub grid_rows:      u32,
    pub grid_cols:      u32,
    pub cells_in_aoi:   usize,
    pub cells_passable: usize,
    pub expanded:       usize,
    pub path_cells:     usize,
    pub raw_vertices:   usize,
    /// `false` if the raw polyline was kept.
    pub simplified:     bool,
}

/// A generated route.  Replaced wholesale on regeneration.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRoute {
    /// Polyline from origin to destination; never self-intersects.
    pub vertices:   Vec<GeoPoint>,
    pub length_m:   f64,
    pub total_cost: f64,
    /// Cells traversed by the solver, origin first.
    pub cells:      Vec<CellId>,
    pub crossings:  Vec<RouteCrossing>,
    pub analytics:  AnalyticsReport,
    pub stats:      SearchStats,
}

impl CandidateRoute {
    pub fn origin(&self) -> Option<GeoPoint> {
        self.vertices.first().copied()
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.vertices.last().copied()
    }
}
