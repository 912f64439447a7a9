//! Route post-processing: raw cell path → simplified polyline + metrics.
//!
//! # Steps
//!
//! 1. Build the raw polyline: exact origin, every cell centre, exact
//!    destination (planar metres).
//! 2. Simplify with [`simplify`](crate::simplify::simplify), tolerance
//!    `simplify_tolerance × resolution_m`.  A self-intersecting result falls
//!    back to the raw polyline.
//! 3. Validate: every segment must lie inside the AOI outline and enter no
//!    impassable cell, and the polyline may not cross itself.  A failure here
//!    becomes [`RouteError::PostProcess`].
//! 4. Measure great-circle length, sample every `sample_interval_m` for land
//!    cover and elevation, and intersect every segment with the line layers.

use std::collections::BTreeMap;

use geo::{Coord, Distance, Haversine, Line, Point};
use rustc_hash::FxHashSet;
use tracing::{debug, error, warn};

use lcr_core::{FeatureId, GeoPoint, LayerKind, LayerSet, RouteConfig};
use lcr_solver::CellPath;
use lcr_spatial::LayerIndexes;
use lcr_surface::CostGrid;

use crate::simplify::{segment_clear, self_intersects, simplify};
use crate::{ElevationSampler, LandCoverShare, ProfilePoint, RouteError, RouteResult};

/// Land-cover label for samples outside every land-cover polygon.
pub const UNCLASSIFIED: &str = "Unclassified";

/// One place where the route crosses a transmission line or railroad.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteCrossing {
    pub layer:       LayerKind,
    pub feature:     FeatureId,
    pub subcategory: String,
    pub location:    GeoPoint,
}

/// Everything the post-processor measures on one route.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteMetrics {
    /// Final polyline; first and last vertices are the exact endpoints.
    pub vertices:      Vec<GeoPoint>,
    pub length_m:      f64,
    /// `(distance along route, elevation)` at every sample with data.
    pub profile:       Vec<ProfilePoint>,
    /// Length-weighted land-cover shares, sorted by subcategory.
    pub land_cover:    Vec<LandCoverShare>,
    /// Crossings in route order, one per feature per intersection point.
    pub crossings:     Vec<RouteCrossing>,
    pub raw_vertices:  usize,
    /// `false` if simplification was abandoned for the raw polyline.
    pub simplified:    bool,
}

/// Turns a solved [`CellPath`] into a [`RouteMetrics`].
pub struct PostProcessor<'a> {
    grid:    &'a CostGrid,
    indexes: &'a LayerIndexes,
    layers:  &'a LayerSet,
    config:  &'a RouteConfig,
}

impl<'a> PostProcessor<'a> {
    pub fn new(
        grid:    &'a CostGrid,
        indexes: &'a LayerIndexes,
        layers:  &'a LayerSet,
        config:  &'a RouteConfig,
    ) -> Self {
        Self { grid, indexes, layers, config }
    }

    pub fn process(
        &self,
        path:        &CellPath,
        origin:      GeoPoint,
        destination: GeoPoint,
        sampler:     &dyn ElevationSampler,
    ) -> RouteResult<RouteMetrics> {
        let (planar, raw_vertices, simplified) = self.polyline(path, origin, destination)?;
        let frame = self.grid.frame;

        let mut vertices: Vec<GeoPoint> = planar.iter().map(|&c| frame.unproject(c)).collect();
        // Keep the caller's coordinates bit-for-bit.
        if let Some(first) = vertices.first_mut() {
            *first = origin;
        }
        if let Some(last) = vertices.last_mut() {
            *last = destination;
        }
        // Coincident endpoints still give a two-vertex polyline.
        if vertices.len() == 1 {
            vertices.push(destination);
        }

        let length_m = vertices
            .windows(2)
            .map(|w| Haversine.distance(Point::from(Coord::from(w[0])), Point::from(Coord::from(w[1]))))
            .sum();

        let samples = sample_along(&planar, self.config.sample_interval_m);
        let profile = samples
            .iter()
            .filter_map(|&(distance_m, p)| {
                let elevation_m = sampler.sample(frame.unproject(p));
                elevation_m.is_finite().then_some(ProfilePoint { distance_m, elevation_m })
            })
            .collect();

        Ok(RouteMetrics {
            vertices,
            length_m,
            profile,
            land_cover: self.land_cover(&samples),
            crossings: self.crossings(&planar),
            raw_vertices,
            simplified,
        })
    }

    /// Simplified, validated planar polyline.  Also returns the raw vertex
    /// count and whether simplification was kept.
    pub fn polyline(
        &self,
        path:        &CellPath,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> RouteResult<(Vec<Coord<f64>>, usize, bool)> {
        let frame = self.grid.frame;
        let mut raw = Vec::with_capacity(path.cells.len() + 2);
        raw.push(frame.project(origin));
        // Both endpoints share one cell when the path is trivial.
        if !path.is_trivial() {
            raw.extend(path.cells.iter().map(|&c| self.grid.geometry.cell_center(c)));
        }
        raw.push(frame.project(destination));
        raw.dedup();
        let raw_vertices = raw.len();

        let tolerance = self.config.simplify_tolerance_m();
        let candidate = simplify(self.grid, &raw, tolerance);
        let (points, simplified) = if self_intersects(&candidate) {
            warn!(vertices = candidate.len(), "simplified route self-intersects; keeping raw path");
            (raw, false)
        } else {
            (candidate, true)
        };

        if let Some(i) = points.windows(2).position(|w| !segment_clear(self.grid, w[0], w[1])) {
            error!(
                segment = i,
                vertices = points.len(),
                "route segment leaves the area of interest or enters an impassable cell"
            );
            return Err(RouteError::PostProcess(format!(
                "route segment {i} leaves the area of interest or crosses a blocked cell"
            )));
        }
        if self_intersects(&points) {
            error!(vertices = points.len(), "route polyline self-intersects");
            return Err(RouteError::PostProcess("route polyline self-intersects".to_owned()));
        }

        debug!(raw = raw_vertices, kept = points.len(), simplified, "route simplified");
        Ok((points, raw_vertices, simplified))
    }

    /// Length-weighted land-cover shares of the sampled route.
    fn land_cover(&self, samples: &[(f64, Coord<f64>)]) -> Vec<LandCoverShare> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for (i, &(_, p)) in samples.iter().enumerate() {
            let subcategory = self
                .indexes
                .land_cover
                .first_containing(p)
                .and_then(|id| self.layers.subcategory(LayerKind::LandCover, id))
                .unwrap_or(UNCLASSIFIED);
            *totals.entry(subcategory).or_insert(0.0) += sample_weight(samples, i);
        }

        let sum: f64 = totals.values().sum();
        totals
            .into_iter()
            .map(|(subcategory, w)| LandCoverShare {
                subcategory: subcategory.to_owned(),
                percent:     if sum > 0.0 { w / sum * 100.0 } else { 0.0 },
            })
            .collect()
    }

    /// Intersections of every route segment with the line layers.
    pub(crate) fn crossings(&self, planar: &[Coord<f64>]) -> Vec<RouteCrossing> {
        let frame = self.grid.frame;
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for w in planar.windows(2) {
            let segment = Line::new(w[0], w[1]);
            for kind in [LayerKind::TransmissionLine, LayerKind::Railroad] {
                let Some(index) = self.indexes.lines(kind) else { continue };
                for crossing in index.crossings(segment) {
                    let key = (kind, crossing.feature, quantise(crossing.point.x), quantise(crossing.point.y));
                    if !seen.insert(key) {
                        continue;
                    }
                    out.push(RouteCrossing {
                        layer:       kind,
                        feature:     crossing.feature,
                        subcategory: self.layers.subcategory(kind, crossing.feature).unwrap_or_default().to_owned(),
                        location:    frame.unproject(crossing.point),
                    });
                }
            }
        }
        out
    }
}

/// Round to the micrometre so a crossing on a shared vertex is seen once.
#[inline]
fn quantise(v: f64) -> i64 {
    (v * 1e6).round() as i64
}

/// Points every `interval_m` along the polyline, plus its final point, with
/// their distance from the start.
pub(crate) fn sample_along(points: &[Coord<f64>], interval_m: f64) -> Vec<(f64, Coord<f64>)> {
    let Some(&first) = points.first() else { return Vec::new() };
    let mut out = vec![(0.0, first)];

    let mut walked = 0.0;
    let mut next = interval_m;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = (b.x - a.x).hypot(b.y - a.y);
        while next < walked + len {
            let t = (next - walked) / len;
            out.push((next, Coord { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) }));
            next += interval_m;
        }
        walked += len;
    }

    if walked > 0.0 {
        if let Some(&last) = points.last() {
            out.push((walked, last));
        }
    }
    out
}

/// Trapezoid weight of sample `i`: half the distance to each neighbour.
fn sample_weight(samples: &[(f64, Coord<f64>)], i: usize) -> f64 {
    if samples.len() == 1 {
        return 1.0;
    }
    let here = samples[i].0;
    let before = if i > 0 { here - samples[i - 1].0 } else { 0.0 };
    let after = samples.get(i + 1).map_or(0.0, |s| s.0 - here);
    (before + after) * 0.5
}
