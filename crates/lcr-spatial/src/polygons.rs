//! Envelope R-tree over land-cover polygons.

use geo::{BoundingRect, Coord, Intersects, Line, Point, Polygon};
use rstar::{AABB, RTree, RTreeObject};

use lcr_core::{FeatureId, LayerKind, LocalFrame, PolygonFeature};

use crate::{SpatialError, SpatialResult};

/// R-tree entry: a polygon's bounding box and its slot in `PolygonIndex::polygons`.
#[derive(Clone, Debug)]
struct PolygonEntry {
    envelope: AABB<[f64; 2]>,
    feature:  FeatureId,
}

impl RTreeObject for PolygonEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Read-only polygon index (holes respected).  `FeatureId(i)` is the i-th
/// polygon passed to [`build`](Self::build).
pub struct PolygonIndex {
    tree:     RTree<PolygonEntry>,
    polygons: Vec<Polygon<f64>>,
}

impl PolygonIndex {
    /// Index already-projected polygons.
    pub fn build(polygons: Vec<Polygon<f64>>) -> SpatialResult<Self> {
        let mut entries = Vec::with_capacity(polygons.len());
        for (i, polygon) in polygons.iter().enumerate() {
            let feature = FeatureId(i as u32);
            let finite = polygon
                .exterior()
                .coords()
                .chain(polygon.interiors().iter().flat_map(|r| r.coords()))
                .all(|c| c.x.is_finite() && c.y.is_finite());
            if !finite {
                return Err(SpatialError::NonFinite { layer: LayerKind::LandCover, feature });
            }
            let Some(rect) = polygon.bounding_rect() else {
                return Err(SpatialError::EmptyFeature { layer: LayerKind::LandCover, feature });
            };
            entries.push(PolygonEntry {
                envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
                feature,
            });
        }
        Ok(Self { tree: RTree::bulk_load(entries), polygons })
    }

    /// Project geographic land-cover features into `frame` and index them.
    pub fn from_features(features: &[PolygonFeature], frame: &LocalFrame) -> SpatialResult<Self> {
        Self::build(features.iter().map(|f| frame.project_polygon(&f.geometry)).collect())
    }

    pub fn empty() -> Self {
        Self { tree: RTree::new(), polygons: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn polygon(&self, id: FeatureId) -> Option<&Polygon<f64>> {
        self.polygons.get(id.index())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Features whose bounding box intersects `min`–`max` (no exact test).
    pub fn candidates_in_envelope(&self, min: [f64; 2], max: [f64; 2]) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self
            .tree
            .locate_in_envelope_intersecting(&AABB::from_corners(min, max))
            .map(|e| e.feature)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All features containing `point` (boundary inclusive).  Sorted.
    pub fn containing(&self, point: Coord<f64>) -> Vec<FeatureId> {
        let p = [point.x, point.y];
        let mut ids: Vec<FeatureId> = self
            .tree
            .locate_in_envelope_intersecting(&AABB::from_point(p))
            .filter(|e| self.polygons[e.feature.index()].intersects(&Point::from(point)))
            .map(|e| e.feature)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Lowest-id feature containing `point`, if any.
    pub fn first_containing(&self, point: Coord<f64>) -> Option<FeatureId> {
        self.containing(point).into_iter().next()
    }

    /// `true` if `line` touches any indexed polygon.
    pub fn intersects_line(&self, line: Line<f64>) -> bool {
        let min = [line.start.x.min(line.end.x), line.start.y.min(line.end.y)];
        let max = [line.start.x.max(line.end.x), line.start.y.max(line.end.y)];
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_corners(min, max))
            .any(|e| self.polygons[e.feature.index()].intersects(&line))
    }
}
