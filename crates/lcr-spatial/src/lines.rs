//! Segment R-tree over transmission-line and railroad layers.
//!
//! Every feature is exploded into its straight segments (multi-part lines
//! included); each segment is one R-tree entry tagged with its
//! [`FeatureId`].  Feature-level answers are assembled from segment hits and
//! returned sorted by `FeatureId` so callers iterate deterministically.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Line, MultiLineString};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use lcr_core::{FeatureId, LayerKind, LineFeature, LocalFrame};

use crate::segment;
use crate::{SpatialError, SpatialResult};

// ── R-tree segment entry ──────────────────────────────────────────────────────

/// One straight piece of a line feature, in planar metres.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentEntry {
    pub start:   [f64; 2],
    pub end:     [f64; 2],
    pub feature: FeatureId,
}

impl SegmentEntry {
    pub fn line(&self) -> Line<f64> {
        Line::new(
            Coord { x: self.start[0], y: self.start[1] },
            Coord { x: self.end[0], y: self.end[1] },
        )
    }
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.start, self.end)
    }
}

impl PointDistance for SegmentEntry {
    /// Squared planar distance from the point to the closest point of the
    /// segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        segment::distance_2(*point, self.start, self.end)
    }
}

/// A point where a query segment meets an indexed feature.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Crossing {
    pub feature: FeatureId,
    pub point:   Coord<f64>,
}

// ── LineIndex ─────────────────────────────────────────────────────────────────

/// Read-only segment index for one line layer.  `Send + Sync`; shared by
/// reference across the parallel grid build.
pub struct LineIndex {
    kind:          LayerKind,
    tree:          RTree<SegmentEntry>,
    feature_count: usize,
}

impl LineIndex {
    /// Index already-projected geometries.  The i-th geometry gets
    /// `FeatureId(i)`.
    pub fn build<'a, I>(kind: LayerKind, geometries: I) -> SpatialResult<Self>
    where
        I: IntoIterator<Item = &'a MultiLineString<f64>>,
    {
        let mut entries = Vec::new();
        let mut feature_count = 0;

        for (i, geometry) in geometries.into_iter().enumerate() {
            let feature = FeatureId(i as u32);
            feature_count += 1;

            let before = entries.len();
            for line in geometry.iter().flat_map(|ls| ls.lines()) {
                let (s, e) = (line.start, line.end);
                if !(s.x.is_finite() && s.y.is_finite() && e.x.is_finite() && e.y.is_finite()) {
                    return Err(SpatialError::NonFinite { layer: kind, feature });
                }
                entries.push(SegmentEntry {
                    start: [s.x, s.y],
                    end:   [e.x, e.y],
                    feature,
                });
            }
            if entries.len() == before {
                return Err(SpatialError::EmptyFeature { layer: kind, feature });
            }
        }

        Ok(Self {
            kind,
            tree: RTree::bulk_load(entries),
            feature_count,
        })
    }

    /// Project geographic features into `frame` and index them.
    pub fn from_features(kind: LayerKind, features: &[LineFeature], frame: &LocalFrame) -> SpatialResult<Self> {
        let projected: Vec<MultiLineString<f64>> =
            features.iter().map(|f| frame.project_lines(&f.geometry)).collect();
        Self::build(kind, projected.iter())
    }

    /// An index that misses every query.
    pub fn empty(kind: LayerKind) -> Self {
        Self { kind, tree: RTree::new(), feature_count: 0 }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn segment_count(&self) -> usize {
        self.tree.size()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// All segments whose envelope intersects the box `min`–`max`.
    pub fn segments_in_envelope(&self, min: [f64; 2], max: [f64; 2]) -> impl Iterator<Item = &SegmentEntry> {
        self.tree.locate_in_envelope_intersecting(&AABB::from_corners(min, max))
    }

    /// Features with any segment within `radius` of `point`, each paired with
    /// its nearest distance.  Sorted by `FeatureId`.
    pub fn features_within(&self, point: [f64; 2], radius: f64) -> Vec<(FeatureId, f64)> {
        let mut hits: Vec<(FeatureId, f64)> = Vec::new();
        for seg in self.tree.locate_within_distance(point, radius * radius) {
            let d = seg.distance_2(&point).sqrt();
            match hits.iter_mut().find(|(f, _)| *f == seg.feature) {
                Some((_, best)) => *best = best.min(d),
                None => hits.push((seg.feature, d)),
            }
        }
        hits.sort_unstable_by_key(|(f, _)| *f);
        hits
    }

    /// Features passing through the closed rectangle `min`–`max`.  Sorted,
    /// deduplicated.
    pub fn features_crossing_rect(&self, min: [f64; 2], max: [f64; 2]) -> Vec<FeatureId> {
        let mut hits: Vec<FeatureId> = self
            .segments_in_envelope(min, max)
            .filter(|s| segment::intersects_rect(s.start, s.end, min, max))
            .map(|s| s.feature)
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// `true` if `line` touches any indexed feature.
    pub fn intersects_line(&self, line: Line<f64>) -> bool {
        let (min, max) = line_bounds(line);
        self.segments_in_envelope(min, max)
            .any(|s| line_intersection(line, s.line()).is_some())
    }

    /// Every point where `line` meets an indexed segment.  A collinear
    /// overlap yields one crossing at the start of the overlap.  Sorted by
    /// feature, then by distance from `line.start`.
    pub fn crossings(&self, line: Line<f64>) -> Vec<Crossing> {
        let (min, max) = line_bounds(line);
        let mut out: Vec<Crossing> = self
            .segments_in_envelope(min, max)
            .filter_map(|s| {
                let point = match line_intersection(line, s.line())? {
                    LineIntersection::SinglePoint { intersection, .. } => intersection,
                    LineIntersection::Collinear { intersection } => intersection.start,
                };
                Some(Crossing { feature: s.feature, point })
            })
            .collect();

        let origin = line.start;
        let along = |c: &Crossing| {
            let (dx, dy) = (c.point.x - origin.x, c.point.y - origin.y);
            dx * dx + dy * dy
        };
        out.sort_by(|a, b| a.feature.cmp(&b.feature).then(along(a).total_cmp(&along(b))));
        out
    }
}

fn line_bounds(line: Line<f64>) -> ([f64; 2], [f64; 2]) {
    (
        [line.start.x.min(line.end.x), line.start.y.min(line.end.y)],
        [line.start.x.max(line.end.x), line.start.y.max(line.end.y)],
    )
}
