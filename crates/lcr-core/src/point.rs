//! The area of interest and the two route endpoints.

use std::fmt;

use geo::{Area, BoundingRect, Intersects, Line, LineString, Point, Polygon};

use crate::{CoreError, CoreResult, GeoPoint, LocalFrame};

// ── Endpoint / RoutePoint ─────────────────────────────────────────────────────

/// Which end of the route a point marks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin      => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Why an endpoint cannot be routed from or to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndpointFault {
    /// No point of this kind has been placed.
    Missing,
    /// Coordinate is NaN, infinite, or outside WGS-84 bounds.
    InvalidCoordinate,
    /// Point lies outside the AOI polygon.
    OutsideAoi,
    /// Point is in the AOI but its grid cell is not.
    CellOutsideAoi,
    /// Cell is made impassable by a barrier.
    Blocked,
    /// Cell index is not on the grid.
    OffGrid,
}

impl fmt::Display for EndpointFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndpointFault::Missing           => "not set",
            EndpointFault::InvalidCoordinate => "invalid coordinate",
            EndpointFault::OutsideAoi        => "outside the area of interest",
            EndpointFault::CellOutsideAoi    => "grid cell lies outside the area of interest",
            EndpointFault::Blocked           => "grid cell is impassable",
            EndpointFault::OffGrid           => "grid cell is not on the grid",
        })
    }
}

/// A geographic coordinate tagged as origin or destination.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePoint {
    pub kind:     Endpoint,
    pub location: GeoPoint,
}

impl RoutePoint {
    pub fn origin(location: GeoPoint) -> Self {
        Self { kind: Endpoint::Origin, location }
    }

    pub fn destination(location: GeoPoint) -> Self {
        Self { kind: Endpoint::Destination, location }
    }
}

// ── AreaOfInterest ────────────────────────────────────────────────────────────

/// A validated AOI polygon in geographic coordinates (`x = lon, y = lat`).
///
/// Construction rejects degenerate input: non-finite or out-of-range
/// coordinates, fewer than three distinct vertices, zero area, and rings
/// that cross themselves.  Repeated consecutive vertices and unclosed rings
/// are tolerated (`geo` closes rings on construction).
#[derive(Clone, Debug)]
pub struct AreaOfInterest {
    polygon: Polygon<f64>,
    frame:   LocalFrame,
}

impl AreaOfInterest {
    pub fn new(polygon: Polygon<f64>) -> CoreResult<Self> {
        for c in polygon.exterior().coords().chain(polygon.interiors().iter().flat_map(|r| r.coords())) {
            if !GeoPoint::from(*c).is_valid() {
                return Err(CoreError::Geometry(format!("invalid AOI coordinate ({}, {})", c.x, c.y)));
            }
        }

        let exterior = distinct_lines(polygon.exterior());
        if exterior.len() < 3 {
            return Err(CoreError::Geometry("AOI exterior ring has fewer than 3 distinct vertices".to_owned()));
        }
        check_simple_ring(&exterior, "exterior")?;
        for (i, hole) in polygon.interiors().iter().enumerate() {
            check_simple_ring(&distinct_lines(hole), &format!("hole {i}"))?;
        }

        let Some(bbox) = polygon.bounding_rect() else {
            return Err(CoreError::Geometry("AOI is empty".to_owned()));
        };
        let frame = LocalFrame::new(GeoPoint::from(bbox.center()));

        let planar_area = frame.project_polygon(&polygon).unsigned_area();
        if !(planar_area > 0.0) {
            return Err(CoreError::Geometry("AOI has zero area".to_owned()));
        }

        Ok(Self { polygon, frame })
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Planar frame centred on the AOI bounding box.
    pub fn frame(&self) -> LocalFrame {
        self.frame
    }

    /// `true` if `p` lies inside the AOI or on its boundary.
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.polygon.intersects(&Point::from(geo::Coord::from(p)))
    }
}

/// Ring segments with zero-length segments dropped.
fn distinct_lines(ring: &LineString<f64>) -> Vec<Line<f64>> {
    ring.lines().filter(|l| l.start != l.end).collect()
}

/// Fail if two non-adjacent segments of a closed ring touch.
fn check_simple_ring(lines: &[Line<f64>], which: &str) -> CoreResult<()> {
    let n = lines.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue; // closing segment is adjacent to the first
            }
            if lines[i].intersects(&lines[j]) {
                return Err(CoreError::Geometry(format!(
                    "AOI {which} ring self-intersects (segments {i} and {j})"
                )));
            }
        }
    }
    Ok(())
}
