//! Geographic coordinate type and the local planar frame.
//!
//! Inputs arrive as WGS-84 longitude/latitude.  All grid arithmetic happens in
//! a [`LocalFrame`]: an equirectangular projection centred on the AOI that
//! maps degrees to metres (`x` east, `y` north).  At AOI scale (tens of
//! kilometres) the distortion is well below one grid cell.
//!
//! `geo` geometries use `x = lon, y = lat` in geographic space and
//! `x = east_m, y = north_m` once projected.

use geo::{Coord, LineString, MapCoords, MultiLineString, Polygon};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// `true` if both components are finite and within WGS-84 bounds.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        GeoPoint { lat: c.y, lon: c.x }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── LocalFrame ────────────────────────────────────────────────────────────────

/// Equirectangular projection about a fixed origin.
///
/// Cheap to copy; every component of one routing request shares the same
/// frame so planar distances are comparable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalFrame {
    origin:  GeoPoint,
    cos_lat: f64,
}

impl LocalFrame {
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos(),
        }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Geographic → planar metres.
    #[inline]
    pub fn project(&self, p: GeoPoint) -> Coord<f64> {
        Coord {
            x: (p.lon - self.origin.lon).to_radians() * EARTH_RADIUS_M * self.cos_lat,
            y: (p.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M,
        }
    }

    /// Planar metres → geographic.
    #[inline]
    pub fn unproject(&self, c: Coord<f64>) -> GeoPoint {
        GeoPoint {
            lat: self.origin.lat + (c.y / EARTH_RADIUS_M).to_degrees(),
            lon: self.origin.lon + (c.x / (EARTH_RADIUS_M * self.cos_lat)).to_degrees(),
        }
    }

    /// Project a lon/lat coordinate (as stored in `geo` geometries).
    #[inline]
    pub fn project_coord(&self, c: Coord<f64>) -> Coord<f64> {
        self.project(GeoPoint::from(c))
    }

    pub fn project_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        polygon.map_coords(|c| self.project_coord(c))
    }

    pub fn project_line_string(&self, line: &LineString<f64>) -> LineString<f64> {
        line.map_coords(|c| self.project_coord(c))
    }

    pub fn project_lines(&self, lines: &MultiLineString<f64>) -> MultiLineString<f64> {
        lines.map_coords(|c| self.project_coord(c))
    }

    /// Planar polygon → geographic polygon (`x = lon, y = lat`).
    pub fn unproject_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        polygon.map_coords(|c| self.unproject(c).into())
    }

    /// Planar line → geographic line (`x = lon, y = lat`).
    pub fn unproject_line_string(&self, line: &LineString<f64>) -> LineString<f64> {
        line.map_coords(|c| self.unproject(c).into())
    }
}
