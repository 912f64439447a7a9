//! Reference layers supplied by the caller, already clipped to the project.
//!
//! Geometries are in geographic coordinates (`x = lon, y = lat`).  Each
//! feature carries a categorical subcategory (`"Forest"`, `">200kV"`,
//! `"High Speed"`, …) that selects its [`WeightProfile`](crate::WeightProfile).

use std::fmt;

use geo::{LineString, MultiLineString, Polygon};

use crate::FeatureId;

/// The three layer families the engine understands.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerKind {
    /// Polygon layer; contributes `general_weight` cost.
    LandCover,
    /// Line layer; contributes a corridor discount.
    TransmissionLine,
    /// Line layer; contributes a corridor discount and a barrier penalty.
    Railroad,
}

impl LayerKind {
    pub fn is_line(self) -> bool {
        !matches!(self, LayerKind::LandCover)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::LandCover        => "land_cover",
            LayerKind::TransmissionLine => "transmission_line",
            LayerKind::Railroad         => "railroad",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One land-cover polygon (holes allowed).
#[derive(Clone, Debug)]
pub struct PolygonFeature {
    pub geometry:    Polygon<f64>,
    pub subcategory: String,
}

impl PolygonFeature {
    pub fn new(geometry: Polygon<f64>, subcategory: impl Into<String>) -> Self {
        Self { geometry, subcategory: subcategory.into() }
    }
}

/// One transmission line or railroad; may be multi-part.
#[derive(Clone, Debug)]
pub struct LineFeature {
    pub geometry:    MultiLineString<f64>,
    pub subcategory: String,
}

impl LineFeature {
    pub fn new(geometry: impl Into<MultiLineString<f64>>, subcategory: impl Into<String>) -> Self {
        Self { geometry: geometry.into(), subcategory: subcategory.into() }
    }

    /// Convenience for the common single-part case.
    pub fn from_line(line: LineString<f64>, subcategory: impl Into<String>) -> Self {
        Self::new(MultiLineString::new(vec![line]), subcategory)
    }
}

/// All reference layers of one routing request.
///
/// A feature's [`FeatureId`] is its position in the corresponding `Vec`.
#[derive(Clone, Debug, Default)]
pub struct LayerSet {
    pub land_cover:         Vec<PolygonFeature>,
    pub transmission_lines: Vec<LineFeature>,
    pub railroads:          Vec<LineFeature>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.land_cover.is_empty()
            && self.transmission_lines.is_empty()
            && self.railroads.is_empty()
    }

    /// Line features of `kind`; empty for [`LayerKind::LandCover`].
    pub fn lines(&self, kind: LayerKind) -> &[LineFeature] {
        match kind {
            LayerKind::LandCover        => &[],
            LayerKind::TransmissionLine => &self.transmission_lines,
            LayerKind::Railroad         => &self.railroads,
        }
    }

    /// Subcategory of the feature `id` in layer `kind`.
    pub fn subcategory(&self, kind: LayerKind, id: FeatureId) -> Option<&str> {
        match kind {
            LayerKind::LandCover => self.land_cover.get(id.index()).map(|f| f.subcategory.as_str()),
            _ => self.lines(kind).get(id.index()).map(|f| f.subcategory.as_str()),
        }
    }
}
