//! All reference-layer indexes of one routing request, built together.

use lcr_core::{LayerKind, LayerSet, LocalFrame};

use crate::{LineIndex, PolygonIndex, SpatialResult};

/// Indexes for every layer of a [`LayerSet`], projected into one frame.
///
/// Built once per request and shared read-only by the cost-surface builder
/// and the route post-processor.
pub struct LayerIndexes {
    pub land_cover:   PolygonIndex,
    pub transmission: LineIndex,
    pub railroad:     LineIndex,
}

impl LayerIndexes {
    pub fn build(layers: &LayerSet, frame: &LocalFrame) -> SpatialResult<Self> {
        Ok(Self {
            land_cover:   PolygonIndex::from_features(&layers.land_cover, frame)?,
            transmission: LineIndex::from_features(LayerKind::TransmissionLine, &layers.transmission_lines, frame)?,
            railroad:     LineIndex::from_features(LayerKind::Railroad, &layers.railroads, frame)?,
        })
    }

    /// Indexes over no features at all.
    pub fn empty() -> Self {
        Self {
            land_cover:   PolygonIndex::empty(),
            transmission: LineIndex::empty(LayerKind::TransmissionLine),
            railroad:     LineIndex::empty(LayerKind::Railroad),
        }
    }

    /// The line index for `kind`; `None` for land cover.
    pub fn lines(&self, kind: LayerKind) -> Option<&LineIndex> {
        match kind {
            LayerKind::LandCover        => None,
            LayerKind::TransmissionLine => Some(&self.transmission),
            LayerKind::Railroad         => Some(&self.railroad),
        }
    }
}
