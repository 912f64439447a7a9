//! Per-subcategory weight profiles.
//!
//! Weights are passed into every routing invocation as an explicit slice;
//! there is no process-wide weight state.  A [`WeightTable`] validates the
//! slice once and answers lookups by `(LayerKind, subcategory)`.
//!
//! # Polarity
//!
//! | Weight           | Applies to          | Effect of a higher value          |
//! |------------------|---------------------|-----------------------------------|
//! | `general_weight` | land cover          | costlier (with `AvoidHigh`)       |
//! | `corridor_weight`| transmission, rail  | larger discount near the line     |
//! | `barrier_weight` | rail only           | larger crossing penalty / block   |

use rustc_hash::FxHashMap;

use crate::{CoreError, CoreResult, LayerKind, WeightPolarity};

/// Weight settings for one subcategory of one layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightProfile {
    pub layer:           LayerKind,
    pub subcategory:     String,
    pub general_weight:  f64,
    pub corridor_weight: f64,
    pub barrier_weight:  f64,
    pub enabled:         bool,
}

impl WeightProfile {
    /// An enabled land-cover entry.
    pub fn land_cover(subcategory: impl Into<String>, general_weight: f64) -> Self {
        Self {
            layer: LayerKind::LandCover,
            subcategory: subcategory.into(),
            general_weight,
            corridor_weight: 0.0,
            barrier_weight: 0.0,
            enabled: true,
        }
    }

    /// An enabled transmission-line entry.
    pub fn transmission(subcategory: impl Into<String>, corridor_weight: f64) -> Self {
        Self {
            layer: LayerKind::TransmissionLine,
            subcategory: subcategory.into(),
            general_weight: 0.0,
            corridor_weight,
            barrier_weight: 0.0,
            enabled: true,
        }
    }

    /// An enabled railroad entry.
    pub fn railroad(subcategory: impl Into<String>, corridor_weight: f64, barrier_weight: f64) -> Self {
        Self {
            layer: LayerKind::Railroad,
            subcategory: subcategory.into(),
            general_weight: 0.0,
            corridor_weight,
            barrier_weight,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The weight table used when a project has not customised anything.
    pub fn default_table() -> Vec<WeightProfile> {
        vec![
            Self::land_cover("Water", 1.0),
            Self::land_cover("Wetland", 0.9),
            Self::land_cover("Forest", 0.7),
            Self::land_cover("Urban", 0.8),
            Self::land_cover("Cropland", 0.3),
            Self::land_cover("Shrubland", 0.3),
            Self::land_cover("Grassland", 0.2),
            Self::land_cover("Barren", 0.1),
            Self::transmission(">200kV", 0.6),
            Self::transmission("100-200kV", 0.5),
            Self::transmission("<100kV", 0.3),
            Self::railroad("High Speed", 0.2, 1.0),
            Self::railroad("Main Line", 0.3, 0.6),
            Self::railroad("Branch Line", 0.3, 0.3),
        ]
    }

    fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("general_weight", self.general_weight),
            ("corridor_weight", self.corridor_weight),
            ("barrier_weight", self.barrier_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CoreError::Weight {
                    layer:       self.layer,
                    subcategory: self.subcategory.clone(),
                    reason:      format!("{name} = {value} is outside [0, 1]"),
                });
            }
        }
        Ok(())
    }
}

/// Effective weights for one feature after `enabled` and polarity are applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolvedWeight {
    /// Land-cover avoidance in [0,1]; 1 = costliest.
    pub general:  f64,
    /// Corridor discount strength in [0,1].
    pub corridor: f64,
    /// Barrier penalty strength in [0,1].
    pub barrier:  f64,
}

impl ResolvedWeight {
    pub const ZERO: ResolvedWeight = ResolvedWeight { general: 0.0, corridor: 0.0, barrier: 0.0 };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Validated lookup over a `WeightProfile` slice.
#[derive(Clone, Debug, Default)]
pub struct WeightTable {
    entries:  FxHashMap<(LayerKind, String), ResolvedWeight>,
}

impl WeightTable {
    /// Validate `profiles` and index them.
    ///
    /// Fails on any weight outside [0,1] and on duplicate
    /// `(layer, subcategory)` pairs.
    pub fn new(profiles: &[WeightProfile], polarity: WeightPolarity) -> CoreResult<Self> {
        let mut entries = FxHashMap::default();
        for p in profiles {
            p.validate()?;
            let resolved = if p.enabled {
                let general = match (p.layer, polarity) {
                    (LayerKind::LandCover, WeightPolarity::AvoidHigh)  => p.general_weight,
                    (LayerKind::LandCover, WeightPolarity::PreferHigh) => 1.0 - p.general_weight,
                    _ => 0.0,
                };
                ResolvedWeight {
                    general,
                    corridor: if p.layer.is_line() { p.corridor_weight } else { 0.0 },
                    barrier:  if p.layer == LayerKind::Railroad { p.barrier_weight } else { 0.0 },
                }
            } else {
                ResolvedWeight::ZERO
            };
            if entries.insert((p.layer, p.subcategory.clone()), resolved).is_some() {
                return Err(CoreError::Weight {
                    layer:       p.layer,
                    subcategory: p.subcategory.clone(),
                    reason:      "duplicate entry".to_owned(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Effective weights for `(kind, subcategory)`, or `None` when the table
    /// has no entry for it.
    pub fn get(&self, kind: LayerKind, subcategory: &str) -> Option<ResolvedWeight> {
        self.entries.get(&(kind, subcategory.to_owned())).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
