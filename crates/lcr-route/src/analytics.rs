//! The typed analytics report attached to every route.

use std::collections::BTreeMap;

use lcr_core::{LayerKind, RouteConfig};

use crate::RouteMetrics;

/// One point of the elevation profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProfilePoint {
    pub distance_m:  f64,
    pub elevation_m: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElevationStats {
    pub average_m: f64,
    pub min_m:     f64,
    pub max_m:     f64,
}

impl ElevationStats {
    /// `None` for an empty profile.
    pub fn from_profile(profile: &[ProfilePoint]) -> Option<Self> {
        if profile.is_empty() {
            return None;
        }
        let (mut min_m, mut max_m, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for p in profile {
            min_m = min_m.min(p.elevation_m);
            max_m = max_m.max(p.elevation_m);
            sum += p.elevation_m;
        }
        Some(Self { average_m: sum / profile.len() as f64, min_m, max_m })
    }
}

/// Share of route length in one land-cover class.
#[derive(Clone, Debug, PartialEq)]
pub struct LandCoverShare {
    pub subcategory: String,
    pub percent:     f64,
}

/// Number of crossings of one line subcategory.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossingCount {
    pub layer:       LayerKind,
    pub subcategory: String,
    pub count:       usize,
}

/// Summary of one candidate route.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsReport {
    pub length_m:          f64,
    /// Accumulated grid cost of the solved path (unitless).
    pub total_cost:        f64,
    /// Mean cost per cell step along the path.
    pub average_cost:      f64,
    /// `cost_per_meter × length_m × average_cost`.
    pub estimated_cost:    f64,
    pub elevation:         Option<ElevationStats>,
    pub elevation_profile: Vec<ProfilePoint>,
    /// Sums to 100 for any non-empty route.
    pub land_cover:        Vec<LandCoverShare>,
    /// Sorted by layer then subcategory.
    pub crossings:         Vec<CrossingCount>,
}

impl AnalyticsReport {
    /// Combine post-processor metrics with the path cost.
    ///
    /// `path_cells` is the path length in cell steps (1 or √2 each); a
    /// zero-length path is priced at `baseline_cost`.
    pub fn aggregate(metrics: &RouteMetrics, total_cost: f64, path_cells: f64, config: &RouteConfig) -> Self {
        let average_cost = if path_cells > 0.0 { total_cost / path_cells } else { config.baseline_cost };

        let mut counts: BTreeMap<(LayerKind, &str), usize> = BTreeMap::new();
        for c in &metrics.crossings {
            *counts.entry((c.layer, c.subcategory.as_str())).or_insert(0) += 1;
        }

        Self {
            length_m: metrics.length_m,
            total_cost,
            average_cost,
            estimated_cost: config.cost_per_meter * metrics.length_m * average_cost,
            elevation: ElevationStats::from_profile(&metrics.profile),
            elevation_profile: metrics.profile.clone(),
            land_cover: metrics.land_cover.clone(),
            crossings: counts
                .into_iter()
                .map(|((layer, subcategory), count)| CrossingCount { layer, subcategory: subcategory.to_owned(), count })
                .collect(),
        }
    }

    /// Crossings of `layer` across all subcategories.
    pub fn crossings_of(&self, layer: LayerKind) -> usize {
        self.crossings.iter().filter(|c| c.layer == layer).map(|c| c.count).sum()
    }

    /// Percentage of route length in `subcategory`, 0 if absent.
    pub fn land_cover_percent(&self, subcategory: &str) -> f64 {
        self.land_cover
            .iter()
            .find(|s| s.subcategory == subcategory)
            .map_or(0.0, |s| s.percent)
    }
}
