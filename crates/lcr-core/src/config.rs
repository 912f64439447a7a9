//! Routing configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to every routing invocation.  Nothing here is
//! global; two requests with different configs can run side by side.

use crate::{CoreError, CoreResult};

/// Sign convention for land-cover `general_weight`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightPolarity {
    /// Higher weight ⇒ costlier, the area is avoided.
    #[default]
    AvoidHigh,
    /// Higher weight ⇒ cheaper, the area is preferred.
    PreferHigh,
}

/// How corridor discounts fall off inside the buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorridorDecay {
    /// Full discount anywhere within the buffer.
    Flat,
    /// Full discount on the line, falling linearly to zero at the buffer edge.
    #[default]
    Linear,
}

impl CorridorDecay {
    /// Discount scale in [0,1] at `distance_m` from the line.
    #[inline]
    pub fn factor(self, distance_m: f64, buffer_m: f64) -> f64 {
        if distance_m > buffer_m {
            return 0.0;
        }
        match self {
            CorridorDecay::Flat => 1.0,
            CorridorDecay::Linear if buffer_m > 0.0 => 1.0 - distance_m / buffer_m,
            CorridorDecay::Linear => 1.0,
        }
    }
}

/// Path search algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// A* with a Euclidean heuristic scaled by the cheapest cell cost.
    #[default]
    AStar,
    /// Plain Dijkstra; no heuristic.
    Dijkstra,
}

/// Parameters of one route generation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouteConfig {
    /// Edge length of a grid cell in metres.  Default: 720 (land-cover raster).
    pub resolution_m: f64,

    /// Traversal cost of a cell with no contributing layer.  Never 0.
    pub baseline_cost: f64,

    /// Cost added by a land-cover feature at weight 1.0.
    pub general_scale: f64,

    /// Sign convention for land-cover weights.
    pub land_cover_polarity: WeightPolarity,

    /// Corridor influence radius in metres.
    pub corridor_buffer_m: f64,

    pub corridor_decay: CorridorDecay,

    /// Lower bound on the cost of any passable cell.  Must be > 0.
    pub min_cost_floor: f64,

    /// Cost added where a railroad crosses a cell, at barrier weight 1.0.
    pub barrier_scale: f64,

    /// Barrier weights strictly above this make crossed cells impassable.
    pub hard_block_threshold: f64,

    /// Douglas–Peucker tolerance as a fraction of `resolution_m`.
    pub simplify_tolerance: f64,

    /// Spacing of land-cover and elevation samples along the route.
    pub sample_interval_m: f64,

    /// Currency per metre of route at an average traversed cost of 1.0.
    pub cost_per_meter: f64,

    pub search: SearchStrategy,

    /// Largest grid (rows × cols) a request may allocate.
    pub max_cells: usize,

    /// Worker thread count for the parallel grid build.  `None` uses the
    /// global Rayon pool.
    pub num_threads: Option<usize>,

    /// Keep per-cell layer contributions on the `CostGrid`.
    pub record_contributions: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            resolution_m:         720.0,
            baseline_cost:        1.0,
            general_scale:        9.0,
            land_cover_polarity:  WeightPolarity::AvoidHigh,
            corridor_buffer_m:    1_000.0,
            corridor_decay:       CorridorDecay::Linear,
            min_cost_floor:       0.1,
            barrier_scale:        50.0,
            hard_block_threshold: 0.9,
            simplify_tolerance:   0.5,
            sample_interval_m:    100.0,
            cost_per_meter:       1.0,
            search:               SearchStrategy::AStar,
            max_cells:            4_000_000,
            num_threads:          None,
            record_contributions: false,
        }
    }
}

impl RouteConfig {
    /// Douglas–Peucker tolerance in metres.
    #[inline]
    pub fn simplify_tolerance_m(&self) -> f64 {
        self.simplify_tolerance * self.resolution_m
    }

    /// Reject values that would make the grid or the search meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be finite and > 0, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be finite and >= 0, got {v}")))
            }
        }

        positive("resolution_m", self.resolution_m)?;
        positive("baseline_cost", self.baseline_cost)?;
        positive("min_cost_floor", self.min_cost_floor)?;
        positive("sample_interval_m", self.sample_interval_m)?;
        non_negative("general_scale", self.general_scale)?;
        non_negative("corridor_buffer_m", self.corridor_buffer_m)?;
        non_negative("barrier_scale", self.barrier_scale)?;
        non_negative("simplify_tolerance", self.simplify_tolerance)?;
        non_negative("cost_per_meter", self.cost_per_meter)?;

        if !(0.0..=1.0).contains(&self.hard_block_threshold) {
            return Err(CoreError::Config(format!(
                "hard_block_threshold must be in [0, 1], got {}",
                self.hard_block_threshold
            )));
        }
        if self.max_cells == 0 || self.max_cells > u32::MAX as usize {
            return Err(CoreError::Config(format!("max_cells out of range: {}", self.max_cells)));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be >= 1".to_owned()));
        }
        Ok(())
    }
}
