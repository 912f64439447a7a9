//! Rasterise an AOI and its reference layers into a [`CostGrid`].

use geo::{BoundingRect, Coord, Intersects, Point, Polygon};
use tracing::{debug, warn};

use lcr_core::{
    AreaOfInterest, CancelToken, Cancelled, CellId, FeatureId, LayerKind, LayerSet,
    ResolvedWeight, RouteConfig, WeightTable,
};
use lcr_spatial::LayerIndexes;

use crate::{Contribution, CostGrid, Effect, GridGeometry, IMPASSABLE, SurfaceError, SurfaceResult};

/// One finished grid row.
struct Row {
    in_aoi:        Vec<bool>,
    cost:          Vec<f64>,
    contributions: Vec<Vec<Contribution>>,
}

/// Per-feature effective weights for each layer, indexed by `FeatureId`.
/// `None` means the feature contributes nothing.
struct FeatureWeights {
    land_cover:   Vec<Option<ResolvedWeight>>,
    transmission: Vec<Option<ResolvedWeight>>,
    railroad:     Vec<Option<ResolvedWeight>>,
}

impl FeatureWeights {
    fn resolve(layers: &LayerSet, table: &WeightTable) -> Self {
        let resolve_kind = |kind: LayerKind, subcategories: Vec<&str>| -> Vec<Option<ResolvedWeight>> {
            subcategories
                .into_iter()
                .enumerate()
                .map(|(i, sub)| match table.get(kind, sub) {
                    Some(w) if !w.is_zero() => Some(w),
                    Some(_) => None,
                    None => {
                        warn!(layer = %kind, feature = i, subcategory = sub, "no weight entry; feature ignored");
                        None
                    }
                })
                .collect()
        };
        Self {
            land_cover: resolve_kind(
                LayerKind::LandCover,
                layers.land_cover.iter().map(|f| f.subcategory.as_str()).collect(),
            ),
            transmission: resolve_kind(
                LayerKind::TransmissionLine,
                layers.transmission_lines.iter().map(|f| f.subcategory.as_str()).collect(),
            ),
            railroad: resolve_kind(
                LayerKind::Railroad,
                layers.railroads.iter().map(|f| f.subcategory.as_str()).collect(),
            ),
        }
    }

    #[inline]
    fn get(&self, kind: LayerKind, id: FeatureId) -> Option<ResolvedWeight> {
        let v = match kind {
            LayerKind::LandCover        => &self.land_cover,
            LayerKind::TransmissionLine => &self.transmission,
            LayerKind::Railroad         => &self.railroad,
        };
        v.get(id.index()).copied().flatten()
    }
}

/// Builds a [`CostGrid`] for one routing request.
///
/// Everything the builder holds is borrowed immutably, so rows can be
/// computed on any number of threads without locking.
///
/// # Example
///
/// ```rust,ignore
/// let indexes = LayerIndexes::build(&layers, &aoi.frame())?;
/// let grid = CostSurfaceBuilder::new(&aoi, &layers, &table, &config)
///     .build(&indexes, &CancelToken::new())?;
/// ```
pub struct CostSurfaceBuilder<'a> {
    aoi:     &'a AreaOfInterest,
    layers:  &'a LayerSet,
    weights: &'a WeightTable,
    config:  &'a RouteConfig,
}

impl<'a> CostSurfaceBuilder<'a> {
    pub fn new(
        aoi:     &'a AreaOfInterest,
        layers:  &'a LayerSet,
        weights: &'a WeightTable,
        config:  &'a RouteConfig,
    ) -> Self {
        Self { aoi, layers, weights, config }
    }

    /// Grid placement covering the AOI's planar bounding box.
    pub fn geometry(&self) -> SurfaceResult<(GridGeometry, Polygon<f64>)> {
        self.config.validate()?;
        let planar = self.aoi.frame().project_polygon(self.aoi.polygon());
        let rect = planar
            .bounding_rect()
            .ok_or_else(|| SurfaceError::Core(lcr_core::CoreError::Geometry("AOI is empty".to_owned())))?;

        let res = self.config.resolution_m;
        // Tolerate projection round-off so an exact multiple of the
        // resolution does not grow an extra row or column.
        let cells_along = |len: f64| ((len / res - 1e-9).ceil() as u64).max(1);
        let cols = cells_along(rect.width());
        let rows = cells_along(rect.height());
        if rows.saturating_mul(cols) > self.config.max_cells as u64 {
            return Err(SurfaceError::GridTooLarge { rows, cols, max: self.config.max_cells });
        }

        let geometry = GridGeometry {
            min: rect.min(),
            resolution_m: res,
            rows: rows as u32,
            cols: cols as u32,
        };
        Ok((geometry, planar))
    }

    /// Compute every cell.  Checks `cancel` once per row.
    pub fn build(&self, indexes: &LayerIndexes, cancel: &CancelToken) -> SurfaceResult<CostGrid> {
        let (geometry, planar_aoi) = self.geometry()?;
        let weights = FeatureWeights::resolve(self.layers, self.weights);

        debug!(
            rows = geometry.rows,
            cols = geometry.cols,
            resolution_m = geometry.resolution_m,
            "building cost surface"
        );

        let rows = self.build_rows(&geometry, &planar_aoi, indexes, &weights, cancel)?;

        let n = geometry.cell_count();
        let mut in_aoi = Vec::with_capacity(n);
        let mut cost = Vec::with_capacity(n);
        let mut contributions = Vec::with_capacity(if self.config.record_contributions { n } else { 0 });
        for row in rows {
            in_aoi.extend(row.in_aoi);
            cost.extend(row.cost);
            contributions.extend(row.contributions);
        }

        let mut grid = CostGrid::from_parts(geometry, self.aoi.frame(), in_aoi, cost)?.with_aoi(planar_aoi);
        if self.config.record_contributions {
            grid = grid.with_contributions(contributions);
        }

        let inside = grid.in_aoi_count();
        if inside == 0 {
            return Err(SurfaceError::EmptyAoi);
        }
        debug!(cells = n, in_aoi = inside, passable = grid.passable_count(), "cost surface ready");
        Ok(grid)
    }

    fn build_rows(
        &self,
        geometry:   &GridGeometry,
        planar_aoi: &Polygon<f64>,
        indexes:    &LayerIndexes,
        weights:    &FeatureWeights,
        cancel:     &CancelToken,
    ) -> SurfaceResult<Vec<Row>> {
        let build_row = |row: u32| -> Result<Row, Cancelled> {
            cancel.check()?;
            Ok(self.build_row(row, geometry, planar_aoi, indexes, weights))
        };

        #[cfg(not(feature = "parallel"))]
        {
            Ok((0..geometry.rows).map(build_row).collect::<Result<Vec<_>, _>>()?)
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || (0..geometry.rows).into_par_iter().map(build_row).collect::<Result<Vec<_>, _>>();
            let rows = match self.config.num_threads {
                Some(n) => rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SurfaceError::ThreadPool(e.to_string()))?
                    .install(run),
                None => run(),
            };
            Ok(rows?)
        }
    }

    fn build_row(
        &self,
        row:        u32,
        geometry:   &GridGeometry,
        planar_aoi: &Polygon<f64>,
        indexes:    &LayerIndexes,
        weights:    &FeatureWeights,
    ) -> Row {
        let cols = geometry.cols as usize;
        let record = self.config.record_contributions;
        let mut out = Row {
            in_aoi:        Vec::with_capacity(cols),
            cost:          Vec::with_capacity(cols),
            contributions: Vec::with_capacity(if record { cols } else { 0 }),
        };
        let mut scratch = Vec::new();

        for col in 0..geometry.cols {
            let cell = geometry.cell(row, col);
            scratch.clear();
            let center = geometry.cell_center(cell);
            let inside = planar_aoi.intersects(&Point::from(center));
            let cost = if inside {
                self.cell_cost(cell, center, geometry, indexes, weights, &mut scratch)
            } else {
                IMPASSABLE
            };
            out.in_aoi.push(inside);
            out.cost.push(cost);
            if record {
                out.contributions.push(scratch.clone());
            }
        }
        out
    }

    /// Cost of one in-AOI cell.  Appends every contributing feature to
    /// `contributions`.
    fn cell_cost(
        &self,
        cell:          CellId,
        center:        Coord<f64>,
        geometry:      &GridGeometry,
        indexes:       &LayerIndexes,
        weights:       &FeatureWeights,
        contributions: &mut Vec<Contribution>,
    ) -> f64 {
        let cfg = self.config;
        let mut cost = cfg.baseline_cost;

        // ② land cover
        for feature in indexes.land_cover.containing(center) {
            let Some(w) = weights.get(LayerKind::LandCover, feature) else { continue };
            if w.general > 0.0 {
                let added = w.general * cfg.general_scale;
                cost += added;
                contributions.push(Contribution {
                    layer: LayerKind::LandCover,
                    feature,
                    effect: Effect::LandCover { added },
                });
            }
        }

        // ③ corridor discount
        let p = [center.x, center.y];
        let mut factor = 1.0;
        for (kind, index) in [
            (LayerKind::TransmissionLine, &indexes.transmission),
            (LayerKind::Railroad, &indexes.railroad),
        ] {
            for (feature, distance) in index.features_within(p, cfg.corridor_buffer_m) {
                let Some(w) = weights.get(kind, feature) else { continue };
                let k = 1.0 - w.corridor * cfg.corridor_decay.factor(distance, cfg.corridor_buffer_m);
                if w.corridor > 0.0 && k < 1.0 {
                    factor *= k;
                    contributions.push(Contribution {
                        layer: kind,
                        feature,
                        effect: Effect::CorridorDiscount { factor: k },
                    });
                }
            }
        }
        cost = (cost * factor).max(cfg.min_cost_floor);

        // ④ barrier penalty
        let (min, max) = geometry.cell_bounds(cell);
        for feature in indexes.railroad.features_crossing_rect(min, max) {
            let Some(w) = weights.get(LayerKind::Railroad, feature) else { continue };
            if w.barrier <= 0.0 {
                continue;
            }
            if w.barrier > cfg.hard_block_threshold {
                cost = IMPASSABLE;
                contributions.push(Contribution {
                    layer: LayerKind::Railroad,
                    feature,
                    effect: Effect::HardBlock,
                });
            } else {
                let added = w.barrier * cfg.barrier_scale;
                cost += added;
                contributions.push(Contribution {
                    layer: LayerKind::Railroad,
                    feature,
                    effect: Effect::BarrierPenalty { added },
                });
            }
        }

        cost
    }
}
