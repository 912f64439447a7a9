//! The `CostGrid` raster and its geometry.
//!
//! # Data layout
//!
//! Cells are stored row-major in flat `Vec`s indexed by [`CellId`]:
//!
//! ```text
//! CellId = row * cols + col        row 0 is the southern edge
//! ```
//!
//! Cell `(row, col)` covers `[min.x + col·res, min.x + (col+1)·res) ×
//! [min.y + row·res, min.y + (row+1)·res)` in planar metres.

use geo::{Coord, Polygon};

use lcr_core::{CellId, FeatureId, LayerKind, LocalFrame};

use crate::{SurfaceError, SurfaceResult};

/// Cost sentinel for cells that cannot be entered.
pub const IMPASSABLE: f64 = f64::INFINITY;

// ── GridGeometry ──────────────────────────────────────────────────────────────

/// Placement and shape of a regular grid in planar metres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridGeometry {
    /// South-west corner of cell `(0, 0)`.
    pub min:          Coord<f64>,
    pub resolution_m: f64,
    pub rows:         u32,
    pub cols:         u32,
}

impl GridGeometry {
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline]
    pub fn cell(&self, row: u32, col: u32) -> CellId {
        CellId(row * self.cols + col)
    }

    #[inline]
    pub fn row_col(&self, cell: CellId) -> (u32, u32) {
        (cell.0 / self.cols, cell.0 % self.cols)
    }

    #[inline]
    pub fn cell_center(&self, cell: CellId) -> Coord<f64> {
        let (row, col) = self.row_col(cell);
        Coord {
            x: self.min.x + (col as f64 + 0.5) * self.resolution_m,
            y: self.min.y + (row as f64 + 0.5) * self.resolution_m,
        }
    }

    /// `(min, max)` corners of the cell.
    #[inline]
    pub fn cell_bounds(&self, cell: CellId) -> ([f64; 2], [f64; 2]) {
        let (row, col) = self.row_col(cell);
        let x0 = self.min.x + col as f64 * self.resolution_m;
        let y0 = self.min.y + row as f64 * self.resolution_m;
        ([x0, y0], [x0 + self.resolution_m, y0 + self.resolution_m])
    }

    /// Cell containing `p`.  Points on the far (north/east) grid edge belong
    /// to the last row/column.  `None` outside the grid.
    pub fn locate(&self, p: Coord<f64>) -> Option<CellId> {
        let fx = (p.x - self.min.x) / self.resolution_m;
        let fy = (p.y - self.min.y) / self.resolution_m;
        if !(fx >= 0.0 && fy >= 0.0 && fx <= self.cols as f64 && fy <= self.rows as f64) {
            return None;
        }
        let col = (fx.floor() as u32).min(self.cols - 1);
        let row = (fy.floor() as u32).min(self.rows - 1);
        Some(self.cell(row, col))
    }
}

// ── Contributions ─────────────────────────────────────────────────────────────

/// How one feature changed a cell's cost.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Effect {
    /// Additive land-cover cost.
    LandCover { added: f64 },
    /// Multiplicative corridor discount (`factor` < 1).
    CorridorDiscount { factor: f64 },
    /// Additive barrier penalty.
    BarrierPenalty { added: f64 },
    /// Barrier above the hard-block threshold.
    HardBlock,
}

/// One feature's effect on one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contribution {
    pub layer:   LayerKind,
    pub feature: FeatureId,
    pub effect:  Effect,
}

// ── CostGrid ──────────────────────────────────────────────────────────────────

/// Rasterised traversal cost over the AOI bounding box.
///
/// Derived and disposable: rebuilt whenever the AOI or weights change.
#[derive(Clone, Debug)]
pub struct CostGrid {
    pub geometry: GridGeometry,
    /// Frame the planar coordinates are expressed in.
    pub frame:    LocalFrame,
    in_aoi:        Vec<bool>,
    cost:          Vec<f64>,
    contributions: Option<Vec<Vec<Contribution>>>,
    aoi:           Option<Polygon<f64>>,
}

impl CostGrid {
    /// Assemble a grid from per-cell arrays.  Cells outside the AOI are
    /// forced to [`IMPASSABLE`].
    pub fn from_parts(
        geometry: GridGeometry,
        frame:    LocalFrame,
        in_aoi:   Vec<bool>,
        mut cost: Vec<f64>,
    ) -> SurfaceResult<Self> {
        let n = geometry.cell_count();
        for len in [in_aoi.len(), cost.len()] {
            if len != n {
                return Err(SurfaceError::ShapeMismatch { rows: geometry.rows, cols: geometry.cols, got: len });
            }
        }
        for (c, &inside) in cost.iter_mut().zip(&in_aoi) {
            if !inside || c.is_nan() {
                *c = IMPASSABLE;
            }
        }
        Ok(Self { geometry, frame, in_aoi, cost, contributions: None, aoi: None })
    }

    /// A fully-in-AOI grid of constant cost, anchored at the frame origin.
    /// Handy for tests and benchmarks.
    pub fn uniform(rows: u32, cols: u32, resolution_m: f64, cost: f64, frame: LocalFrame) -> Self {
        let geometry = GridGeometry { min: Coord { x: 0.0, y: 0.0 }, resolution_m, rows, cols };
        let n = geometry.cell_count();
        Self {
            geometry,
            frame,
            in_aoi: vec![true; n],
            cost: vec![cost; n],
            contributions: None,
            aoi: None,
        }
    }

    /// Attach the planar AOI outline the grid was rasterised from.
    pub fn with_aoi(mut self, aoi: Polygon<f64>) -> Self {
        self.aoi = Some(aoi);
        self
    }

    pub(crate) fn with_contributions(mut self, contributions: Vec<Vec<Contribution>>) -> Self {
        self.contributions = Some(contributions);
        self
    }

    // ── Cell access ───────────────────────────────────────────────────────

    #[inline]
    pub fn in_aoi(&self, cell: CellId) -> bool {
        self.in_aoi[cell.index()]
    }

    #[inline]
    pub fn cost(&self, cell: CellId) -> f64 {
        self.cost[cell.index()]
    }

    /// Inside the AOI and not blocked.
    #[inline]
    pub fn is_passable(&self, cell: CellId) -> bool {
        self.in_aoi[cell.index()] && self.cost[cell.index()].is_finite()
    }

    /// Inside the AOI but made impassable by a barrier.
    #[inline]
    pub fn is_blocked(&self, cell: CellId) -> bool {
        self.in_aoi[cell.index()] && !self.cost[cell.index()].is_finite()
    }

    /// Override one cell's cost.  Used by callers that post-edit a surface
    /// (and by tests); `IMPASSABLE` blocks the cell.
    pub fn set_cost(&mut self, cell: CellId, cost: f64) {
        if self.in_aoi[cell.index()] {
            self.cost[cell.index()] = cost;
        }
    }

    /// Layer contributions recorded for `cell`; empty unless the grid was
    /// built with `record_contributions`.
    pub fn contributions(&self, cell: CellId) -> &[Contribution] {
        match &self.contributions {
            Some(all) => all[cell.index()].as_slice(),
            None => &[],
        }
    }

    pub fn records_contributions(&self) -> bool {
        self.contributions.is_some()
    }

    /// Planar AOI outline, if the grid was built from one.  Cell membership
    /// only samples centres; anything drawn between cells must be checked
    /// against this.
    pub fn aoi(&self) -> Option<&Polygon<f64>> {
        self.aoi.as_ref()
    }

    // ── Aggregates ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        self.cost.len()
    }

    pub fn in_aoi_count(&self) -> usize {
        self.in_aoi.iter().filter(|&&b| b).count()
    }

    pub fn passable_count(&self) -> usize {
        (0..self.cell_count()).filter(|&i| self.is_passable(CellId(i as u32))).count()
    }

    /// Cheapest passable cell cost; `None` if nothing is passable.
    pub fn min_passable_cost(&self) -> Option<f64> {
        self.cost
            .iter()
            .zip(&self.in_aoi)
            .filter(|&(c, &inside)| inside && c.is_finite())
            .map(|(&c, _)| c)
            .reduce(f64::min)
    }

    /// Cell under the planar point `p`.
    pub fn locate(&self, p: Coord<f64>) -> Option<CellId> {
        self.geometry.locate(p)
    }

    /// Up to eight neighbours of `cell` with their step length in cells
    /// (1 or √2), in a fixed order: S, N, W, E, SW, SE, NW, NE.
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = (CellId, f64)> + '_ {
        const STEPS: [(i32, i32, f64); 8] = [
            (-1,  0, 1.0),
            ( 1,  0, 1.0),
            ( 0, -1, 1.0),
            ( 0,  1, 1.0),
            (-1, -1, std::f64::consts::SQRT_2),
            (-1,  1, std::f64::consts::SQRT_2),
            ( 1, -1, std::f64::consts::SQRT_2),
            ( 1,  1, std::f64::consts::SQRT_2),
        ];
        let (row, col) = self.geometry.row_col(cell);
        let (rows, cols) = (self.geometry.rows as i32, self.geometry.cols as i32);
        STEPS.iter().filter_map(move |&(dr, dc, step)| {
            let (r, c) = (row as i32 + dr, col as i32 + dc);
            (r >= 0 && r < rows && c >= 0 && c < cols).then(|| (self.geometry.cell(r as u32, c as u32), step))
        })
    }
}
