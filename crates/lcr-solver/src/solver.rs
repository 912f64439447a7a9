//! Search trait and the A* / Dijkstra implementations.
//!
//! # Pluggability
//!
//! The route engine calls search through the [`PathSolver`] trait, so a
//! different strategy (bidirectional search, jump-point search) can be dropped
//! in without touching the rest of the pipeline.  [`AStarSolver`] is the
//! default; [`DijkstraSolver`] is the same search with a zero heuristic.
//!
//! # Determinism
//!
//! The open set is ordered by `(f, insertion sequence)`, so equal-cost
//! candidates are expanded first-in first-out and identical grids always give
//! identical paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use lcr_core::{CancelToken, CellId, Endpoint, EndpointFault, SearchStrategy};
use lcr_surface::CostGrid;

use crate::{SolverError, SolverResult};

// ── CellPath ──────────────────────────────────────────────────────────────────

/// The result of a search: the cells visited in order, from origin to
/// destination inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPath {
    pub cells:      Vec<CellId>,
    /// Accumulated cost of every step (the origin cell itself is free).
    pub total_cost: f64,
    /// Number of cells settled by the search.
    pub expanded:   usize,
}

impl CellPath {
    /// `true` if origin and destination are the same cell.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() <= 1
    }

    /// Sum of step lengths in cells (1 or √2 each).
    pub fn length_in_cells(&self, grid: &CostGrid) -> f64 {
        self.cells
            .windows(2)
            .map(|w| {
                let (r0, c0) = grid.geometry.row_col(w[0]);
                let (r1, c1) = grid.geometry.row_col(w[1]);
                if r0 != r1 && c0 != c1 { std::f64::consts::SQRT_2 } else { 1.0 }
            })
            .sum()
    }
}

// ── PathSolver trait ──────────────────────────────────────────────────────────

/// Pluggable least-cost search.
///
/// Implementations must be `Send + Sync` so one solver can serve concurrent
/// route requests.
pub trait PathSolver: Send + Sync {
    /// Least-cost path from `from` to `to`.
    ///
    /// `from == to` yields a single-cell path of cost zero.  Fails with
    /// `InvalidEndpoint` if either cell is off the grid, outside the AOI, or
    /// impassable, and with `NoPath` if the two are disconnected.
    fn solve(
        &self,
        grid:   &CostGrid,
        from:   CellId,
        to:     CellId,
        cancel: &CancelToken,
    ) -> SolverResult<CellPath>;
}

impl<S: PathSolver + ?Sized> PathSolver for Box<S> {
    fn solve(&self, grid: &CostGrid, from: CellId, to: CellId, cancel: &CancelToken) -> SolverResult<CellPath> {
        (**self).solve(grid, from, to, cancel)
    }
}

/// A* with a straight-line heuristic scaled by the cheapest passable cell
/// cost.  The heuristic never overestimates, so the result is optimal.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarSolver;

impl PathSolver for AStarSolver {
    fn solve(&self, grid: &CostGrid, from: CellId, to: CellId, cancel: &CancelToken) -> SolverResult<CellPath> {
        search(grid, from, to, cancel, true)
    }
}

/// Plain Dijkstra.  Slower than [`AStarSolver`] on large grids; useful as a
/// reference and for small AOIs.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraSolver;

impl PathSolver for DijkstraSolver {
    fn solve(&self, grid: &CostGrid, from: CellId, to: CellId, cancel: &CancelToken) -> SolverResult<CellPath> {
        search(grid, from, to, cancel, false)
    }
}

/// Boxed solver for a configured strategy.
pub fn solver_for(strategy: SearchStrategy) -> Box<dyn PathSolver> {
    match strategy {
        SearchStrategy::AStar    => Box::new(AStarSolver),
        SearchStrategy::Dijkstra => Box::new(DijkstraSolver),
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Open-set entry.  Ordered so `BinaryHeap` pops the smallest `f` first and,
/// among equal `f`, the earliest pushed.
#[derive(Copy, Clone, Debug)]
struct Open {
    f:    f64,
    seq:  u64,
    cell: CellId,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

fn check_endpoint(grid: &CostGrid, endpoint: Endpoint, cell: CellId) -> SolverResult<()> {
    let fault = if cell.index() >= grid.cell_count() {
        EndpointFault::OffGrid
    } else if !grid.in_aoi(cell) {
        EndpointFault::CellOutsideAoi
    } else if !grid.is_passable(cell) {
        EndpointFault::Blocked
    } else {
        return Ok(());
    };
    Err(SolverError::InvalidEndpoint { endpoint, cell, fault })
}

/// A diagonal step from `a` to `b` must not squeeze between two cells that
/// cannot be entered.
#[inline]
fn diagonal_open(grid: &CostGrid, a: CellId, b: CellId) -> bool {
    let (ra, ca) = grid.geometry.row_col(a);
    let (rb, cb) = grid.geometry.row_col(b);
    grid.is_passable(grid.geometry.cell(ra, cb)) && grid.is_passable(grid.geometry.cell(rb, ca))
}

fn search(
    grid:      &CostGrid,
    from:      CellId,
    to:        CellId,
    cancel:    &CancelToken,
    heuristic: bool,
) -> SolverResult<CellPath> {
    check_endpoint(grid, Endpoint::Origin, from)?;
    check_endpoint(grid, Endpoint::Destination, to)?;
    cancel.check()?;

    if from == to {
        return Ok(CellPath { cells: vec![from], total_cost: 0.0, expanded: 0 });
    }

    // Endpoints are passable, so a minimum exists.
    let scale = if heuristic { grid.min_passable_cost().unwrap_or(0.0) } else { 0.0 };
    let (goal_row, goal_col) = grid.geometry.row_col(to);
    let h = |cell: CellId| -> f64 {
        if scale == 0.0 {
            return 0.0;
        }
        let (r, c) = grid.geometry.row_col(cell);
        let dr = r as f64 - goal_row as f64;
        let dc = c as f64 - goal_col as f64;
        (dr * dr + dc * dc).sqrt() * scale
    };

    let n = grid.cell_count();
    // g[v] = best known cost to reach v.
    let mut g      = vec![f64::INFINITY; n];
    // prev[v] = cell that reached v; CellId::INVALID for unreached cells.
    let mut prev   = vec![CellId::INVALID; n];
    let mut closed = vec![false; n];

    let mut seq = 0u64;
    let mut heap = BinaryHeap::new();
    g[from.index()] = 0.0;
    heap.push(Open { f: h(from), seq, cell: from });

    let mut expanded = 0usize;
    while let Some(Open { cell, .. }) = heap.pop() {
        cancel.check()?;

        if closed[cell.index()] {
            continue;
        }
        closed[cell.index()] = true;
        expanded += 1;

        if cell == to {
            let path = reconstruct(&prev, to, g[to.index()], expanded);
            debug!(
                cells = path.cells.len(),
                expanded,
                total_cost = path.total_cost,
                heuristic,
                "path found"
            );
            return Ok(path);
        }

        let base = g[cell.index()];
        for (next, step) in grid.neighbors(cell) {
            if closed[next.index()] || !grid.is_passable(next) {
                continue;
            }
            if step > 1.0 && !diagonal_open(grid, cell, next) {
                continue;
            }
            let candidate = base + grid.cost(next) * step;
            if candidate < g[next.index()] {
                g[next.index()] = candidate;
                prev[next.index()] = cell;
                seq += 1;
                heap.push(Open { f: candidate + h(next), seq, cell: next });
            }
        }
    }

    debug!(expanded, heuristic, "search exhausted without reaching destination");
    Err(SolverError::NoPath { from, to })
}

fn reconstruct(prev: &[CellId], to: CellId, total_cost: f64, expanded: usize) -> CellPath {
    let mut cells = vec![to];
    let mut cur = to;
    loop {
        let p = prev[cur.index()];
        if !p.is_valid() {
            break;
        }
        cells.push(p);
        cur = p;
    }
    cells.reverse();
    CellPath { cells, total_cost, expanded }
}
