//! Grid-constrained polyline simplification.
//!
//! A Douglas–Peucker pass over the raw cell-centre staircase that only
//! accepts a shortcut when the AOI outline covers it and every grid cell it
//! passes through is passable.  Touching a cell edge or corner does not
//! count as entering it.

use geo::{Coord, Intersects, Line};

use lcr_spatial::segment::{distance_2, intersects_rect, polygon_covers_segment};
use lcr_surface::CostGrid;

/// `true` if the straight segment `a`–`b` stays on the grid, inside the
/// grid's AOI outline, and enters no impassable cell.
pub fn segment_clear(grid: &CostGrid, a: Coord<f64>, b: Coord<f64>) -> bool {
    let geometry = &grid.geometry;
    if geometry.locate(a).is_none() || geometry.locate(b).is_none() {
        return false;
    }

    let res = geometry.resolution_m;
    if grid.aoi().is_some_and(|aoi| !polygon_covers_segment(aoi, a, b, res * 1e-6)) {
        return false;
    }

    let eps = res * 1e-9;
    let last_row = geometry.rows - 1;
    let last_col = geometry.cols - 1;
    let row_of = |y: f64| (((y - geometry.min.y) / res).floor().max(0.0) as u32).min(last_row);
    let col_of = |x: f64| (((x - geometry.min.x) / res).floor().max(0.0) as u32).min(last_col);

    let (pa, pb) = ([a.x, a.y], [b.x, b.y]);
    let (y_lo, y_hi) = (a.y.min(b.y), a.y.max(b.y));
    let dy = b.y - a.y;

    for row in row_of(y_lo).saturating_sub(1)..=(row_of(y_hi) + 1).min(last_row) {
        // x extent of the segment within this row's slab
        let slab_lo = (geometry.min.y + row as f64 * res).max(y_lo);
        let slab_hi = (geometry.min.y + (row + 1) as f64 * res).min(y_hi);
        let (x_lo, x_hi) = if dy != 0.0 && slab_lo <= slab_hi {
            let x_at = |y: f64| a.x + (y - a.y) * (b.x - a.x) / dy;
            let (p, q) = (x_at(slab_lo), x_at(slab_hi));
            (p.min(q), p.max(q))
        } else {
            (a.x.min(b.x), a.x.max(b.x))
        };

        for col in col_of(x_lo).saturating_sub(1)..=(col_of(x_hi) + 1).min(last_col) {
            let cell = geometry.cell(row, col);
            if grid.is_passable(cell) {
                continue;
            }
            let (min, max) = geometry.cell_bounds(cell);
            let inner_min = [min[0] + eps, min[1] + eps];
            let inner_max = [max[0] - eps, max[1] - eps];
            if intersects_rect(pa, pb, inner_min, inner_max) {
                return false;
            }
        }
    }
    true
}

/// Douglas–Peucker with perpendicular tolerance `tolerance_m`, refusing any
/// shortcut that [`segment_clear`] rejects.  First and last points are
/// always kept.
pub fn simplify(grid: &CostGrid, points: &[Coord<f64>], tolerance_m: f64) -> Vec<Coord<f64>> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let tol_2 = tolerance_m * tolerance_m;
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((i, j)) = stack.pop() {
        if j <= i + 1 {
            continue;
        }
        let (a, b) = ([points[i].x, points[i].y], [points[j].x, points[j].y]);
        let (k, d_2) = (i + 1..j)
            .map(|k| (k, distance_2([points[k].x, points[k].y], a, b)))
            .fold((i + 1, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best });

        if d_2 <= tol_2 && segment_clear(grid, points[i], points[j]) {
            continue;
        }
        keep[k] = true;
        stack.push((k, j));
        stack.push((i, k));
    }

    points.iter().zip(keep).filter_map(|(&p, k)| k.then_some(p)).collect()
}

/// `true` if any two non-adjacent segments of the polyline touch.
/// Zero-length segments are ignored.
pub fn self_intersects(points: &[Coord<f64>]) -> bool {
    let lines: Vec<Line<f64>> = points
        .windows(2)
        .map(|w| Line::new(w[0], w[1]))
        .filter(|l| l.start != l.end)
        .collect();
    for i in 0..lines.len() {
        for j in (i + 2)..lines.len() {
            if lines[i].intersects(&lines[j]) {
                return true;
            }
        }
    }
    false
}

