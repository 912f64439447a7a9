//! Planar segment helpers shared by the indexes and the cost-surface builder.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Intersects, Line, Polygon};

/// Squared distance from `p` to the segment `a`–`b`.
#[inline]
pub fn distance_2(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_2 = dx * dx + dy * dy;
    let t = if len_2 > 0.0 {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a[0] + t * dx - p[0], a[1] + t * dy - p[1]);
    cx * cx + cy * cy
}

/// `true` if the segment `a`–`b` touches the closed rectangle `min`–`max`.
///
/// Liang–Barsky clipping: the segment is parameterised as `a + t·(b − a)`
/// and clipped against each slab in turn.
pub fn intersects_rect(a: [f64; 2], b: [f64; 2], min: [f64; 2], max: [f64; 2]) -> bool {
    let d = [b[0] - a[0], b[1] - a[1]];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for axis in 0..2 {
        if d[axis] == 0.0 {
            if a[axis] < min[axis] || a[axis] > max[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d[axis];
        let mut near = (min[axis] - a[axis]) * inv;
        let mut far  = (max[axis] - a[axis]) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t0 = t0.max(near);
        t1 = t1.min(far);
        if t0 > t1 {
            return false;
        }
    }
    true
}

/// `true` if every point of the segment `a`–`b` lies inside or on the
/// boundary of `polygon`, allowing points up to `eps` outside it.
///
/// The segment is cut wherever it meets a ring; each piece then lies wholly
/// inside or wholly outside, so testing its midpoint decides it.
pub fn polygon_covers_segment(polygon: &Polygon<f64>, a: Coord<f64>, b: Coord<f64>, eps: f64) -> bool {
    let rings = || std::iter::once(polygon.exterior()).chain(polygon.interiors()).flat_map(|r| r.lines());
    let near = |p: Coord<f64>| {
        polygon.intersects(&p)
            || rings().any(|edge| distance_2([p.x, p.y], [edge.start.x, edge.start.y], [edge.end.x, edge.end.y]) <= eps * eps)
    };

    let d = b - a;
    let len_2 = d.x * d.x + d.y * d.y;
    if len_2 == 0.0 {
        return near(a);
    }
    let param = |p: Coord<f64>| (((p.x - a.x) * d.x + (p.y - a.y) * d.y) / len_2).clamp(0.0, 1.0);

    let segment = Line::new(a, b);
    let mut cuts = vec![0.0, 1.0];
    for edge in rings() {
        match line_intersection(segment, edge) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => cuts.push(param(intersection)),
            Some(LineIntersection::Collinear { intersection }) => {
                cuts.push(param(intersection.start));
                cuts.push(param(intersection.end));
            }
            None => {}
        }
    }
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    cuts.windows(2).all(|w| {
        let t = 0.5 * (w[0] + w[1]);
        near(Coord { x: a.x + t * d.x, y: a.y + t * d.y })
    })
}
