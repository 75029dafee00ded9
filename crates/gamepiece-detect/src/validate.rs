//! Per-class plausibility checks on extracted contours.

use gamepiece_core::BoundingBox;
use imageproc::geometry::{approximate_polygon_dp, arc_length, convex_hull};
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::convert::to_point;

/// Cone silhouette heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConeShapeParams {
    /// Minimum bounding-box width and height, pixels.
    pub min_size: i32,
    /// Boxes closer than this to the left, right or top frame edge are
    /// treated as cut off. The bottom edge is not checked.
    pub edge_margin: i32,
    /// Polygon tolerance as a fraction of the contour perimeter.
    pub epsilon_frac: f64,
    /// Maximum vertex count of the simplified hull.
    pub max_vertices: usize,
}

impl Default for ConeShapeParams {
    fn default() -> Self {
        Self {
            min_size: 10,
            edge_margin: 2,
            epsilon_frac: 0.03,
            max_vertices: 5,
        }
    }
}

/// Douglas-Peucker on a closed polygon: split at the vertex farthest from the
/// first one and simplify both halves as open chains.
fn simplify_closed(poly: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if poly.len() <= 2 || epsilon <= 0.0 {
        return poly.to_vec();
    }
    let p0 = poly[0];
    let dist2 = |p: &Point<i32>| {
        let (dx, dy) = ((p.x - p0.x) as i64, (p.y - p0.y) as i64);
        dx * dx + dy * dy
    };
    let (far, far_dist2) = poly
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, p)| (i, dist2(p)))
        .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far_dist2 == 0 {
        return vec![p0];
    }

    let mut out = approximate_polygon_dp(&poly[..=far], epsilon, false);
    let mut tail = poly[far..].to_vec();
    tail.push(p0);
    let second = approximate_polygon_dp(&tail, epsilon, false);
    if let Some(inner) = second.get(1..second.len().saturating_sub(1)) {
        out.extend_from_slice(inner);
    }
    out
}

/// Accept a contour as a cone candidate.
///
/// The frame height is unused: a cone cut off by the bottom edge is still
/// accepted.
pub fn is_cone(
    contour: &[Point2<i32>],
    bbox: &BoundingBox,
    frame_width: usize,
    _frame_height: usize,
    params: &ConeShapeParams,
) -> bool {
    if bbox.width < params.min_size || bbox.height < params.min_size {
        return false;
    }

    let w = frame_width as i32;
    let m = params.edge_margin;
    if bbox.x < m || bbox.x + bbox.width > w - m || bbox.y < m {
        return false;
    }

    let points: Vec<Point<i32>> = contour.iter().copied().map(to_point).collect();
    let hull = convex_hull(points.as_slice());
    let eps = params.epsilon_frac * arc_length(&points, true);
    simplify_closed(&hull, eps).len() <= params.max_vertices
}

/// Cubes are not shape-filtered; morphology is the only cleanup they get.
#[inline]
pub fn is_cube(_contour: &[Point2<i32>], _bbox: &BoundingBox) -> bool {
    true
}
