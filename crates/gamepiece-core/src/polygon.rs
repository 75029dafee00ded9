//! Integer pixel polygons: bounding boxes and area moments.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel-coordinate polygon (closed unless stated otherwise).
pub type Contour = Vec<Point2<i32>>;

/// Axis-aligned box covering an inclusive pixel extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Integer center `(x + w/2, y + h/2)`.
    #[inline]
    pub fn center(&self) -> Point2<i32> {
        Point2::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Smallest box containing every point; zero box for an empty slice.
pub fn bounding_rect(points: &[Point2<i32>]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Spatial moments `m00`, `m10`, `m01` of the polygon's enclosed area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AreaMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl AreaMoments {
    /// Area centroid, `None` for zero-area polygons.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00.abs() < f64::EPSILON {
            return None;
        }
        Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Green's-theorem moments of a closed polygon. The sign of `m00` follows the
/// vertex winding; the centroid is orientation independent.
pub fn polygon_moments(points: &[Point2<i32>]) -> AreaMoments {
    let n = points.len();
    if n < 3 {
        return AreaMoments::default();
    }
    let mut a = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let c = p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
        a += c;
        cx += (p.x + q.x) as f64 * c;
        cy += (p.y + q.y) as f64 * c;
    }
    AreaMoments {
        m00: a / 2.0,
        m10: cx / 6.0,
        m01: cy / 6.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point2<i32>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn bounding_rect_is_inclusive() {
        let b = bounding_rect(&pts(&[(3, 4), (10, 4), (10, 9)]));
        assert_eq!(b, BoundingBox::new(3, 4, 8, 6));
        assert_eq!(b.center(), Point2::new(7, 7));
        assert_eq!(bounding_rect(&[]), BoundingBox::default());
    }

    #[test]
    fn moments_give_triangle_centroid() {
        let tri = pts(&[(0, 0), (30, 0), (0, 30)]);
        let m = polygon_moments(&tri);
        assert_relative_eq!(m.m00.abs(), 450.0);
        let c = m.centroid().expect("non-degenerate");
        assert_relative_eq!(c.x, 10.0);
        assert_relative_eq!(c.y, 10.0);

        let rev: Vec<_> = tri.iter().rev().copied().collect();
        let c_rev = polygon_moments(&rev).centroid().expect("non-degenerate");
        assert_relative_eq!(c_rev.x, 10.0);
    }

    #[test]
    fn degenerate_polygon_has_no_centroid() {
        let line = pts(&[(0, 0), (5, 0), (10, 0)]);
        assert!(polygon_moments(&line).centroid().is_none());
    }
}
