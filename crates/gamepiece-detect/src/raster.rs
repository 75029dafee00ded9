//! Polygon rasterization into masks.

use gamepiece_core::Mask;
use image::Luma;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use nalgebra::Point2;

use crate::convert::{gray_image, mask_from_gray, to_point};

const SET: Luma<u8> = Luma([255]);

/// Fill a closed polygon (interior and boundary) with 255.
///
/// Consecutive duplicate vertices and a repeated closing vertex are dropped
/// first. One- and two-vertex polygons mark the point or segment they span.
pub fn fill_polygon(mask: &mut Mask, poly: &[Point2<i32>]) {
    let mut pts: Vec<Point<i32>> = poly.iter().copied().map(to_point).collect();
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }

    if pts.is_empty() {
        return;
    }

    let mut canvas = gray_image(mask);
    match pts.as_slice() {
        [p] => {
            let at = (p.x as f32, p.y as f32);
            draw_line_segment_mut(&mut canvas, at, at, SET);
        }
        [a, b] => {
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                SET,
            );
        }
        _ => draw_polygon_mut(&mut canvas, &pts, SET),
    }
    *mask = mask_from_gray(canvas);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point2<i32>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn rectangle_fill_is_inclusive() {
        let mut m = Mask::new(20, 20);
        fill_polygon(&mut m, &pts(&[(2, 3), (9, 3), (9, 7), (2, 7)]));
        assert_eq!(m.count_nonzero(), 8 * 5);
        assert!(m.is_set(2, 3) && m.is_set(9, 7));
        assert!(!m.is_set(10, 7));
    }

    #[test]
    fn triangle_fill_covers_interior() {
        let mut m = Mask::new(50, 50);
        fill_polygon(&mut m, &pts(&[(10, 40), (40, 40), (25, 10)]));
        assert!(m.is_set(25, 30));
        assert!(m.is_set(25, 10));
        assert!(!m.is_set(12, 12));
        let area = m.count_nonzero();
        assert!((450..=560).contains(&area), "area {area}");
    }

    #[test]
    fn clipped_polygon_stays_in_bounds() {
        let mut m = Mask::new(10, 10);
        fill_polygon(&mut m, &pts(&[(-5, -5), (20, -5), (20, 20), (-5, 20)]));
        assert_eq!(m.count_nonzero(), 100);
    }

    #[test]
    fn two_point_polygon_draws_segment() {
        let mut m = Mask::new(10, 10);
        fill_polygon(&mut m, &pts(&[(1, 1), (5, 1)]));
        assert_eq!(m.count_nonzero(), 5);
    }

    #[test]
    fn repeated_closing_vertex_is_ignored() {
        let mut open = Mask::new(20, 20);
        fill_polygon(&mut open, &pts(&[(2, 3), (9, 3), (9, 7), (2, 7)]));
        let mut closed = Mask::new(20, 20);
        fill_polygon(
            &mut closed,
            &pts(&[(2, 3), (9, 3), (9, 3), (9, 7), (2, 7), (2, 3)]),
        );
        assert_eq!(closed, open);

        let mut single = Mask::new(5, 5);
        fill_polygon(&mut single, &pts(&[(2, 2), (2, 2)]));
        assert_eq!(single.count_nonzero(), 1);
    }
}
