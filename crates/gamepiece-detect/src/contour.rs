//! External boundary extraction from binary masks.
//!
//! Borders come from `imageproc`'s Suzuki-Abe follower: foreground regions are
//! 8-connected, background 4-connected. Only outer borders without a parent
//! are kept, so blobs sitting inside another blob's hole are skipped. Each
//! border is compressed to the vertices where the step direction changes.

use gamepiece_core::{Contour, Mask};
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;

use crate::convert::{from_point, gray_image};

/// Keep only the vertices where the step direction changes.
fn compress(pts: Contour) -> Contour {
    let n = pts.len();
    if n <= 2 {
        return pts;
    }
    let step = |a: Point2<i32>, b: Point2<i32>| (b.x - a.x, b.y - a.y);
    (0..n)
        .filter(|&i| {
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            step(prev, pts[i]) != step(pts[i], next)
        })
        .map(|i| pts[i])
        .collect()
}

/// Outer boundaries of every external region, in raster order of each
/// region's first pixel.
pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
    if mask.width == 0 || mask.height == 0 {
        return Vec::new();
    }
    find_contours::<i32>(&gray_image(mask))
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| compress(c.points.into_iter().map(from_point).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepiece_core::bounding_rect;

    fn fill_rect(m: &mut Mask, x0: usize, y0: usize, rw: usize, rh: usize) {
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                m.set(x, y, 255);
            }
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        assert!(find_external_contours(&Mask::new(16, 16)).is_empty());
    }

    #[test]
    fn rectangle_compresses_to_four_corners() {
        let mut m = Mask::new(20, 20);
        fill_rect(&mut m, 3, 4, 8, 5);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert_eq!(c.len(), 4);
        for corner in [(3, 4), (10, 4), (10, 8), (3, 8)] {
            assert!(c.contains(&Point2::new(corner.0, corner.1)));
        }
        assert_eq!(bounding_rect(c), gamepiece_core::BoundingBox::new(3, 4, 8, 5));
    }

    #[test]
    fn single_pixel_region() {
        let mut m = Mask::new(5, 5);
        m.set(2, 2, 255);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            bounding_rect(&contours[0]),
            gamepiece_core::BoundingBox::new(2, 2, 1, 1)
        );
    }

    #[test]
    fn diagonal_pixels_form_one_region() {
        let mut m = Mask::new(6, 6);
        m.set(1, 1, 255);
        m.set(2, 2, 255);
        m.set(3, 3, 255);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            bounding_rect(&contours[0]),
            gamepiece_core::BoundingBox::new(1, 1, 3, 3)
        );
    }

    #[test]
    fn regions_inside_holes_are_skipped() {
        let mut m = Mask::new(30, 30);
        fill_rect(&mut m, 2, 2, 20, 20);
        for y in 6..18 {
            for x in 6..18 {
                m.set(x, y, 0);
            }
        }
        fill_rect(&mut m, 10, 10, 3, 3);
        fill_rect(&mut m, 25, 25, 3, 3);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 2);
        assert_eq!(
            bounding_rect(&contours[0]),
            gamepiece_core::BoundingBox::new(2, 2, 20, 20)
        );
        assert_eq!(
            bounding_rect(&contours[1]),
            gamepiece_core::BoundingBox::new(25, 25, 3, 3)
        );
    }

    #[test]
    fn region_touching_frame_edge_is_traced() {
        let mut m = Mask::new(10, 10);
        fill_rect(&mut m, 0, 0, 10, 4);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            bounding_rect(&contours[0]),
            gamepiece_core::BoundingBox::new(0, 0, 10, 4)
        );
    }

    #[test]
    fn order_follows_raster_scan() {
        let mut m = Mask::new(40, 20);
        fill_rect(&mut m, 30, 2, 4, 4);
        fill_rect(&mut m, 2, 10, 4, 4);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 2);
        assert_eq!(
            bounding_rect(&contours[0]),
            gamepiece_core::BoundingBox::new(30, 2, 4, 4)
        );
        assert_eq!(
            bounding_rect(&contours[1]),
            gamepiece_core::BoundingBox::new(2, 10, 4, 4)
        );
    }
}
