//! Conversions between the core buffers and `image`/`imageproc` types.

use gamepiece_core::Mask;
use image::{GrayImage, Luma};
use imageproc::point::Point;
use nalgebra::Point2;

pub(crate) fn gray_image(mask: &Mask) -> GrayImage {
    GrayImage::from_fn(mask.width as u32, mask.height as u32, |x, y| {
        Luma([mask.get(x as usize, y as usize)])
    })
}

pub(crate) fn mask_from_gray(img: GrayImage) -> Mask {
    Mask {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    }
}

#[inline]
pub(crate) fn to_point(p: Point2<i32>) -> Point<i32> {
    Point::new(p.x, p.y)
}

#[inline]
pub(crate) fn from_point(p: Point<i32>) -> Point2<i32> {
    Point2::new(p.x, p.y)
}
