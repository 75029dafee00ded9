//! Binary morphology with rectangular structuring elements.
//!
//! A rectangle is the product of a row and a column, so each operation runs
//! as two line passes through `imageproc`'s grayscale morphology. Pixels
//! outside the frame are ignored: erosion never eats inward from the frame
//! border and dilation never grows from it. Even-sized elements anchor at
//! `size / 2`, so an opening or closing with one moves a blob by one pixel
//! toward larger coordinates.

use gamepiece_core::Mask;
use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask as Element};
use serde::{Deserialize, Serialize};

use crate::convert::{gray_image, mask_from_gray};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Erode,
    Dilate,
}

/// Open/close element sizes used to clean a segmentation mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyParams {
    /// Side of the square element for the opening pass (removes specks).
    pub open_size: usize,
    /// Side of the square element for the closing pass (fills gaps).
    pub close_size: usize,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            open_size: 6,
            close_size: 30,
        }
    }
}

/// Largest element side `imageproc` masks can hold with the anchor at `size / 2`.
const MAX_ELEMENT: usize = 511;

/// Horizontal and vertical line elements whose product is a `size x size`
/// rectangle anchored at `size / 2`.
fn line_elements(size: usize) -> (Element, Element) {
    let size = size.min(MAX_ELEMENT);
    let anchor = (size / 2) as u8;
    let row = GrayImage::from_pixel(size as u32, 1, Luma([255]));
    let col = GrayImage::from_pixel(1, size as u32, Luma([255]));
    (
        Element::from_image(&row, anchor, 0),
        Element::from_image(&col, 0, anchor),
    )
}

fn rect_filter(src: &Mask, size: usize, op: Op) -> Mask {
    if size <= 1 || src.width == 0 || src.height == 0 {
        return src.clone();
    }
    let (row, col) = line_elements(size);
    let img = gray_image(src);
    let out = match op {
        Op::Erode => grayscale_erode(&grayscale_erode(&img, &row), &col),
        Op::Dilate => grayscale_dilate(&grayscale_dilate(&img, &row), &col),
    };
    mask_from_gray(out)
}

/// Erode with a `size x size` rectangle, repeated `iterations` times.
pub fn erode(src: &Mask, size: usize, iterations: usize) -> Mask {
    let mut out = src.clone();
    for _ in 0..iterations {
        out = rect_filter(&out, size, Op::Erode);
    }
    out
}

/// Dilate with a `size x size` rectangle, repeated `iterations` times.
pub fn dilate(src: &Mask, size: usize, iterations: usize) -> Mask {
    let mut out = src.clone();
    for _ in 0..iterations {
        out = rect_filter(&out, size, Op::Dilate);
    }
    out
}

/// Erosion followed by dilation.
pub fn open(src: &Mask, size: usize) -> Mask {
    dilate(&erode(src, size, 1), size, 1)
}

/// Dilation followed by erosion.
pub fn close(src: &Mask, size: usize) -> Mask {
    erode(&dilate(src, size, 1), size, 1)
}

/// Opening then closing with the configured element sizes.
pub fn open_close(src: &Mask, params: &MorphologyParams) -> Mask {
    close(&open(src, params.open_size), params.close_size)
}
