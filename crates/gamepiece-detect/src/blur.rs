//! Gaussian smoothing for interleaved RGB8 frames.

use gamepiece_core::{ColorImage, ColorImageView};
use image::{Rgb, Rgb32FImage};
use imageproc::filter::separable_filter_equal;
use serde::{Deserialize, Serialize};

/// Gaussian pre-filter settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlurParams {
    /// Kernel side length in pixels (odd). `0` or `1` disables blurring.
    pub ksize: usize,
    pub sigma: f32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            ksize: 17,
            sigma: 1.2,
        }
    }
}

fn gaussian_kernel(ksize: usize, sigma: f32) -> Vec<f32> {
    let half = (ksize / 2) as f32;
    let two_s2 = 2.0 * sigma * sigma;
    let mut k: Vec<f32> = (0..ksize)
        .map(|i| {
            let d = i as f32 - half;
            (-d * d / two_s2).exp()
        })
        .collect();
    let sum: f32 = k.iter().sum();
    for w in &mut k {
        *w /= sum;
    }
    k
}

/// Blur an RGB8 image with a normalized Gaussian kernel.
///
/// Both passes accumulate in `f32` and the result is rounded back to `u8`.
/// Pixels beyond the frame edge repeat the edge pixel.
pub fn gaussian_blur_rgb(src: &ColorImageView<'_>, params: &BlurParams) -> ColorImage {
    let (w, h) = (src.width, src.height);
    if params.ksize <= 1 || params.sigma <= 0.0 || w == 0 || h == 0 {
        return ColorImage {
            width: w,
            height: h,
            data: src.data.to_vec(),
        };
    }

    let f = Rgb32FImage::from_fn(w as u32, h as u32, |x, y| {
        Rgb(src.pixel(x as usize, y as usize).map(f32::from))
    });
    let kernel = gaussian_kernel(params.ksize, params.sigma);
    let blurred = separable_filter_equal(&f, &kernel);

    ColorImage {
        width: w,
        height: h,
        data: blurred
            .into_raw()
            .into_iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(17, 1.2);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..8 {
            assert!((k[i] - k[16 - i]).abs() < 1e-7);
        }
        assert!(k[8] > k[7]);
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let img = ColorImage::filled(20, 12, [37, 180, 251]);
        let out = gaussian_blur_rgb(&img.view(), &BlurParams::default());
        assert_eq!(out, img);
    }

    #[test]
    fn single_bright_pixel_spreads_to_neighbours() {
        let mut img = ColorImage::filled(21, 21, [0, 0, 0]);
        img.set_pixel(10, 10, [255, 255, 255]);
        let out = gaussian_blur_rgb(&img.view(), &BlurParams::default());
        let v = out.view();
        assert!(v.pixel(10, 10)[0] < 255);
        assert!(v.pixel(11, 10)[0] > 0);
        assert_eq!(v.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn disabled_blur_copies_input() {
        let mut img = ColorImage::filled(4, 4, [1, 2, 3]);
        img.set_pixel(1, 1, [200, 0, 0]);
        let out = gaussian_blur_rgb(
            &img.view(),
            &BlurParams {
                ksize: 1,
                sigma: 1.2,
            },
        );
        assert_eq!(out, img);
    }
}
