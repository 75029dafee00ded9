//! Color segmentation: blur, HSV threshold, optional morphological cleanup.

use gamepiece_core::{ColorImageView, Mask};
use log::warn;

use crate::blur::{gaussian_blur_rgb, BlurParams};
use crate::color::{threshold_hsv, ThresholdRange};
use crate::morphology::{open_close, MorphologyParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Segment one target class.
///
/// The frame is smoothed first to suppress sensor speckle. When `cleanup` is
/// given the raw threshold mask is opened and then closed.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(width = img.width, height = img.height))
)]
pub fn segment(
    img: &ColorImageView<'_>,
    range: &ThresholdRange,
    blur: &BlurParams,
    cleanup: Option<&MorphologyParams>,
) -> Mask {
    if range.is_empty() {
        warn!("threshold range {:?} can never match", range.to_array());
    }
    let smoothed = gaussian_blur_rgb(img, blur);
    let mask = threshold_hsv(&smoothed.view(), range);
    match cleanup {
        Some(params) => open_close(&mask, params),
        None => mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepiece_core::ColorImage;

    const YELLOW: [u8; 3] = [240, 210, 20];

    #[test]
    fn black_frame_gives_empty_mask_with_and_without_cleanup() {
        let img = ColorImage::filled(64, 48, [0, 0, 0]);
        let blur = BlurParams::default();
        let raw = segment(&img.view(), &ThresholdRange::CONE, &blur, None);
        assert_eq!(raw.count_nonzero(), 0);
        let cleaned = segment(
            &img.view(),
            &ThresholdRange::CUBE,
            &blur,
            Some(&MorphologyParams::default()),
        );
        assert_eq!(cleaned.count_nonzero(), 0);
    }

    #[test]
    fn filled_frame_gives_full_mask_with_and_without_cleanup() {
        let img = ColorImage::filled(64, 48, YELLOW);
        let blur = BlurParams::default();
        let raw = segment(&img.view(), &ThresholdRange::CONE, &blur, None);
        assert_eq!(raw.count_nonzero(), 64 * 48);
        let cleaned = segment(
            &img.view(),
            &ThresholdRange::CONE,
            &blur,
            Some(&MorphologyParams::default()),
        );
        assert_eq!(cleaned.count_nonzero(), 64 * 48);
    }

    #[test]
    fn cleanup_drops_isolated_pixels() {
        let mut img = ColorImage::filled(64, 48, [0, 0, 0]);
        for y in 10..40 {
            for x in 10..40 {
                img.set_pixel(x, y, YELLOW);
            }
        }
        img.set_pixel(55, 5, YELLOW);
        let blur = BlurParams { ksize: 1, sigma: 1.0 };
        let raw = segment(&img.view(), &ThresholdRange::CONE, &blur, None);
        assert!(raw.is_set(55, 5));
        let cleaned = segment(
            &img.view(),
            &ThresholdRange::CONE,
            &blur,
            Some(&MorphologyParams::default()),
        );
        assert!(!cleaned.is_set(55, 5));
        assert!(cleaned.is_set(25, 25));
    }
}
