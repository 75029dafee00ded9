//! HSV conversion and inclusive range thresholding.
//!
//! HSV values follow the 8-bit convention used by most tuning tools:
//! hue in `0..180` (degrees / 2), saturation and value in `0..=255`.

use gamepiece_core::{ColorImageView, Mask};
use serde::{Deserialize, Serialize};

/// Inclusive HSV window for one target class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub hue_min: u8,
    pub hue_max: u8,
    pub sat_min: u8,
    pub sat_max: u8,
    pub val_min: u8,
    pub val_max: u8,
}

impl ThresholdRange {
    /// Yellow cone window.
    pub const CONE: Self = Self {
        hue_min: 15,
        hue_max: 35,
        sat_min: 100,
        sat_max: 255,
        val_min: 100,
        val_max: 255,
    };

    /// Purple cube window.
    pub const CUBE: Self = Self {
        hue_min: 115,
        hue_max: 150,
        sat_min: 60,
        sat_max: 255,
        val_min: 60,
        val_max: 255,
    };

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        let [h, s, v] = hsv;
        (self.hue_min..=self.hue_max).contains(&h)
            && (self.sat_min..=self.sat_max).contains(&s)
            && (self.val_min..=self.val_max).contains(&v)
    }

    /// True when some `min > max`, i.e. nothing can ever match.
    pub fn is_empty(&self) -> bool {
        self.hue_min > self.hue_max || self.sat_min > self.sat_max || self.val_min > self.val_max
    }

    /// Values in `hue_min, hue_max, sat_min, sat_max, val_min, val_max` order.
    pub fn to_array(&self) -> [u8; 6] {
        [
            self.hue_min,
            self.hue_max,
            self.sat_min,
            self.sat_max,
            self.val_min,
            self.val_max,
        ]
    }

    pub fn from_array(v: [u8; 6]) -> Self {
        Self {
            hue_min: v[0],
            hue_max: v[1],
            sat_min: v[2],
            sat_max: v[3],
            val_min: v[4],
            val_max: v[5],
        }
    }
}

/// Convert one RGB8 pixel to 8-bit HSV.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max > 0.0 { 255.0 * diff / max } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let mut h8 = (h / 2.0).round() as u16;
    if h8 >= 180 {
        h8 -= 180;
    }
    [h8 as u8, s.round() as u8, max as u8]
}

/// Binary mask of pixels whose HSV value lies inside `range` (inclusive).
pub fn threshold_hsv(img: &ColorImageView<'_>, range: &ThresholdRange) -> Mask {
    let mut mask = Mask::new(img.width, img.height);
    for (dst, px) in mask.data.iter_mut().zip(img.data.chunks_exact(3)) {
        if range.contains(rgb_to_hsv([px[0], px[1], px[2]])) {
            *dst = 255;
        }
    }
    mask
}
