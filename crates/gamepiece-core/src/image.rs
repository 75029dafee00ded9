//! Lightweight owned/borrowed image buffers shared across the workspace.
//!
//! All buffers are row-major with no padding between rows. Color images are
//! interleaved RGB8, depth images carry raw sensor counts.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("invalid {kind} buffer length (expected {expected}, got {got})")]
    InvalidBuffer {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    #[error(
        "color and depth dimensions differ (color {color_width}x{color_height}, depth {depth_width}x{depth_height})"
    )]
    DimensionMismatch {
        color_width: usize,
        color_height: usize,
        depth_width: usize,
        depth_height: usize,
    },
    #[error("invalid depth unit {0}")]
    InvalidDepthUnit(f32),
}

fn check_len(kind: &'static str, expected: usize, got: usize) -> Result<(), FrameError> {
    if expected != got {
        return Err(FrameError::InvalidBuffer {
            kind,
            expected,
            got,
        });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Single-channel 8-bit image. Binary masks use 0 / 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Binary mask: set pixels are `255`, cleared pixels `0`.
pub type Mask = GrayImage;

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FrameError> {
        check_len("gray", width * height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Number of non-zero pixels.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ColorImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major RGB, len = w*h*3
}

impl ColorImageView<'_> {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Interleaved RGB8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl ColorImage {
    /// Image filled with one color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FrameError> {
        check_len("color", width * height * 3, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> ColorImageView<'_> {
        ColorImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DepthImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u16], // row-major raw counts, len = w*h
}

/// Raw 16-bit depth image, values in sensor counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
}

impl DepthImage {
    pub fn filled(width: usize, height: usize, value: u16) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u16>) -> Result<Self, FrameError> {
        check_len("depth", width * height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> DepthImageView<'_> {
        DepthImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u16) {
        self.data[y * self.width + x] = v;
    }
}

/// Check that borrowed color and depth views can form one co-registered frame.
pub fn check_frame(
    color: &ColorImageView<'_>,
    depth: &DepthImageView<'_>,
    depth_unit: f32,
) -> Result<(), FrameError> {
    if color.width != depth.width || color.height != depth.height {
        return Err(FrameError::DimensionMismatch {
            color_width: color.width,
            color_height: color.height,
            depth_width: depth.width,
            depth_height: depth.height,
        });
    }
    check_len("color", color.width * color.height * 3, color.data.len())?;
    check_len("depth", depth.width * depth.height, depth.data.len())?;
    if !depth_unit.is_finite() || depth_unit <= 0.0 {
        return Err(FrameError::InvalidDepthUnit(depth_unit));
    }
    Ok(())
}

/// One aligned color + depth acquisition.
///
/// Pixel `(x, y)` in `depth` observes the same ray as `(x, y)` in `color`;
/// `depth_unit` converts raw depth counts into physical distance.
#[derive(Clone, Debug)]
pub struct FramePair {
    color: ColorImage,
    depth: DepthImage,
    depth_unit: f32,
}

impl FramePair {
    pub fn new(color: ColorImage, depth: DepthImage, depth_unit: f32) -> Result<Self, FrameError> {
        check_frame(&color.view(), &depth.view(), depth_unit)?;
        Ok(Self {
            color,
            depth,
            depth_unit,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.color.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.color.height
    }

    #[inline]
    pub fn color(&self) -> ColorImageView<'_> {
        self.color.view()
    }

    #[inline]
    pub fn depth(&self) -> DepthImageView<'_> {
        self.depth.view()
    }

    #[inline]
    pub fn depth_unit(&self) -> f32 {
        self.depth_unit
    }

    pub fn into_parts(self) -> (ColorImage, DepthImage, f32) {
        (self.color, self.depth, self.depth_unit)
    }
}
