//! End-to-end helpers on `image` buffers and PNG files.
//!
//! Depth frames are stored as 16-bit grayscale PNGs holding raw sensor
//! counts; color frames as 8-bit RGB.

use std::fs;
use std::path::{Path, PathBuf};

use gamepiece_core::{ColorImage, ColorImageView, DepthImage, FrameError, FramePair};
use gamepiece_detect::{DetectError, TargetDetector, TargetKind, TargetLocation};
use image::{DynamicImage, ImageBuffer, Luma, RgbImage};
use log::debug;

use crate::source::{AcquisitionError, FrameSource};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Raw 16-bit depth image as produced by most depth cameras.
pub type Depth16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Errors from the file-based helpers.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Detect(#[from] DetectError),
}

/// Borrow an `image::RgbImage` as a core color view.
pub fn color_view(img: &RgbImage) -> ColorImageView<'_> {
    ColorImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

pub fn color_image(img: &RgbImage) -> ColorImage {
    ColorImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

pub fn depth_image(img: &Depth16Image) -> DepthImage {
    DepthImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

fn load_depth(path: &Path) -> Result<Depth16Image, AcquisitionError> {
    match image::open(path)? {
        DynamicImage::ImageLuma16(img) => Ok(img),
        other => Err(AcquisitionError::InvalidFile {
            path: path.to_path_buf(),
            reason: format!("depth must be 16-bit grayscale, got {:?}", other.color()),
        }),
    }
}

/// Read one color + depth PNG pair into a validated frame.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn load_frame(
    color_path: impl AsRef<Path>,
    depth_path: impl AsRef<Path>,
    depth_unit: f32,
) -> Result<FramePair, AcquisitionError> {
    let color = image::open(color_path.as_ref())?.to_rgb8();
    let depth = load_depth(depth_path.as_ref())?;
    Ok(FramePair::new(
        color_image(&color),
        depth_image(&depth),
        depth_unit,
    )?)
}

/// Write a frame as `color` (RGB8 PNG) and `depth` (16-bit PNG).
pub fn save_frame(
    frame: &FramePair,
    color_path: impl AsRef<Path>,
    depth_path: impl AsRef<Path>,
) -> Result<(), AcquisitionError> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let color = frame.color();
    let rgb = RgbImage::from_raw(w, h, color.data.to_vec()).ok_or(FrameError::InvalidBuffer {
        kind: "color",
        expected: (w * h * 3) as usize,
        got: color.data.len(),
    })?;
    let depth = frame.depth();
    let d16 = Depth16Image::from_raw(w, h, depth.data.to_vec()).ok_or(
        FrameError::InvalidBuffer {
            kind: "depth",
            expected: (w * h) as usize,
            got: depth.data.len(),
        },
    )?;
    rgb.save(color_path)?;
    d16.save(depth_path)?;
    Ok(())
}

/// Load a PNG pair and run the detector on it.
pub fn detect_in_files(
    detector: &TargetDetector,
    kind: TargetKind,
    color_path: impl AsRef<Path>,
    depth_path: impl AsRef<Path>,
    depth_unit: f32,
) -> Result<Option<TargetLocation>, PipelineError> {
    let frame = load_frame(color_path, depth_path, depth_unit)?;
    Ok(detector.detect(kind, &frame)?)
}

/// Plays back `color_<name>.png` / `depth_<name>.png` pairs from a directory
/// in name order, then reports [`AcquisitionError::Disconnected`].
#[derive(Clone, Debug)]
pub struct ImageDirSource {
    pairs: Vec<(PathBuf, PathBuf)>,
    depth_unit: f32,
    next: usize,
}

impl ImageDirSource {
    pub fn open(dir: impl AsRef<Path>, depth_unit: f32) -> Result<Self, AcquisitionError> {
        let dir = dir.as_ref();
        let mut color_files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("color_") && n.ends_with(".png"))
            })
            .collect();
        color_files.sort();

        let mut pairs = Vec::with_capacity(color_files.len());
        for color in color_files {
            let suffix = color
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .trim_start_matches("color_")
                .to_owned();
            let depth = dir.join(format!("depth_{suffix}"));
            if !depth.is_file() {
                return Err(AcquisitionError::InvalidFile {
                    path: color,
                    reason: format!("no matching depth_{suffix}"),
                });
            }
            pairs.push((color, depth));
        }

        if pairs.is_empty() {
            return Err(AcquisitionError::Unavailable(format!(
                "no color_*.png frames in {}",
                dir.display()
            )));
        }
        debug!("{} frame pairs in {}", pairs.len(), dir.display());

        Ok(Self {
            pairs,
            depth_unit,
            next: 0,
        })
    }

    pub fn pairs(&self) -> &[(PathBuf, PathBuf)] {
        &self.pairs
    }
}

impl FrameSource for ImageDirSource {
    fn acquire(&mut self) -> Result<FramePair, AcquisitionError> {
        let Some((color, depth)) = self.pairs.get(self.next) else {
            return Err(AcquisitionError::Disconnected);
        };
        self.next += 1;
        load_frame(color, depth, self.depth_unit)
    }
}
