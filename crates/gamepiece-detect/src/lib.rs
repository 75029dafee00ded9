//! Cone and cube localization from aligned color + depth frames.
//!
//! Current focus:
//! - HSV segmentation with per-class thresholds and cube mask cleanup,
//! - external contour extraction and cone shape checks,
//! - eroded-silhouette depth sampling and projection into the robot frame.
//!
//! Image buffers and camera geometry live in `gamepiece-core`; filtering,
//! morphology, border following and polygon geometry run on `imageproc`.

mod blur;
mod color;
mod contour;
mod convert;
mod depth;
mod detector;
mod io;
mod morphology;
mod raster;
mod segment;
mod select;
mod validate;

pub use blur::{gaussian_blur_rgb, BlurParams};
pub use color::{rgb_to_hsv, threshold_hsv, ThresholdRange};
pub use contour::find_external_contours;
pub use depth::{sample_depth, DepthSampleError, DepthSampleParams};
pub use detector::{
    detect_cone, detect_cube, detect_pole, DetectError, TargetDetector, TargetDetectorParams,
};
pub use io::{
    load_params_file, write_params_file, ConfigError, DetectReport, DetectorConfig,
    DEFAULT_DEPTH_UNIT,
};
pub use morphology::{close, dilate, erode, open, open_close, MorphologyParams};
pub use raster::fill_polygon;
pub use segment::segment;
pub use select::{select_largest_area, select_tallest};
pub use validate::{is_cone, is_cube, ConeShapeParams};

pub use gamepiece_core::{CameraGeometry, FramePair, TargetKind, TargetLocation};
