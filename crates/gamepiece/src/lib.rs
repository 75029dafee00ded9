//! High-level facade crate for the `gamepiece-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core types and the detector crate,
//! - the [`FrameSource`] capability trait with a timeout/cancel wrapper,
//! - (feature `image`) PNG frame loading and a directory playback source.
//!
//! ## Quickstart
//!
//! ```no_run
//! use gamepiece::detect::load_frame;
//! use gamepiece::{TargetDetector, TargetDetectorParams, TargetKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = load_frame("color.png", "depth.png", 0.001)?;
//! let detector = TargetDetector::new(TargetDetectorParams::default());
//!
//! match detector.detect(TargetKind::Cone, &frame)? {
//!     Some(cone) => println!("cone at {:?}", cone.planar()),
//!     None => println!("no cone"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `gamepiece::core`: image buffers, polygons, camera geometry, result types.
//! - `gamepiece::detector`: segmentation, contours, validation, depth sampling.
//! - `gamepiece::source`: frame acquisition.
//! - `gamepiece::detect` (feature `image`): helpers on `image` buffers and PNG files.

pub use gamepiece_core as core;
pub use gamepiece_detect as detector;

pub use gamepiece_core::{
    CameraGeometry, ColorImage, DepthImage, FrameError, FramePair, TargetKind, TargetLocation,
};
pub use gamepiece_detect::{
    detect_cone, detect_cube, detect_pole, DetectError, DetectorConfig, TargetDetector,
    TargetDetectorParams, ThresholdRange,
};

pub mod source;

pub use source::{AcquisitionError, CancelToken, FrameSource, StaticFrameSource, TimedFrameSource};

#[cfg(feature = "image")]
pub mod detect;
