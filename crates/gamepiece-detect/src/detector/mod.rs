//! Full per-frame pipeline.
//!
//! Segment one class, extract external contours, keep the shape-valid
//! candidates, pick the best one, sample its depth and project it into the
//! robot frame.

mod error;
mod params;
mod pipeline;

pub use error::DetectError;
pub use params::TargetDetectorParams;
pub use pipeline::{detect_cone, detect_cube, detect_pole, TargetDetector};
