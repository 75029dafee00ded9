//! Core types and utilities for game-piece localization.
//!
//! This crate is intentionally small: image buffers, integer pixel polygons,
//! camera mount geometry and the result types shared by the detector crates.
//! It does *not* depend on any camera SDK or image codec.

mod camera;
mod image;
mod polygon;
mod target;

pub use camera::{spherical_to_camera, CameraGeometry, PixelAngles};
pub use image::{
    check_frame, ColorImage, ColorImageView, DepthImage, DepthImageView, FrameError, FramePair,
    GrayImage, GrayImageView, Mask,
};
pub use polygon::{bounding_rect, polygon_moments, AreaMoments, BoundingBox, Contour};
pub use target::{Detection, TargetKind, TargetLocation};
