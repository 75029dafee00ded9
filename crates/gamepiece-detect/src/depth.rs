//! Range estimation under a detected silhouette.

use gamepiece_core::{DepthImageView, Mask};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::morphology::erode;
use crate::raster::fill_polygon;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DepthSampleError {
    #[error("no depth pixels survive erosion of a {contour_points}-point silhouette")]
    EmptyRegion { contour_points: usize },
}

/// How the silhouette is shrunk before averaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthSampleParams {
    /// Side of the square erosion element.
    pub kernel_size: usize,
    pub iterations: usize,
    /// Exclude raw zero readings (no return) from the mean.
    pub skip_invalid: bool,
}

impl Default for DepthSampleParams {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            iterations: 3,
            skip_invalid: false,
        }
    }
}

/// Mean depth under the eroded silhouette of `contour`, in physical units.
///
/// Erosion pulls the sample away from the object's edges, where depth
/// readings mix foreground and background.
pub fn sample_depth(
    contour: &[Point2<i32>],
    depth: &DepthImageView<'_>,
    depth_unit: f32,
    params: &DepthSampleParams,
) -> Result<f64, DepthSampleError> {
    let mut mask = Mask::new(depth.width, depth.height);
    fill_polygon(&mut mask, contour);
    let mask = erode(&mask, params.kernel_size, params.iterations);

    let mut sum = 0u64;
    let mut count = 0u64;
    for (&m, &d) in mask.data.iter().zip(depth.data) {
        if m == 0 || (params.skip_invalid && d == 0) {
            continue;
        }
        sum += d as u64;
        count += 1;
    }

    if count == 0 {
        return Err(DepthSampleError::EmptyRegion {
            contour_points: contour.len(),
        });
    }

    let mean = sum as f64 / count as f64;
    debug!("depth sample: {count} px, mean raw {mean:.1}");
    Ok(mean * depth_unit as f64)
}
