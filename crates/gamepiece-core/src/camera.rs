//! Camera mount geometry and the pixel + range to robot-frame transform.
//!
//! Robot frame: `x` to the right, `y` forward along the optical axis at zero
//! tilt, `z` up. The camera may be pitched by `elev_angle` and sits at
//! `offset` from the robot origin.

use nalgebra::{Point2, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Fixed per-session camera geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraGeometry {
    /// Horizontal field of view divided by frame width.
    pub deg_per_px_horiz: f64,
    /// Vertical field of view divided by frame height.
    pub deg_per_px_vert: f64,
    /// Camera position relative to the robot origin.
    pub offset: Vector3<f64>,
    /// Mount pitch, radians. Camera-frame vectors are rotated about the
    /// lateral `x` axis by this angle (right-handed) before the offset is
    /// applied. Positive values pitch the optical axis up, so a camera
    /// tilted toward the floor takes a negative angle.
    pub elev_angle: f64,
}

impl Default for CameraGeometry {
    fn default() -> Self {
        Self {
            deg_per_px_horiz: 0.108,
            deg_per_px_vert: 0.089,
            offset: Vector3::zeros(),
            elev_angle: 0.0,
        }
    }
}

/// Angular offset of a pixel from the optical center, radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelAngles {
    pub azimuth: f64,
    pub elevation: f64,
}

impl CameraGeometry {
    /// Convert a pixel center into azimuth / elevation from the image center.
    ///
    /// Offsets use integer frame halves; rows grow downward so the vertical
    /// offset is flipped to make "up" positive.
    pub fn pixel_angles(&self, center: Point2<i32>, width: usize, height: usize) -> PixelAngles {
        let dx = (center.x as i64 - (width / 2) as i64) as f64;
        let dy = ((height / 2) as i64 - center.y as i64) as f64;
        PixelAngles {
            azimuth: (dx * self.deg_per_px_horiz).to_radians(),
            elevation: (dy * self.deg_per_px_vert).to_radians(),
        }
    }

    fn tilt(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.elev_angle)
    }

    /// Apply the mount tilt and offset to a camera-frame point.
    pub fn camera_to_robot(&self, p: &Point3<f64>) -> Point3<f64> {
        self.tilt() * *p + self.offset
    }

    /// Inverse of [`CameraGeometry::camera_to_robot`].
    pub fn robot_to_camera(&self, p: &Point3<f64>) -> Point3<f64> {
        self.tilt().inverse() * (*p - self.offset)
    }

    /// Full transform: pixel center + measured range to a robot-frame position.
    pub fn locate(
        &self,
        center: Point2<i32>,
        width: usize,
        height: usize,
        distance: f64,
    ) -> Point3<f64> {
        let angles = self.pixel_angles(center, width, height);
        let cam = spherical_to_camera(distance, angles);
        self.camera_to_robot(&cam)
    }
}

/// Spherical (range, azimuth, elevation) to camera-frame Cartesian.
pub fn spherical_to_camera(distance: f64, angles: PixelAngles) -> Point3<f64> {
    let (sin_az, cos_az) = angles.azimuth.sin_cos();
    let (sin_el, cos_el) = angles.elevation.sin_cos();
    Point3::new(
        distance * cos_el * sin_az,
        distance * cos_el * cos_az,
        distance * sin_el,
    )
}
