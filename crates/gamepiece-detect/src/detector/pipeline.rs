use gamepiece_core::{
    bounding_rect, check_frame, polygon_moments, CameraGeometry, ColorImageView, DepthImageView,
    Detection, FramePair, TargetKind, TargetLocation,
};
use log::{debug, warn};
use nalgebra::Point2;

use super::{DetectError, TargetDetectorParams};
use crate::color::ThresholdRange;
use crate::contour::find_external_contours;
use crate::depth::{sample_depth, DepthSampleError};
use crate::segment::segment;
use crate::select::{select_largest_area, select_tallest};
use crate::validate::{is_cone, is_cube};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Single-frame cone / cube locator.
///
/// Holds only configuration; every call works on its own buffers, so one
/// detector can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct TargetDetector {
    params: TargetDetectorParams,
}

impl TargetDetector {
    pub fn new(params: TargetDetectorParams) -> Self {
        Self { params }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &TargetDetectorParams {
        &self.params
    }

    /// Locate the best `kind` target in a validated frame.
    ///
    /// Returns `Ok(None)` when nothing of that class is visible.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, frame),
            fields(kind = %kind, width = frame.width(), height = frame.height())
        )
    )]
    pub fn detect(
        &self,
        kind: TargetKind,
        frame: &FramePair,
    ) -> Result<Option<TargetLocation>, DetectError> {
        self.locate(kind, &frame.color(), &frame.depth(), frame.depth_unit())
    }

    /// Same as [`TargetDetector::detect`] on borrowed buffers, checking that
    /// they form a consistent frame first.
    pub fn detect_views(
        &self,
        kind: TargetKind,
        color: &ColorImageView<'_>,
        depth: &DepthImageView<'_>,
        depth_unit: f32,
    ) -> Result<Option<TargetLocation>, DetectError> {
        check_frame(color, depth, depth_unit)?;
        self.locate(kind, color, depth, depth_unit)
    }

    /// Shape-valid candidates of one class, in contour order.
    pub fn candidates(&self, kind: TargetKind, color: &ColorImageView<'_>) -> Vec<Detection> {
        let (range, cleanup) = match kind {
            TargetKind::Cone => (&self.params.cone, None),
            TargetKind::Cube => (&self.params.cube, Some(&self.params.cube_morphology)),
            TargetKind::Pole => return Vec::new(),
        };

        let mask = segment(color, range, &self.params.blur, cleanup);
        let contours = find_external_contours(&mask);
        let total = contours.len();

        let candidates: Vec<Detection> = contours
            .into_iter()
            .filter_map(|contour| {
                let bbox = bounding_rect(&contour);
                let keep = match kind {
                    TargetKind::Cone => is_cone(
                        &contour,
                        &bbox,
                        color.width,
                        color.height,
                        &self.params.cone_shape,
                    ),
                    _ => is_cube(&contour, &bbox),
                };
                keep.then_some(Detection { contour, bbox })
            })
            .collect();

        debug!(
            "{kind}: {} of {total} contours pass shape checks",
            candidates.len()
        );
        candidates
    }

    fn locate(
        &self,
        kind: TargetKind,
        color: &ColorImageView<'_>,
        depth: &DepthImageView<'_>,
        depth_unit: f32,
    ) -> Result<Option<TargetLocation>, DetectError> {
        if kind == TargetKind::Pole {
            return Ok(None);
        }

        let mut candidates = self.candidates(kind, color);
        let best = match kind {
            TargetKind::Cone => select_tallest(&candidates),
            _ => select_largest_area(&candidates),
        };
        let Some(idx) = best else {
            debug!("{kind}: no candidate");
            return Ok(None);
        };
        let detection = candidates.swap_remove(idx);

        let distance = match sample_depth(&detection.contour, depth, depth_unit, &self.params.depth)
        {
            Ok(d) => d,
            Err(DepthSampleError::EmptyRegion { contour_points }) => {
                warn!(
                    "{kind}: {contour_points}-point candidate at {:?} vanished under erosion",
                    detection.bbox
                );
                return Err(DetectError::EmptyRegion {
                    kind,
                    bbox: detection.bbox,
                });
            }
        };

        let center = target_center(kind, &detection);
        let position = self
            .params
            .geometry
            .locate(center, color.width, color.height, distance);
        debug!(
            "{kind}: center ({}, {}), distance {distance:.3}, position ({:.3}, {:.3}, {:.3})",
            center.x, center.y, position.x, position.y, position.z
        );

        Ok(Some(TargetLocation {
            kind,
            position,
            distance,
            center,
            detection,
        }))
    }
}

/// Cones use the silhouette's area centroid, cubes the box center.
fn target_center(kind: TargetKind, det: &Detection) -> Point2<i32> {
    match kind {
        TargetKind::Cone => polygon_moments(&det.contour)
            .centroid()
            .map(|c| Point2::new(c.x as i32, c.y as i32))
            .unwrap_or_else(|| det.bbox.center()),
        _ => det.bbox.center(),
    }
}

/// Locate the tallest valid cone with default pipeline settings.
pub fn detect_cone(
    frame: &FramePair,
    geometry: &CameraGeometry,
    thresholds: &ThresholdRange,
) -> Result<Option<TargetLocation>, DetectError> {
    let params = TargetDetectorParams {
        geometry: *geometry,
        cone: *thresholds,
        ..TargetDetectorParams::default()
    };
    TargetDetector::new(params).detect(TargetKind::Cone, frame)
}

/// Locate the largest cube with default pipeline settings.
pub fn detect_cube(
    frame: &FramePair,
    geometry: &CameraGeometry,
    thresholds: &ThresholdRange,
) -> Result<Option<TargetLocation>, DetectError> {
    let params = TargetDetectorParams {
        geometry: *geometry,
        cube: *thresholds,
        ..TargetDetectorParams::default()
    };
    TargetDetector::new(params).detect(TargetKind::Cube, frame)
}

/// Pole detection is not implemented yet and never finds anything.
pub fn detect_pole(
    _frame: &FramePair,
    _geometry: &CameraGeometry,
) -> Result<Option<TargetLocation>, DetectError> {
    Ok(None)
}
