use gamepiece_core::CameraGeometry;
use serde::{Deserialize, Serialize};

use crate::blur::BlurParams;
use crate::color::ThresholdRange;
use crate::depth::DepthSampleParams;
use crate::morphology::MorphologyParams;
use crate::validate::ConeShapeParams;

/// Configuration for [`TargetDetector`](super::TargetDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetDetectorParams {
    /// Camera mount geometry used to project detections.
    pub geometry: CameraGeometry,
    /// HSV window for cones.
    pub cone: ThresholdRange,
    /// HSV window for cubes.
    pub cube: ThresholdRange,
    /// Pre-threshold smoothing.
    pub blur: BlurParams,
    pub cone_shape: ConeShapeParams,
    /// Open/close applied to cube masks only.
    pub cube_morphology: MorphologyParams,
    pub depth: DepthSampleParams,
}

impl Default for TargetDetectorParams {
    fn default() -> Self {
        Self {
            geometry: CameraGeometry::default(),
            cone: ThresholdRange::CONE,
            cube: ThresholdRange::CUBE,
            blur: BlurParams::default(),
            cone_shape: ConeShapeParams::default(),
            cube_morphology: MorphologyParams::default(),
            depth: DepthSampleParams::default(),
        }
    }
}

impl TargetDetectorParams {
    /// Defaults with a specific mount geometry.
    pub fn with_geometry(geometry: CameraGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "cone": { "hue_min": 10, "hue_max": 40, "sat_min": 90,
            "sat_max": 255, "val_min": 90, "val_max": 255 },
            "geometry": { "elev_angle": 0.2 } }"#;
        let p: TargetDetectorParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.cone.hue_min, 10);
        assert_eq!(p.cube, ThresholdRange::CUBE);
        assert_eq!(p.geometry.elev_angle, 0.2);
        assert_eq!(p.geometry.deg_per_px_horiz, 0.108);
        assert_eq!(p.depth, DepthSampleParams::default());
    }
}
