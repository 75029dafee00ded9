use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Contour};

/// Game-piece class handled by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Cone,
    Cube,
    Pole,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TargetKind::Cone => "cone",
            TargetKind::Cube => "cube",
            TargetKind::Pole => "pole",
        })
    }
}

impl std::str::FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cone" => Ok(TargetKind::Cone),
            "cube" => Ok(TargetKind::Cube),
            "pole" => Ok(TargetKind::Pole),
            other => Err(format!("unknown target kind '{other}'")),
        }
    }
}

/// Candidate region: boundary polygon plus its bounding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub contour: Contour,
    pub bbox: BoundingBox,
}

/// Localized target for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetLocation {
    pub kind: TargetKind,
    /// Robot-frame position.
    pub position: Point3<f64>,
    /// Range along the viewing ray, physical units.
    pub distance: f64,
    /// Pixel used as the target center.
    pub center: Point2<i32>,
    pub detection: Detection,
}

impl TargetLocation {
    /// Ground-plane `(x, y)` position.
    #[inline]
    pub fn planar(&self) -> (f64, f64) {
        (self.position.x, self.position.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [TargetKind::Cone, TargetKind::Cube, TargetKind::Pole] {
            assert_eq!(kind.to_string().parse::<TargetKind>(), Ok(kind));
        }
        assert_eq!("CUBE".parse::<TargetKind>(), Ok(TargetKind::Cube));
        assert!("ball".parse::<TargetKind>().is_err());
    }
}
