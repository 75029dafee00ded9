//! JSON configuration, detection reports and legacy threshold files.

use crate::{DetectError, TargetDetectorParams, ThresholdRange};
use gamepiece_core::{TargetKind, TargetLocation};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("threshold params line {line}: {reason}")]
    ParamsText { line: usize, reason: String },
}

/// Raw depth counts to meters for the usual 1 mm sensors.
pub const DEFAULT_DEPTH_UNIT: f32 = 0.001;

/// Detector configuration as stored on disk.
///
/// All [`TargetDetectorParams`] fields sit at the top level. Threshold
/// windows may instead come from the six-line text files written by the
/// tuning tool; those override the inline `cone` / `cube` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(flatten)]
    pub params: TargetDetectorParams,
    #[serde(default)]
    pub depth_unit: Option<f32>,
    #[serde(default)]
    pub cone_params_file: Option<String>,
    #[serde(default)]
    pub cube_params_file: Option<String>,
}

impl DetectorConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Depth unit to use when the frame source does not provide one.
    pub fn depth_unit(&self) -> f32 {
        self.depth_unit.unwrap_or(DEFAULT_DEPTH_UNIT)
    }

    /// Build detector parameters, applying threshold file overrides.
    pub fn build_params(&self) -> Result<TargetDetectorParams, ConfigError> {
        let mut params = self.params.clone();
        if let Some(path) = self.cone_params_file.as_deref() {
            params.cone = load_params_file(path)?;
        }
        if let Some(path) = self.cube_params_file.as_deref() {
            params.cube = load_params_file(path)?;
        }
        Ok(params)
    }
}

impl ThresholdRange {
    /// Parse the legacy format: one integer per line, in
    /// `hue_min, hue_max, sat_min, sat_max, val_min, val_max` order.
    /// Lines after the sixth are ignored.
    pub fn from_params_text(text: &str) -> Result<Self, ConfigError> {
        let mut values = [0u8; 6];
        let mut lines = text.lines();
        for (i, slot) in values.iter_mut().enumerate() {
            let line = i + 1;
            let raw = lines.next().map(str::trim).unwrap_or("");
            if raw.is_empty() {
                return Err(ConfigError::ParamsText {
                    line,
                    reason: "missing value".to_string(),
                });
            }
            let v: u16 = raw.parse().map_err(|e| ConfigError::ParamsText {
                line,
                reason: format!("'{raw}': {e}"),
            })?;
            *slot = u8::try_from(v).map_err(|_| ConfigError::ParamsText {
                line,
                reason: format!("{v} is above 255"),
            })?;
        }
        Ok(Self::from_array(values))
    }

    /// Render in the legacy six-line format.
    pub fn to_params_text(&self) -> String {
        self.to_array()
            .iter()
            .map(|v| format!("{v}\n"))
            .collect()
    }
}

/// Read a `*-params.txt` threshold file.
pub fn load_params_file(path: impl AsRef<Path>) -> Result<ThresholdRange, ConfigError> {
    let raw = fs::read_to_string(path)?;
    ThresholdRange::from_params_text(&raw)
}

/// Write a `*-params.txt` threshold file.
pub fn write_params_file(path: impl AsRef<Path>, range: &ThresholdRange) -> Result<(), ConfigError> {
    fs::write(path, range.to_params_text())?;
    Ok(())
}

/// Per-frame detection outcome in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectReport {
    pub target: TargetKind,
    #[serde(default)]
    pub frame: Option<u64>,
    #[serde(default)]
    pub color_path: Option<String>,
    #[serde(default)]
    pub depth_path: Option<String>,
    pub location: Option<TargetLocation>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DetectReport {
    pub fn new(target: TargetKind) -> Self {
        Self {
            target,
            frame: None,
            color_path: None,
            depth_path: None,
            location: None,
            error: None,
        }
    }

    /// Record the detector's answer for this frame.
    pub fn set_result(&mut self, res: Result<Option<TargetLocation>, DetectError>) {
        match res {
            Ok(location) => {
                self.location = location;
                self.error = None;
            }
            Err(err) => {
                self.location = None;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepiece_core::{BoundingBox, Detection};
    use nalgebra::{Point2, Point3};

    #[test]
    fn params_text_matches_tuning_tool_output() {
        let r = ThresholdRange::from_params_text("15\n35\n100\n255\n100\n255\n").unwrap();
        assert_eq!(r, ThresholdRange::CONE);
        assert_eq!(ThresholdRange::CUBE.to_params_text(), "115\n150\n60\n255\n60\n255\n");
    }

    #[test]
    fn params_text_tolerates_whitespace_and_trailing_lines() {
        let r = ThresholdRange::from_params_text(" 115 \r\n150\n60\n255\n60\n255\nextra\n").unwrap();
        assert_eq!(r, ThresholdRange::CUBE);
    }

    #[test]
    fn params_text_errors_name_the_line() {
        let err = ThresholdRange::from_params_text("15\n35\n100\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParamsText { line: 4, .. }));

        let err = ThresholdRange::from_params_text("15\n35\nabc\n255\n100\n255").unwrap_err();
        assert!(matches!(err, ConfigError::ParamsText { line: 3, .. }));

        let err = ThresholdRange::from_params_text("15\n35\n100\n300\n100\n255").unwrap_err();
        assert!(matches!(err, ConfigError::ParamsText { line: 4, .. }));
    }

    #[test]
    fn config_round_trips_and_applies_params_files() {
        let dir = tempfile::tempdir().unwrap();
        let cone_path = dir.path().join("cone-params.txt");
        let custom = ThresholdRange::from_array([10, 40, 80, 255, 80, 255]);
        write_params_file(&cone_path, &custom).unwrap();

        let cfg = DetectorConfig {
            depth_unit: Some(0.0001),
            cone_params_file: Some(cone_path.to_string_lossy().into_owned()),
            ..DetectorConfig::default()
        };
        let cfg_path = dir.path().join("detector.json");
        cfg.write_json(&cfg_path).unwrap();

        let loaded = DetectorConfig::load_json(&cfg_path).unwrap();
        assert_eq!(loaded.depth_unit(), 0.0001);
        let params = loaded.build_params().unwrap();
        assert_eq!(params.cone, custom);
        assert_eq!(params.cube, ThresholdRange::CUBE);
    }

    #[test]
    fn empty_json_config_uses_defaults() {
        let cfg: DetectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.params, TargetDetectorParams::default());
        assert_eq!(cfg.depth_unit(), DEFAULT_DEPTH_UNIT);
    }

    #[test]
    fn report_records_errors() {
        let mut report = DetectReport::new(TargetKind::Cube);
        report.set_result(Err(DetectError::EmptyRegion {
            kind: TargetKind::Cube,
            bbox: BoundingBox::new(1, 2, 3, 4),
        }));
        assert!(report.location.is_none());
        assert!(report.error.as_deref().unwrap().contains("cube"));

        let json = serde_json::to_string(&report).unwrap();
        let back: DetectReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target, TargetKind::Cube);
    }

    #[test]
    fn report_written_to_disk_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = DetectReport::new(TargetKind::Cone);
        report.frame = Some(7);
        report.color_path = Some("color_007.png".to_string());
        report.set_result(Ok(Some(TargetLocation {
            kind: TargetKind::Cone,
            position: Point3::new(-0.12, 1.75, -0.31),
            distance: 1.8,
            center: Point2::new(301, 402),
            detection: Detection {
                contour: vec![
                    Point2::new(300, 380),
                    Point2::new(320, 430),
                    Point2::new(280, 430),
                ],
                bbox: BoundingBox::new(280, 380, 41, 51),
            },
        })));
        report.write_json(&path).unwrap();

        let back = DetectReport::load_json(&path).unwrap();
        assert_eq!(back.target, TargetKind::Cone);
        assert_eq!(back.frame, Some(7));
        assert_eq!(back.color_path.as_deref(), Some("color_007.png"));
        assert!(back.error.is_none());
        assert_eq!(back.location, report.location);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DetectReport::load_json(&path),
            Err(ConfigError::Json(_))
        ));
    }
}
