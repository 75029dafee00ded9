use gamepiece_core::{BoundingBox, FrameError, TargetKind};

/// Errors returned by [`TargetDetector`](super::TargetDetector).
///
/// Finding nothing is not an error; it is reported as `Ok(None)`.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("{kind} candidate at {bbox:?} has no depth samples left after erosion")]
    EmptyRegion { kind: TargetKind, bbox: BoundingBox },
}
