//! Feed synthetic frames through the timed acquisition loop and print each
//! detected cone's ground-plane position.
//!
//! ```text
//! cargo run -p gamepiece --example synthetic_feed
//! ```

use std::time::Duration;

use gamepiece::{
    CameraGeometry, CancelToken, ColorImage, DepthImage, FramePair, FrameSource,
    StaticFrameSource, TargetDetector, TargetDetectorParams, TargetKind, TimedFrameSource,
};
use nalgebra::Vector3;

fn cone_frame(apex_x: usize, raw_depth: u16) -> Result<FramePair, gamepiece::FrameError> {
    let mut color = ColorImage::filled(640, 480, [20, 20, 20]);
    for y in 200..290 {
        let half = (y - 200) / 3;
        for x in apex_x - half..=apex_x + half {
            color.set_pixel(x, y, [240, 210, 20]);
        }
    }
    FramePair::new(color, DepthImage::filled(640, 480, raw_depth), 0.001)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames = vec![
        cone_frame(200, 1800)?,
        cone_frame(320, 1500)?,
        cone_frame(460, 1200)?,
    ];
    let geometry = CameraGeometry {
        offset: Vector3::new(0.0, 0.25, 0.4),
        elev_angle: -0.15,
        ..CameraGeometry::default()
    };
    let detector = TargetDetector::new(TargetDetectorParams::with_geometry(geometry));

    let cancel = CancelToken::new();
    let mut source = TimedFrameSource::spawn(
        StaticFrameSource::new(frames),
        Duration::from_millis(250),
        cancel.clone(),
    )?;

    for i in 0..3 {
        let frame = source.acquire()?;
        match detector.detect(TargetKind::Cone, &frame)? {
            Some(cone) => {
                let (x, y) = cone.planar();
                println!(
                    "frame {i}: cone at x={x:.3} y={y:.3} (range {:.3})",
                    cone.distance
                );
            }
            None => println!("frame {i}: no cone"),
        }
    }

    cancel.cancel();
    source.shutdown();
    Ok(())
}
