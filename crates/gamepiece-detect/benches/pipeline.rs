use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gamepiece_core::{ColorImage, DepthImage, FramePair};
use gamepiece_detect::{
    find_external_contours, gaussian_blur_rgb, segment, BlurParams, MorphologyParams,
    TargetDetector, TargetKind, ThresholdRange,
};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

fn make_frame() -> FramePair {
    let mut color = ColorImage::filled(WIDTH, HEIGHT, [30, 30, 30]);
    for y in 200..320 {
        let half = (y - 200) / 3;
        for x in 320 - half..=320 + half {
            color.set_pixel(x, y, [240, 210, 20]);
        }
    }
    for y in 100..180 {
        for x in 80..160 {
            color.set_pixel(x, y, [128, 0, 200]);
        }
    }
    let depth = DepthImage::filled(WIDTH, HEIGHT, 1200);
    FramePair::new(color, depth, 0.001).expect("synthetic frame is consistent")
}

fn bench_blur(c: &mut Criterion) {
    let frame = make_frame();
    let params = BlurParams::default();
    c.bench_function("blur_640x480_k17", |b| {
        b.iter(|| black_box(gaussian_blur_rgb(black_box(&frame.color()), &params)))
    });
}

fn bench_segment_and_contours(c: &mut Criterion) {
    let frame = make_frame();
    let blur = BlurParams::default();
    let cleanup = MorphologyParams::default();
    c.bench_function("segment_cube_640x480", |b| {
        b.iter(|| {
            let mask = segment(&frame.color(), &ThresholdRange::CUBE, &blur, Some(&cleanup));
            black_box(find_external_contours(&mask))
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let frame = make_frame();
    let detector = TargetDetector::default();
    c.bench_function("detect_cone_640x480", |b| {
        b.iter(|| black_box(detector.detect(TargetKind::Cone, black_box(&frame))))
    });
    c.bench_function("detect_cube_640x480", |b| {
        b.iter(|| black_box(detector.detect(TargetKind::Cube, black_box(&frame))))
    });
}

criterion_group!(
    pipeline,
    bench_blur,
    bench_segment_and_contours,
    bench_full_pipeline
);
criterion_main!(pipeline);
