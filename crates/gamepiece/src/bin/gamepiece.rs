//! gamepiece CLI: locate cones and cubes in recorded color + depth frames.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use gamepiece::detect::{load_frame, ImageDirSource};
use gamepiece::detector::{DetectReport, DetectorConfig};
use gamepiece::{
    AcquisitionError, CancelToken, FrameSource, TargetDetector, TargetKind, TimedFrameSource,
};
use log::{info, warn};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "gamepiece")]
#[command(about = "Locate cones and cubes in aligned color + depth frames")]
#[command(version)]
struct Cli {
    /// Log pipeline stages at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect one target in a single PNG frame pair.
    Detect(DetectArgs),

    /// Play back a directory of frame pairs through the timed acquisition loop.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct CommonArgs {
    /// Target class: cone, cube or pole.
    #[arg(long, default_value = "cone")]
    target: TargetKind,

    /// Detector configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Raw depth count to distance scale; overrides the config value.
    #[arg(long)]
    depth_unit: Option<f32>,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// RGB color frame (PNG).
    #[arg(long)]
    color: PathBuf,

    /// 16-bit depth frame (PNG).
    #[arg(long)]
    depth: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Directory holding `color_<name>.png` / `depth_<name>.png` pairs.
    #[arg(long)]
    dir: PathBuf,

    /// Per-frame acquisition timeout in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Run(args) => run_loop(&args),
    }
}

/// `RUST_LOG` overrides the level picked by `--verbose`. Logs go to stderr so
/// stdout carries only reports.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    #[cfg(not(feature = "tracing"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn build_detector(common: &CommonArgs) -> CliResult<(TargetDetector, f32)> {
    let cfg = match &common.config {
        Some(path) => DetectorConfig::load_json(path)?,
        None => DetectorConfig::default(),
    };
    let depth_unit = common.depth_unit.unwrap_or_else(|| cfg.depth_unit());
    let params = cfg.build_params()?;
    Ok((TargetDetector::new(params), depth_unit))
}

// ── detect ────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let (detector, depth_unit) = build_detector(&args.common)?;
    let frame = load_frame(&args.color, &args.depth, depth_unit)?;

    let mut report = DetectReport::new(args.common.target);
    report.color_path = Some(args.color.to_string_lossy().into_owned());
    report.depth_path = Some(args.depth.to_string_lossy().into_owned());
    report.set_result(detector.detect(args.common.target, &frame));

    match &args.output {
        Some(path) => {
            report.write_json(path)?;
            info!("wrote report to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

// ── run ───────────────────────────────────────────────────────────────

fn run_loop(args: &RunArgs) -> CliResult<()> {
    let (detector, depth_unit) = build_detector(&args.common)?;
    let source = ImageDirSource::open(&args.dir, depth_unit)?;
    let mut timed = TimedFrameSource::spawn(
        source,
        Duration::from_millis(args.timeout_ms),
        CancelToken::new(),
    )?;

    let mut seq = 0u64;
    while args.max_frames.is_none_or(|max| seq < max) {
        let mut report = DetectReport::new(args.common.target);
        report.frame = Some(seq);
        match timed.acquire() {
            Ok(frame) => report.set_result(detector.detect(args.common.target, &frame)),
            Err(AcquisitionError::Disconnected | AcquisitionError::Cancelled) => break,
            Err(err) => {
                warn!("frame {seq}: {err}");
                report.error = Some(err.to_string());
            }
        }
        println!("{}", serde_json::to_string(&report)?);
        seq += 1;
    }

    timed.shutdown();
    info!("processed {seq} frames");
    Ok(())
}
