//! `fiducial-grid`: track a calibration grid over a list of frames.

use std::path::{Path, PathBuf};

use clap::Parser;
use fiducial_grid::core::{GrayImageView, NoOverlay, Overlay, Positioned};
use fiducial_grid::detect::{default_deltille_detector, gray_view, ChessSaddleSource, RgbCanvas};
use fiducial_grid::io::{BoardKind, FrameReport, TrackerConfig, TrackingReport};
use fiducial_grid::{DeltilleTracker, EllipseBoardTracker, TrackedFrame};
use log::{info, warn};
use nalgebra::Point2;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "fiducial-grid")]
#[command(about = "Track a concentric-ring or deltille calibration grid over a sequence of frames")]
#[command(version)]
struct Cli {
    /// JSON tracker configuration.
    #[arg(long)]
    config: PathBuf,

    /// Report path; overrides `output_path` from the config.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory for per-frame overlay PNGs; overrides `overlay_dir` from the config.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); `RUST_LOG` overrides it in tracing builds.
    #[arg(long, default_value = "info")]
    log_level: String,
}

enum Tracker {
    Ellipse(EllipseBoardTracker),
    Deltille(DeltilleTracker<ChessSaddleSource>),
}

/// Status, positions, ROI and raw count, whatever the point type.
fn flatten<T: Positioned>(frame: TrackedFrame<T>) -> TrackedFrame<Point2<f32>> {
    TrackedFrame {
        points: frame.points.iter().map(|p| p.position()).collect(),
        status: frame.status,
        roi: frame.roi,
        raw_count: frame.raw_count,
    }
}

impl Tracker {
    fn from_config(cfg: &TrackerConfig) -> Self {
        let stabilizer = cfg.stabilizer_params();
        match cfg.board {
            BoardKind::Ellipse => Tracker::Ellipse(
                EllipseBoardTracker::new(cfg.ellipse_params(), stabilizer)
                    .with_threshold(cfg.threshold, cfg.invert),
            ),
            BoardKind::Deltille => Tracker::Deltille(DeltilleTracker::new(
                default_deltille_detector(cfg.deltille_params()),
                stabilizer,
            )),
        }
    }

    fn process(
        &mut self,
        frame: &GrayImageView<'_>,
        overlay: &mut dyn Overlay,
    ) -> TrackedFrame<Point2<f32>> {
        match self {
            Tracker::Ellipse(t) => flatten(t.process(frame, overlay)),
            Tracker::Deltille(t) => flatten(t.process(frame, overlay)),
        }
    }
}

fn init_logging(level: &str) -> CliResult<()> {
    let level = fiducial_grid::core::parse_level(level);

    #[cfg(not(feature = "tracing"))]
    fiducial_grid::core::init_with_level(level)?;

    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        fiducial_grid::core::init_tracing_with_level(false, level);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let result = init_logging(&cli.log_level).and_then(|()| run(&cli));
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(cli)))]
fn run(cli: &Cli) -> CliResult<()> {
    let cfg = TrackerConfig::load_json(&cli.config)?;
    cfg.validate()?;

    let base = cli.config.parent().unwrap_or(Path::new("."));
    let overlay_dir = cli
        .overlay_dir
        .clone()
        .or_else(|| cfg.overlay_dir.as_ref().map(|d| base.join(d)));
    if let Some(dir) = &overlay_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut tracker = Tracker::from_config(&cfg);
    let mut report = TrackingReport::new(&cfg, &cli.config);

    for (index, path) in cfg.frame_paths(base).into_iter().enumerate() {
        let img = match image::open(&path) {
            Ok(img) => img.to_luma8(),
            Err(err) => {
                warn!("frame {index}: cannot read {}: {err}", path.display());
                report.frames.push(FrameReport::failed(index, &path, err));
                continue;
            }
        };
        let view = gray_view(&img);

        let (frame, overlay_path) = match &overlay_dir {
            Some(dir) => {
                let mut canvas = RgbCanvas::from_gray(&view);
                let frame = tracker.process(&view, &mut canvas);
                let out = dir.join(format!("frame_{index:04}.png"));
                canvas.image().save(&out)?;
                (frame, Some(out.to_string_lossy().into_owned()))
            }
            None => (tracker.process(&view, &mut NoOverlay), None),
        };

        info!(
            "frame {index}: {:?}, {} raw, {} held",
            frame.status,
            frame.raw_count,
            frame.points.len()
        );
        report.frames.push(FrameReport {
            index,
            path: path.to_string_lossy().into_owned(),
            status: Some(frame.status),
            raw_count: frame.raw_count,
            points: frame.points,
            roi: Some(frame.roi),
            overlay_path,
            error: None,
        });
    }

    let out = cli
        .output
        .clone()
        .unwrap_or_else(|| base.join(&cfg.output_path));
    report.write_json(&out)?;
    println!(
        "{} of {} frames carried a grid; report written to {}",
        report.frames_with_grid(),
        report.frames.len(),
        out.display()
    );
    Ok(())
}
