//! JSON configuration and report helpers for the tracking CLI.

use fiducial_grid_core::{FrameStatus, RoiQuad, StabilizerParams};
use fiducial_grid_deltille::DeltilleParams;
use fiducial_grid_ellipse::{EllipseBoardParams, ThresholdMode};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("config lists no frames")]
    NoFrames,
    #[error("board layout has no points")]
    EmptyBoard,
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    Ellipse,
    Deltille,
}

fn default_output_path() -> String {
    "fiducial_grid_report.json".to_string()
}

/// Configuration for one tracking run, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub board: BoardKind,
    /// Frame images in playback order; relative paths resolve against the config file.
    pub frames: Vec<String>,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub overlay_dir: Option<String>,
    /// Binarization for the ellipse path.
    #[serde(default)]
    pub threshold: ThresholdMode,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub ellipse: Option<EllipseBoardParams>,
    #[serde(default)]
    pub deltille: Option<DeltilleParams>,
    #[serde(default)]
    pub stabilizer: Option<StabilizerParams>,
}

impl TrackerConfig {
    /// Minimal config for `board` over `frames`, everything else default.
    pub fn new(board: BoardKind, frames: Vec<String>) -> Self {
        Self {
            board,
            frames,
            output_path: default_output_path(),
            overlay_dir: None,
            threshold: ThresholdMode::default(),
            invert: false,
            ellipse: None,
            deltille: None,
            stabilizer: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn ellipse_params(&self) -> EllipseBoardParams {
        self.ellipse.clone().unwrap_or_default()
    }

    pub fn deltille_params(&self) -> DeltilleParams {
        self.deltille.clone().unwrap_or_default()
    }

    pub fn stabilizer_params(&self) -> StabilizerParams {
        self.stabilizer.unwrap_or_default()
    }

    /// Frame paths with relative entries joined onto `base`.
    pub fn frame_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.frames
            .iter()
            .map(|f| {
                let p = PathBuf::from(f);
                if p.is_relative() {
                    base.join(p)
                } else {
                    p
                }
            })
            .collect()
    }

    /// Reject layouts and settings that can never produce a grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames.is_empty() {
            return Err(ConfigError::NoFrames);
        }
        let stab = self.stabilizer_params();
        if stab.roi_scale.is_nan() || stab.roi_scale <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "roi_scale",
                value: stab.roi_scale,
            });
        }
        match self.board {
            BoardKind::Ellipse => {
                let p = self.ellipse_params();
                if p.target_points == 0 {
                    return Err(ConfigError::EmptyBoard);
                }
                check_positive("neighbor_factor", p.density.neighbor_factor)?;
                check_positive("concentricity_ratio", p.extract.concentricity_ratio)?;
            }
            BoardKind::Deltille => {
                let p = self.deltille_params();
                if p.expected_points() == 0 {
                    return Err(ConfigError::EmptyBoard);
                }
                check_positive("row_tolerance", p.row_tolerance)?;
            }
        }
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// One processed (or unreadable) frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: usize,
    pub path: String,
    #[serde(default)]
    pub status: Option<FrameStatus>,
    pub raw_count: usize,
    /// Current grid in output order.
    pub points: Vec<Point2<f32>>,
    #[serde(default)]
    pub roi: Option<RoiQuad>,
    #[serde(default)]
    pub overlay_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FrameReport {
    /// Report for a frame that could not be read.
    pub fn failed(index: usize, path: &Path, error: impl ToString) -> Self {
        Self {
            index,
            path: path.to_string_lossy().into_owned(),
            status: None,
            raw_count: 0,
            points: Vec::new(),
            roi: None,
            overlay_path: None,
            error: Some(error.to_string()),
        }
    }

    pub fn has_grid(&self) -> bool {
        self.status.is_some_and(|s| s.has_grid())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingReport {
    pub config_path: String,
    pub board: BoardKind,
    pub target_points: usize,
    pub frames: Vec<FrameReport>,
}

impl TrackingReport {
    pub fn new(cfg: &TrackerConfig, config_path: &Path) -> Self {
        let target_points = match cfg.board {
            BoardKind::Ellipse => cfg.ellipse_params().target_points,
            BoardKind::Deltille => cfg.deltille_params().expected_points(),
        };
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            board: cfg.board,
            target_points,
            frames: Vec::new(),
        }
    }

    /// Frames that carried a grid, fresh or held.
    pub fn frames_with_grid(&self) -> usize {
        self.frames.iter().filter(|f| f.has_grid()).count()
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
