//! Frame-to-frame hysteresis over accepted grids.
//!
//! A [`TemporalStabilizer`] is owned by exactly one pipeline. It caches the
//! last detection that had the target size, keeps returning it for a few
//! frames when detection drops out, and derives the search region for the
//! next frame from whatever is currently held.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::point::Positioned;
use crate::roi::RoiQuad;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerParams {
    /// Exact number of points a detection needs to be accepted.
    pub target_points: usize,
    /// Frames an accepted grid is reused after detection drops out.
    pub hysteresis_frames: u32,
    /// Scale of the oriented bounding rectangle used as next-frame ROI.
    pub roi_scale: f32,
}

impl Default for StabilizerParams {
    fn default() -> Self {
        Self {
            target_points: 20,
            hysteresis_frames: 2,
            roi_scale: 1.5,
        }
    }
}

impl StabilizerParams {
    pub fn with_target(target_points: usize) -> Self {
        Self {
            target_points,
            ..Self::default()
        }
    }
}

/// The only state that outlives a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionState<T> {
    /// Last accepted grid, empty when idle.
    pub held: Vec<T>,
    pub frames_remaining: u32,
}

impl<T> Default for DetectionState<T> {
    fn default() -> Self {
        Self {
            held: Vec::new(),
            frames_remaining: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FrameStatus {
    /// This frame's detection had the target size and replaced the cache.
    Fresh,
    /// Detection failed; the cached grid is reused. `remaining` more frames
    /// may be served from the cache after this one.
    Held { remaining: u32 },
    /// Detection failed and the hysteresis budget ran out; the cache was dropped.
    Lost,
    /// Nothing detected and nothing held.
    Idle,
}

impl FrameStatus {
    /// Whether the frame carries a usable grid.
    pub fn has_grid(&self) -> bool {
        matches!(self, FrameStatus::Fresh | FrameStatus::Held { .. })
    }
}

/// Output of one [`TemporalStabilizer::update`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StabilizedFrame<T> {
    pub points: Vec<T>,
    pub status: FrameStatus,
    /// Region the next frame should be searched in.
    pub roi: RoiQuad,
}

#[derive(Clone, Debug)]
pub struct TemporalStabilizer<T> {
    params: StabilizerParams,
    state: DetectionState<T>,
}

impl<T: Positioned + Clone> TemporalStabilizer<T> {
    pub fn new(params: StabilizerParams) -> Self {
        Self {
            params,
            state: DetectionState::default(),
        }
    }

    pub fn params(&self) -> &StabilizerParams {
        &self.params
    }

    pub fn state(&self) -> &DetectionState<T> {
        &self.state
    }

    /// Drop the cached grid.
    pub fn reset(&mut self) {
        self.state = DetectionState::default();
    }

    /// Feed one frame's detection.
    ///
    /// `frame_size` is `(width, height)` of the frame, used for the
    /// full-frame ROI fallback.
    pub fn update(&mut self, frame_size: (usize, usize), detection: Vec<T>) -> StabilizedFrame<T> {
        let status = if detection.len() == self.params.target_points {
            self.state.held = detection;
            self.state.frames_remaining = self.params.hysteresis_frames;
            FrameStatus::Fresh
        } else if self.state.frames_remaining > 0 && !self.state.held.is_empty() {
            self.state.frames_remaining -= 1;
            FrameStatus::Held {
                remaining: self.state.frames_remaining,
            }
        } else if !self.state.held.is_empty() {
            log::debug!("hysteresis exhausted, dropping held grid");
            self.state.held.clear();
            self.state.frames_remaining = 0;
            FrameStatus::Lost
        } else {
            self.state.frames_remaining = 0;
            FrameStatus::Idle
        };

        StabilizedFrame {
            points: self.state.held.clone(),
            status,
            roi: self.current_roi(frame_size),
        }
    }

    /// ROI derived from the currently held grid.
    pub fn current_roi(&self, (width, height): (usize, usize)) -> RoiQuad {
        if self.state.held.len() < self.params.target_points {
            return RoiQuad::full_frame(width, height);
        }
        let pts: Vec<Point2<f32>> = self.state.held.iter().map(Positioned::position).collect();
        RoiQuad::around_points(&pts, self.params.roi_scale)
            .unwrap_or_else(|| RoiQuad::full_frame(width, height))
    }
}
