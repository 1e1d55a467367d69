//! Detector + hysteresis + ROI, one instance per video stream.

use fiducial_grid_core::{
    CandidatePoint, FrameStatus, GrayImage, GrayImageView, Overlay, RoiQuad, StabilizerParams,
    TemporalStabilizer,
};
use fiducial_grid_deltille::{draw_ordered_grid, DeltilleDetector, SaddlePointDetector};
use fiducial_grid_ellipse::{binarize, EllipseBoardDetector, EllipseBoardParams, ThresholdMode};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Outcome of one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedFrame<T> {
    /// Current grid: this frame's detection or the held one, empty otherwise.
    pub points: Vec<T>,
    pub status: FrameStatus,
    /// Region the next frame will be searched in.
    pub roi: RoiQuad,
    /// Points the detector produced on this frame before stabilization.
    pub raw_count: usize,
}

impl<T> TrackedFrame<T> {
    pub fn has_grid(&self) -> bool {
        self.status.has_grid()
    }
}

/// Restrict `frame` to the previous ROI; the full frame on the first call.
fn masked(roi: Option<&RoiQuad>, frame: &GrayImageView<'_>) -> GrayImage {
    match roi {
        Some(roi) => roi.mask_image(frame),
        None => frame.to_owned_image(),
    }
}

/// Concentric-ring board tracker.
pub struct EllipseBoardTracker {
    detector: EllipseBoardDetector,
    threshold: ThresholdMode,
    invert: bool,
    stabilizer: TemporalStabilizer<CandidatePoint>,
    roi: Option<RoiQuad>,
}

impl EllipseBoardTracker {
    /// The stabilizer target is taken from `params.target_points`.
    pub fn new(params: EllipseBoardParams, stabilizer: StabilizerParams) -> Self {
        let stabilizer = StabilizerParams {
            target_points: params.target_points,
            ..stabilizer
        };
        Self {
            detector: EllipseBoardDetector::new(params),
            threshold: ThresholdMode::default(),
            invert: false,
            stabilizer: TemporalStabilizer::new(stabilizer),
            roi: None,
        }
    }

    /// Binarization used by [`process`](Self::process).
    pub fn with_threshold(mut self, threshold: ThresholdMode, invert: bool) -> Self {
        self.threshold = threshold;
        self.invert = invert;
        self
    }

    pub fn detector(&self) -> &EllipseBoardDetector {
        &self.detector
    }

    /// ROI applied to the next frame, `None` before the first frame.
    pub fn roi(&self) -> Option<&RoiQuad> {
        self.roi.as_ref()
    }

    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.roi = None;
    }

    /// Binarize a grayscale frame and track on the result.
    pub fn process(
        &mut self,
        frame: &GrayImageView<'_>,
        overlay: &mut dyn Overlay,
    ) -> TrackedFrame<CandidatePoint> {
        let mask = binarize(frame, self.threshold, self.invert);
        self.process_mask(&mask.view(), overlay)
    }

    /// Track on an already binarized frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, mask, overlay), fields(w = mask.width, h = mask.height))
    )]
    pub fn process_mask(
        &mut self,
        mask: &GrayImageView<'_>,
        overlay: &mut dyn Overlay,
    ) -> TrackedFrame<CandidatePoint> {
        let search = masked(self.roi.as_ref(), mask);
        let det = self.detector.detect(&search.view(), overlay);
        let raw_count = det.points.len();

        let out = self.stabilizer.update((mask.width, mask.height), det.points);
        if out.status.has_grid() {
            self.detector.draw_grid(overlay, &out.points);
        }
        if out.status == FrameStatus::Lost {
            log::warn!("ellipse board lost");
        }
        self.roi = Some(out.roi);

        TrackedFrame {
            points: out.points,
            status: out.status,
            roi: out.roi,
            raw_count,
        }
    }
}

/// Deltille board tracker over any saddle source.
pub struct DeltilleTracker<S> {
    detector: DeltilleDetector<S>,
    stabilizer: TemporalStabilizer<Point2<f32>>,
    roi: Option<RoiQuad>,
}

impl<S: SaddlePointDetector> DeltilleTracker<S> {
    /// The stabilizer target is the detector's expected point count.
    pub fn new(detector: DeltilleDetector<S>, stabilizer: StabilizerParams) -> Self {
        let stabilizer = StabilizerParams {
            target_points: detector.params.expected_points(),
            ..stabilizer
        };
        Self {
            detector,
            stabilizer: TemporalStabilizer::new(stabilizer),
            roi: None,
        }
    }

    pub fn detector(&self) -> &DeltilleDetector<S> {
        &self.detector
    }

    pub fn roi(&self) -> Option<&RoiQuad> {
        self.roi.as_ref()
    }

    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.roi = None;
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame, overlay), fields(w = frame.width, h = frame.height))
    )]
    pub fn process(
        &mut self,
        frame: &GrayImageView<'_>,
        overlay: &mut dyn Overlay,
    ) -> TrackedFrame<Point2<f32>> {
        let search = masked(self.roi.as_ref(), frame);
        let det = self.detector.detect(&search.view());
        let raw_count = det.raw_points.len();
        // A partial ordering must not reach the cache.
        let accepted = if det.found {
            det.grid.points
        } else {
            Vec::new()
        };

        let out = self.stabilizer.update((frame.width, frame.height), accepted);
        if out.status.has_grid() {
            draw_ordered_grid(overlay, &out.points);
        }
        if out.status == FrameStatus::Lost {
            log::warn!("deltille board lost");
        }
        self.roi = Some(out.roi);

        TrackedFrame {
            points: out.points,
            status: out.status,
            roi: out.roi,
            raw_count,
        }
    }
}
