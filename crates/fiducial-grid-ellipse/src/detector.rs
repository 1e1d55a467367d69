use fiducial_grid_core::{CandidatePoint, GrayImageView, Overlay, Positioned, Rgb};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::edges::{draw_ring_edges, ring_edges};
use crate::extract::extract_with_contours;
use crate::filters::{filter_by_neighbor_density, neighbor_links, retain_hierarchy_mode};
use crate::fit::fit_contour;
use crate::params::EllipseBoardParams;

/// Result of one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EllipseBoardDetection {
    /// Every concentric candidate before filtering.
    pub candidates: Vec<CandidatePoint>,
    /// Survivors of the density and hierarchy filters, in extraction order.
    pub points: Vec<CandidatePoint>,
    /// Parent id the hierarchy filter kept, when it ran.
    pub mode: Option<usize>,
    /// Mean ring radius of `points`, `None` when empty.
    pub mean_radius: Option<f32>,
    /// `points.len()` equals the configured target.
    pub found: bool,
}

/// Concentric-ring board detector.
#[derive(Clone, Debug, Default)]
pub struct EllipseBoardDetector {
    pub params: EllipseBoardParams,
}

impl EllipseBoardDetector {
    pub fn new(params: EllipseBoardParams) -> Self {
        Self { params }
    }

    /// Run extraction and filtering on a binary `mask` (board foreground non-zero).
    ///
    /// The hierarchy filter only runs while more than `target_points`
    /// candidates survive the density filter.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, mask, overlay), fields(w = mask.width, h = mask.height))
    )]
    pub fn detect(&self, mask: &GrayImageView<'_>, overlay: &mut dyn Overlay) -> EllipseBoardDetection {
        let p = &self.params;
        let (contours, candidates) = extract_with_contours(mask, &p.extract, overlay);

        for (i, j) in neighbor_links(&candidates, p.density.neighbor_factor) {
            overlay.line(candidates[i].position, candidates[j].position, Rgb::RED);
        }
        let mut points = filter_by_neighbor_density(
            &candidates,
            p.density.neighbor_factor,
            p.density.min_neighbors,
        );

        let mut mode = None;
        if points.len() > p.target_points {
            mode = retain_hierarchy_mode(&mut points, p.tie_break);
            if let Some(board) = mode.and_then(|m| contours.get(m)).and_then(fit_contour) {
                overlay.ellipse(&board, Rgb::RED);
            }
            for c in &points {
                overlay.circle(c.position, c.radius, Rgb::GREEN);
            }
        }

        let mean_radius = (!points.is_empty())
            .then(|| points.iter().map(|c| c.radius).sum::<f32>() / points.len() as f32);
        let found = points.len() == p.target_points;

        log::debug!(
            "ellipse board: {} contours, {} candidates, {} kept (mode {:?}), found = {}",
            contours.len(),
            candidates.len(),
            points.len(),
            mode,
            found
        );

        EllipseBoardDetection {
            candidates,
            points,
            mode,
            mean_radius,
            found,
        }
    }

    /// Draw the diagnostic grid edges of a held grid; no-op below the target size.
    pub fn draw_grid<T: Positioned>(&self, overlay: &mut dyn Overlay, grid: &[T]) {
        if grid.len() < self.params.target_points {
            return;
        }
        let pts: Vec<Point2<f32>> = grid.iter().map(Positioned::position).collect();
        let edges = ring_edges(&pts, self.params.edges.tolerance, self.params.edges.min_members);
        draw_ring_edges(overlay, &pts, &edges);
    }
}
