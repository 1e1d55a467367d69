use fiducial_grid_core::{order_grid_rows, GrayImageView, OrderedGrid};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::params::DeltilleParams;
use crate::saddle::SaddlePointDetector;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltilleDetection {
    /// Points as returned by the saddle detector.
    pub raw_points: Vec<Point2<f32>>,
    /// Row-major ordering of `raw_points`; `grid.source` indexes into them.
    pub grid: OrderedGrid,
    pub found: bool,
}

/// Saddle source + row ordering + size check.
pub struct DeltilleDetector<S> {
    pub params: DeltilleParams,
    source: S,
}

impl<S: SaddlePointDetector> DeltilleDetector<S> {
    pub fn new(params: DeltilleParams, source: S) -> Self {
        Self { params, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(w = image.width, h = image.height))
    )]
    pub fn detect(&self, image: &GrayImageView<'_>) -> DeltilleDetection {
        let raw_points = self.source.find_saddle_points(image);
        log::debug!("saddle detector returned {} points", raw_points.len());
        self.order(raw_points)
    }

    /// Order an already detected point set.
    pub fn order(&self, raw_points: Vec<Point2<f32>>) -> DeltilleDetection {
        let expected = self.params.expected_points();
        let grid = order_grid_rows(&raw_points, self.params.rows, self.params.row_tolerance);

        let raw_ok = !self.params.require_exact_raw_count || raw_points.len() == expected;
        let found = raw_ok && grid.len() == expected;
        if !found {
            log::debug!(
                "deltille rejected: {} raw, {} ordered, {} expected",
                raw_points.len(),
                grid.len(),
                expected
            );
        }
        DeltilleDetection {
            raw_points,
            grid,
            found,
        }
    }
}
