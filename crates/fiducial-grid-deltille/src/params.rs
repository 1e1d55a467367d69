use fiducial_grid_core::RowPattern;
use serde::{Deserialize, Serialize};

/// Deltille board layout and ordering tolerances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltilleParams {
    /// Row sizes, alternating between even and odd rows.
    pub rows: RowPattern,
    /// Max distance from a point to a row segment, in pixels.
    pub row_tolerance: f32,
    /// Reject frames whose raw saddle count already differs from the board size.
    pub require_exact_raw_count: bool,
}

impl Default for DeltilleParams {
    fn default() -> Self {
        Self {
            rows: RowPattern {
                even: 8,
                odd: 9,
                rows: 5,
            },
            row_tolerance: 2.0,
            require_exact_raw_count: true,
        }
    }
}

impl DeltilleParams {
    pub fn expected_points(&self) -> usize {
        self.rows.total()
    }
}
