use serde::{Deserialize, Serialize};

/// How the majority vote over hierarchy parents resolves equal-sized groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The earliest (smallest id) maximal group wins; later groups must be strictly larger.
    #[default]
    FirstSeen,
    /// The latest (largest id) maximal group wins.
    LastSeen,
}

/// Contour-pair acceptance settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractParams {
    /// Radius of the elliptical erosion kernel applied to the mask.
    pub erosion_radius: u32,
    /// Contours with fewer points are not fitted.
    pub min_contour_points: usize,
    /// Outer and inner centers must be closer than `ratio * inner radius`.
    pub concentricity_ratio: f32,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            erosion_radius: 2,
            min_contour_points: 5,
            concentricity_ratio: 0.5,
        }
    }
}

/// Isolated-candidate rejection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityParams {
    /// Candidate `j` counts as a neighbor of `i` within `factor * radius(j)`.
    pub neighbor_factor: f32,
    pub min_neighbors: usize,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            neighbor_factor: 5.0,
            min_neighbors: 2,
        }
    }
}

/// Diagnostic grid-edge drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingEdgeParams {
    /// Perpendicular distance to the infinite line, in pixels.
    pub tolerance: f32,
    /// Lines with fewer members are ignored.
    pub min_members: usize,
}

impl Default for RingEdgeParams {
    fn default() -> Self {
        Self {
            tolerance: 5.0,
            min_members: 5,
        }
    }
}

/// Parameters for concentric-ring board detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipseBoardParams {
    /// Number of rings on the board; a frame is found only on an exact match.
    pub target_points: usize,
    pub extract: ExtractParams,
    pub density: DensityParams,
    pub tie_break: TieBreak,
    pub edges: RingEdgeParams,
}

impl Default for EllipseBoardParams {
    fn default() -> Self {
        Self {
            target_points: 20,
            extract: ExtractParams::default(),
            density: DensityParams::default(),
            tie_break: TieBreak::FirstSeen,
            edges: RingEdgeParams::default(),
        }
    }
}
