//! Collinear subset search over small point sets.
//!
//! Every ordered pair `(i, j)` defines a line (or a segment); the members of
//! that pair are all points within `tolerance` of it. With grids of at most
//! ~50 points the O(n³) scan is cheap enough to run every frame.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::{point_to_line_perpendicular, point_to_segment_clamped};

/// Which distance defines membership of a pair's line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDistance {
    /// Infinite line through both points.
    Perpendicular,
    /// Segment between both points, projection clamped to the endpoints.
    Segment,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LineClusterParams {
    /// Maximum point-to-line distance in pixels (strict).
    pub tolerance: f32,
    pub distance: LineDistance,
}

impl Default for LineClusterParams {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            distance: LineDistance::Segment,
        }
    }
}

impl LineClusterParams {
    #[inline]
    fn distance(&self, a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
        match self.distance {
            LineDistance::Perpendicular => point_to_line_perpendicular(a, b, p),
            LineDistance::Segment => point_to_segment_clamped(a, b, p),
        }
    }
}

/// Indices of all points within tolerance of the line through `points[i]`
/// and `points[j]`, in input order. Both `i` and `j` are always members.
pub fn line_members(
    points: &[Point2<f32>],
    i: usize,
    j: usize,
    params: &LineClusterParams,
) -> Vec<usize> {
    let (a, b) = (points[i], points[j]);
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| params.distance(a, b, **p) < params.tolerance)
        .map(|(k, _)| k)
        .collect()
}

/// Every distinct member set of exactly `len` points.
///
/// Groups are reported once each (as sorted index sets) in the order their
/// first defining pair is scanned.
pub fn collinear_groups(
    points: &[Point2<f32>],
    params: &LineClusterParams,
    len: usize,
) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..points.len() {
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            let mut members = line_members(points, i, j, params);
            if members.len() != len {
                continue;
            }
            members.sort_unstable();
            if !groups.contains(&members) {
                groups.push(members);
            }
        }
    }
    groups
}

/// Single pass over all ordered pairs, accepting mutually disjoint groups.
///
/// `expected_len(row)` gives the size a group must have to be accepted as
/// the `row`-th group; a group sharing any index with an already accepted
/// one is skipped. Stops after `max_rows` groups when given.
pub fn peel_disjoint_lines<F>(
    points: &[Point2<f32>],
    params: &LineClusterParams,
    max_rows: Option<usize>,
    expected_len: F,
) -> Vec<Vec<usize>>
where
    F: Fn(usize) -> usize,
{
    let mut used = vec![false; points.len()];
    let mut rows: Vec<Vec<usize>> = Vec::new();

    for i in 0..points.len() {
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            if max_rows.is_some_and(|max| rows.len() >= max) {
                return rows;
            }
            let members = line_members(points, i, j, params);
            if members.len() != expected_len(rows.len()) {
                continue;
            }
            if members.iter().any(|&k| used[k]) {
                continue;
            }
            for &k in &members {
                used[k] = true;
            }
            rows.push(members);
        }
    }
    rows
}
