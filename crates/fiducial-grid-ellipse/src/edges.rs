//! Diagnostic grid edges over accepted ring centers.
//!
//! Not used for ordering; only drawn so an operator can see which lines of
//! the board were recognized.

use fiducial_grid_core::{line_members, LineClusterParams, LineDistance, Overlay, Rgb};
use nalgebra::Point2;

const EDGE_PALETTE: [Rgb; 4] = [Rgb::MAGENTA, Rgb::BLUE, Rgb::GREEN, Rgb::RED];

/// Farthest pair among `members`, larger-x endpoint first. First maximal pair wins.
fn farthest_pair(points: &[Point2<f32>], members: &[usize]) -> Option<[usize; 2]> {
    let mut best: Option<(f32, usize, usize)> = None;
    for &i in members {
        for &j in members {
            if i == j {
                continue;
            }
            let d = nalgebra::distance(&points[i], &points[j]);
            if best.map_or(true, |(bd, _, _)| d > bd) {
                best = Some((d, i, j));
            }
        }
    }
    best.map(|(_, i, j)| if points[i].x < points[j].x { [j, i] } else { [i, j] })
}

/// Lines of at least `min_members` points, as endpoint index pairs.
///
/// Membership uses the perpendicular distance to the infinite line through
/// each ordered pair. A line is skipped when its first endpoint is already
/// an endpoint of an earlier line.
pub fn ring_edges(points: &[Point2<f32>], tolerance: f32, min_members: usize) -> Vec<[usize; 2]> {
    let params = LineClusterParams {
        tolerance,
        distance: LineDistance::Perpendicular,
    };
    let mut edges: Vec<[usize; 2]> = Vec::new();
    for i in 0..points.len() {
        for j in 0..points.len() {
            if i == j {
                continue;
            }
            let members = line_members(points, i, j, &params);
            if members.len() < min_members {
                continue;
            }
            let Some(ends) = farthest_pair(points, &members) else {
                continue;
            };
            if edges.iter().any(|e| e.contains(&ends[0])) {
                continue;
            }
            edges.push(ends);
        }
    }
    edges
}

/// Draw each edge plus a link from its second endpoint to the first endpoint
/// of the previous edge.
pub fn draw_ring_edges(overlay: &mut dyn Overlay, points: &[Point2<f32>], edges: &[[usize; 2]]) {
    for (k, e) in edges.iter().enumerate() {
        let color = EDGE_PALETTE[k % EDGE_PALETTE.len()];
        if k > 0 {
            overlay.line(points[e[1]], points[edges[k - 1][0]], color);
        }
        overlay.line(points[e[0]], points[e[1]], color);
    }
}
