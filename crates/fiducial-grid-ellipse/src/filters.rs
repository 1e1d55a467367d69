//! Candidate filters: hierarchy majority vote and neighbor density.

use fiducial_grid_core::CandidatePoint;

use crate::params::TieBreak;

/// Most frequent contour parent among `points`.
///
/// Ids are sorted and scanned as contiguous runs. With
/// [`TieBreak::FirstSeen`] a later run replaces the best one only when it
/// is strictly longer; with [`TieBreak::LastSeen`] an equal run also wins.
/// Candidates without a parent do not vote; `None` when nobody votes.
pub fn hierarchy_mode(points: &[CandidatePoint], tie_break: TieBreak) -> Option<usize> {
    let mut ids: Vec<usize> = points.iter().filter_map(|p| p.parent).collect();
    ids.sort_unstable();

    let mut runs = ids.chunk_by(|a, b| a == b);
    let first = runs.next()?;
    let (mut mode, mut best) = (first[0], first.len());
    for run in runs {
        let wins = match tie_break {
            TieBreak::FirstSeen => run.len() > best,
            TieBreak::LastSeen => run.len() >= best,
        };
        if wins {
            mode = run[0];
            best = run.len();
        }
    }
    Some(mode)
}

/// Keep only candidates whose parent is the [`hierarchy_mode`].
///
/// Returns the mode; the list is left untouched when there is none.
pub fn retain_hierarchy_mode(points: &mut Vec<CandidatePoint>, tie_break: TieBreak) -> Option<usize> {
    let mode = hierarchy_mode(points, tie_break)?;
    points.retain(|p| p.parent == Some(mode));
    Some(mode)
}

/// Ordered pairs `(i, j)`, `i != j`, with `|p_i - p_j| < factor * radius(j)`.
///
/// The relation is asymmetric: the radius of the neighbor decides.
pub fn neighbor_links(points: &[CandidatePoint], factor: f32) -> Vec<(usize, usize)> {
    let mut links = Vec::new();
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            if i != j && a.distance(b) < factor * b.radius {
                links.push((i, j));
            }
        }
    }
    links
}

/// Drop candidates with fewer than `min_neighbors` neighbors (see [`neighbor_links`]).
///
/// Survivors keep their input order.
pub fn filter_by_neighbor_density(
    points: &[CandidatePoint],
    factor: f32,
    min_neighbors: usize,
) -> Vec<CandidatePoint> {
    let mut counts = vec![0usize; points.len()];
    for (i, _) in neighbor_links(points, factor) {
        counts[i] += 1;
    }
    points
        .iter()
        .zip(&counts)
        .filter(|(_, n)| **n >= min_neighbors)
        .map(|(p, _)| *p)
        .collect()
}
