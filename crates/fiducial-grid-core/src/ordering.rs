//! Canonical row-major ordering of an unordered grid point cloud.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::lines::{peel_disjoint_lines, LineClusterParams, LineDistance};
use crate::point::OrderedGrid;

/// Row sizes of a board whose rows may alternate in length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPattern {
    /// Points in rows 0, 2, 4, ...
    pub even: usize,
    /// Points in rows 1, 3, 5, ...
    pub odd: usize,
    /// Number of rows on the board.
    pub rows: usize,
}

impl RowPattern {
    /// Every row has `cols` points.
    pub fn uniform(cols: usize, rows: usize) -> Self {
        Self {
            even: cols,
            odd: cols,
            rows,
        }
    }

    #[inline]
    pub fn expected_len(&self, row: usize) -> usize {
        if row % 2 == 0 {
            self.even
        } else {
            self.odd
        }
    }

    /// Total number of points on the board.
    pub fn total(&self) -> usize {
        (0..self.rows).map(|r| self.expected_len(r)).sum()
    }
}

/// Order `points` into rows.
///
/// Points are sorted by descending y, then rows are peeled off with the
/// clamped segment distance: a pair's members form row `k` when their count
/// equals `pattern.expected_len(k)` and none of them belongs to an earlier
/// row. Each row is sorted by ascending x. Rows that cannot be recovered
/// are simply missing, so callers compare `len()` with `pattern.total()`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(points), fields(n = points.len()))
)]
pub fn order_grid_rows(points: &[Point2<f32>], pattern: RowPattern, tolerance: f32) -> OrderedGrid {
    let mut by_y: Vec<usize> = (0..points.len()).collect();
    by_y.sort_by(|&a, &b| {
        points[b]
            .y
            .partial_cmp(&points[a].y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let sorted: Vec<Point2<f32>> = by_y.iter().map(|&k| points[k]).collect();

    let params = LineClusterParams {
        tolerance,
        distance: LineDistance::Segment,
    };
    let rows = peel_disjoint_lines(&sorted, &params, Some(pattern.rows), |row| {
        pattern.expected_len(row)
    });

    let mut grid = OrderedGrid::default();
    for mut row in rows {
        row.sort_by(|&a, &b| {
            sorted[a]
                .x
                .partial_cmp(&sorted[b].x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        grid.row_lengths.push(row.len());
        for k in row {
            grid.points.push(sorted[k]);
            grid.source.push(by_y[k]);
        }
    }
    log::debug!(
        "ordered {} of {} points into {} rows",
        grid.len(),
        points.len(),
        grid.row_lengths.len()
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACING: f32 = 20.0;
    const ROW_STEP: f32 = 17.32;

    /// Row-major deltille-like lattice; row `r` has `pattern.expected_len(r)`
    /// points, y decreases with the row index, odd rows are shifted by half a step.
    fn deltille_rows(pattern: RowPattern) -> Vec<Vec<Point2<f32>>> {
        (0..pattern.rows)
            .map(|r| {
                let y = 300.0 - r as f32 * ROW_STEP;
                let shift = if pattern.expected_len(r) < pattern.odd.max(pattern.even) {
                    0.5 * SPACING
                } else {
                    0.0
                };
                (0..pattern.expected_len(r))
                    .map(|c| Point2::new(40.0 + shift + c as f32 * SPACING, y))
                    .collect()
            })
            .collect()
    }

    fn scramble(points: &[Point2<f32>]) -> Vec<Point2<f32>> {
        let n = points.len();
        (0..n).map(|k| points[(k * 11 + 5) % n]).collect()
    }

    #[test]
    fn recovers_row_major_order_of_deltille_layout() {
        let pattern = RowPattern {
            even: 8,
            odd: 9,
            rows: 5,
        };
        assert_eq!(pattern.total(), 42);
        let expected: Vec<Point2<f32>> = deltille_rows(pattern).concat();
        let input = scramble(&expected);

        let grid = order_grid_rows(&input, pattern, 2.0);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid.row_lengths, vec![8, 9, 8, 9, 8]);
        assert_eq!(grid.points, expected);
        for (k, &src) in grid.source.iter().enumerate() {
            assert_eq!(input[src], grid.points[k]);
        }
    }

    #[test]
    fn tolerates_small_jitter() {
        let pattern = RowPattern {
            even: 8,
            odd: 9,
            rows: 5,
        };
        let mut expected: Vec<Point2<f32>> = deltille_rows(pattern).concat();
        for (k, p) in expected.iter_mut().enumerate() {
            p.y += if k % 3 == 0 { 0.3 } else { -0.2 };
            p.x += if k % 2 == 0 { 0.25 } else { -0.25 };
        }
        let grid = order_grid_rows(&scramble(&expected), pattern, 2.0);
        assert_eq!(grid.points, expected);
    }

    #[test]
    fn wrong_pattern_yields_incomplete_grid() {
        let truth = RowPattern {
            even: 8,
            odd: 9,
            rows: 5,
        };
        let input = scramble(&deltille_rows(truth).concat());
        let wrong = RowPattern {
            even: 9,
            odd: 8,
            rows: 5,
        };
        let grid = order_grid_rows(&input, wrong, 2.0);
        assert_ne!(grid.len(), wrong.total());
    }

    #[test]
    fn empty_input_gives_empty_grid() {
        let grid = order_grid_rows(&[], RowPattern::uniform(5, 4), 2.0);
        assert!(grid.is_empty());
        assert!(grid.row_lengths.is_empty());
    }
}
