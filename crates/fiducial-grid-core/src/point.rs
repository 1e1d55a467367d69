use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Anything that has an image-space location.
pub trait Positioned {
    fn position(&self) -> Point2<f32>;
}

impl Positioned for Point2<f32> {
    #[inline]
    fn position(&self) -> Point2<f32> {
        *self
    }
}

/// Raw marker candidate produced by an extractor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidatePoint {
    /// Marker center in image pixels.
    pub position: Point2<f32>,
    /// Mean semi-axis of the outer ellipse; `0.0` when the source has no notion of size.
    pub radius: f32,
    /// Contour-tree parent of the contour that produced this candidate.
    ///
    /// Candidates that share a parent come from the same enclosing board region.
    pub parent: Option<usize>,
}

impl CandidatePoint {
    pub fn new(x: f32, y: f32, radius: f32, parent: Option<usize>) -> Self {
        Self {
            position: Point2::new(x, y),
            radius,
            parent,
        }
    }

    /// Point-like candidate without size or hierarchy information.
    pub fn from_point(position: Point2<f32>) -> Self {
        Self {
            position,
            radius: 0.0,
            parent: None,
        }
    }

    #[inline]
    pub fn distance(&self, other: &CandidatePoint) -> f32 {
        nalgebra::distance(&self.position, &other.position)
    }
}

impl Positioned for CandidatePoint {
    #[inline]
    fn position(&self) -> Point2<f32> {
        self.position
    }
}

/// Grid points in row-major canonical order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderedGrid {
    pub points: Vec<Point2<f32>>,
    /// `source[k]` is the index of `points[k]` in the slice the grid was built from.
    pub source: Vec<usize>,
    /// Number of points in each accepted row, in output order.
    pub row_lengths: Vec<usize>,
}

impl OrderedGrid {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate rows as slices of `points`.
    pub fn rows(&self) -> impl Iterator<Item = &[Point2<f32>]> + '_ {
        let mut start = 0;
        self.row_lengths.iter().map(move |&len| {
            let row = &self.points[start..start + len];
            start += len;
            row
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_split_points_by_lengths() {
        let grid = OrderedGrid {
            points: (0..5).map(|i| Point2::new(i as f32, 0.0)).collect(),
            source: (0..5).collect(),
            row_lengths: vec![2, 3],
        };
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1][0], Point2::new(2.0, 0.0));
    }

    #[test]
    fn candidate_distance_is_euclidean() {
        let a = CandidatePoint::new(0.0, 0.0, 1.0, Some(3));
        let b = CandidatePoint::new(3.0, 4.0, 1.0, Some(3));
        assert_eq!(a.distance(&b), 5.0);
    }
}
