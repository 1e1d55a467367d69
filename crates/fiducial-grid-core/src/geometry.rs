//! Planar geometry primitives shared by both board paths.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Degrades to the point distance `|p - a|` when `a == b`.
pub fn point_to_line_perpendicular(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let d = b - a;
    let len = d.norm();
    if len == 0.0 {
        return nalgebra::distance(&a, &p);
    }
    (d.y * p.x - d.x * p.y + b.x * a.y - b.y * a.x).abs() / len
}

/// Distance from `p` to the closest point of the segment `[a, b]`.
///
/// The projection parameter is clamped to `[0, 1]`; when `a == b` this is
/// the point distance `|p - a|`.
pub fn point_to_segment_clamped(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let d = b - a;
    let l2 = d.norm_squared();
    if l2 == 0.0 {
        return nalgebra::distance(&a, &p);
    }
    let t = ((p - a).dot(&d) / l2).clamp(0.0, 1.0);
    nalgebra::distance(&p, &(a + d * t))
}

/// Arithmetic mean of a point set, `None` when empty.
pub fn centroid(points: &[Point2<f32>]) -> Option<Point2<f32>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f32>, p| acc + p.coords);
    Some(Point2::from(sum / points.len() as f32))
}

#[inline]
fn cross(o: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull (monotone chain), counter-clockwise in a y-up frame.
///
/// Duplicate points are removed; collinear boundary points are dropped.
pub fn convex_hull(points: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let mut pts: Vec<Point2<f32>> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup();
    if pts.len() <= 2 {
        return pts;
    }

    let mut lower: Vec<Point2<f32>> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2<f32>> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Minimum-area enclosing rectangle (rotating calipers over the hull).
///
/// Returns the four corners in traversal order, or `None` for an empty
/// input. Collinear inputs give a zero-width rectangle.
pub fn min_area_rect(points: &[Point2<f32>]) -> Option<[Point2<f32>; 4]> {
    let hull = convex_hull(points);
    match hull.len() {
        0 => return None,
        1 => return Some([hull[0]; 4]),
        _ => {}
    }

    let mut best: Option<(f32, [Point2<f32>; 4])> = None;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let edge = b - a;
        let len = edge.norm();
        if len == 0.0 {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);

        let (mut min_u, mut max_u) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f32::INFINITY, f32::NEG_INFINITY);
        for &p in &hull {
            let d = p - a;
            let pu = d.dot(&u);
            let pv = d.dot(&v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.map(|(best_area, _)| area < best_area).unwrap_or(true) {
            let corner = |su: f32, sv: f32| a + u * su + v * sv;
            best = Some((
                area,
                [
                    corner(min_u, min_v),
                    corner(max_u, min_v),
                    corner(max_u, max_v),
                    corner(min_u, max_v),
                ],
            ));
        }
    }
    best.map(|(_, corners)| corners)
}

/// Geometric ellipse in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point2<f32>,
    pub semi_major: f32,
    pub semi_minor: f32,
    /// Rotation of the major axis from +x, radians.
    pub angle: f32,
}

impl Ellipse {
    /// Mean semi-axis, i.e. a quarter of the summed full axis lengths.
    #[inline]
    pub fn mean_radius(&self) -> f32 {
        0.5 * (self.semi_major + self.semi_minor)
    }

    /// `n` points evenly spaced in the parametric angle.
    pub fn sample_points(&self, n: usize) -> Vec<Point2<f32>> {
        let (sin_a, cos_a) = self.angle.sin_cos();
        (0..n)
            .map(|i| {
                let t = std::f32::consts::TAU * i as f32 / n as f32;
                let px = self.semi_major * t.cos();
                let py = self.semi_minor * t.sin();
                Point2::new(
                    self.center.x + cos_a * px - sin_a * py,
                    self.center.y + sin_a * px + cos_a * py,
                )
            })
            .collect()
    }
}
