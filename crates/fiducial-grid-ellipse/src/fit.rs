//! Direct least-squares ellipse fit (Fitzgibbon, Pilu & Fisher, 1999).

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

use fiducial_grid_core::Ellipse;
use nalgebra::{Matrix3, Matrix6, Point2, Vector3, Vector6};

use crate::contours::Contour;

/// Fewest points the direct fit accepts; five points pin down a conic exactly.
pub const MIN_FIT_POINTS: usize = 5;

/// Fit an ellipse to `points`.
///
/// Coordinates are shifted to their centroid and scaled to a mean radius of
/// √2 before building the scatter matrix. Returns `None` for too few or
/// degenerate points and when the best conic is not a real ellipse.
pub fn fit_ellipse(points: &[Point2<f64>]) -> Option<Ellipse> {
    if points.len() < MIN_FIT_POINTS {
        return None;
    }
    let (mx, my, scale) = normalization(points);

    let mut s = Matrix6::<f64>::zeros();
    for p in points {
        let x = (p.x - mx) * scale;
        let y = (p.y - my) * scale;
        let row = Vector6::new(x * x, x * y, y * y, x, y, 1.0);
        s += row * row.transpose();
    }

    let s11: Matrix3<f64> = s.fixed_view::<3, 3>(0, 0).into_owned();
    let s12: Matrix3<f64> = s.fixed_view::<3, 3>(0, 3).into_owned();
    let s22: Matrix3<f64> = s.fixed_view::<3, 3>(3, 3).into_owned();

    let s22_inv = s22.try_inverse()?;
    let t = -s22_inv * s12.transpose();
    let m = s11 + s12 * t;

    // C1⁻¹ M with C1 = [[0, 0, 2], [0, -1, 0], [2, 0, 0]].
    let reduced = Matrix3::new(
        m[(2, 0)] / 2.0,
        m[(2, 1)] / 2.0,
        m[(2, 2)] / 2.0,
        -m[(1, 0)],
        -m[(1, 1)],
        -m[(1, 2)],
        m[(0, 0)] / 2.0,
        m[(0, 1)] / 2.0,
        m[(0, 2)] / 2.0,
    );

    let a1 = elliptic_eigenvector(&reduced)?;
    let a2 = t * a1;
    let conic = denormalize(
        &Vector6::new(a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]),
        mx,
        my,
        scale,
    );
    conic_to_ellipse(&conic)
}

/// [`fit_ellipse`] over a contour's pixel chain.
pub fn fit_contour(contour: &Contour) -> Option<Ellipse> {
    let pts: Vec<Point2<f64>> = contour
        .points
        .iter()
        .map(|p| Point2::new(p.x as f64, p.y as f64))
        .collect();
    fit_ellipse(&pts)
}

fn normalization(points: &[Point2<f64>]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x - mx).powi(2) + (p.y - my).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let scale = if mean_dist > 1e-12 {
        SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mx, my, scale)
}

/// Eigenvector of `a` satisfying `4 v0 v2 - v1² > 0`, smallest |λ| first.
fn elliptic_eigenvector(a: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let tr = a.trace();
    let minors = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)] + a[(0, 0)] * a[(2, 2)]
        - a[(0, 2)] * a[(2, 0)]
        + a[(1, 1)] * a[(2, 2)]
        - a[(1, 2)] * a[(2, 1)];
    let det = a.determinant();

    let mut best: Option<(f64, Vector3<f64>)> = None;
    for ev in cubic_real_roots(-tr, minors, -det) {
        let Some(v) = null_vector(&(a - Matrix3::identity() * ev)) else {
            continue;
        };
        if 4.0 * v[0] * v[2] - v[1] * v[1] <= 0.0 {
            continue;
        }
        if best.map_or(true, |(b, _)| ev.abs() < b) {
            best = Some((ev.abs(), v));
        }
    }
    best.map(|(_, v)| v)
}

/// Largest row of the adjugate; proportional to the null vector of a rank-2 matrix.
fn null_vector(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let r0 = m.row(0).transpose();
    let r1 = m.row(1).transpose();
    let r2 = m.row(2).transpose();
    let candidates = [r1.cross(&r2), r2.cross(&r0), r0.cross(&r1)];
    let best = candidates
        .iter()
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let n = best.norm();
    (n > 1e-15).then(|| best / n)
}

/// Real roots of `x³ + b x² + c x + d`.
fn cubic_real_roots(b: f64, c: f64, d: f64) -> Vec<f64> {
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let shift = -b / 3.0;

    if 4.0 * p * p * p + 27.0 * q * q <= 0.0 {
        let r = (-p / 3.0).sqrt();
        let cos_arg = if r < 1e-15 {
            0.0
        } else {
            (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0)
        };
        let theta = cos_arg.acos();
        (0..3)
            .map(|k| 2.0 * r * ((theta + 2.0 * PI * k as f64) / 3.0).cos() + shift)
            .collect()
    } else {
        let sq = (q * q / 4.0 + p * p * p / 27.0).sqrt();
        vec![(-q / 2.0 + sq).cbrt() + (-q / 2.0 - sq).cbrt() + shift]
    }
}

/// Undo `x' = s (x - mx)`, `y' = s (y - my)` on `[A, B, C, D, E, F]`.
fn denormalize(c: &Vector6<f64>, mx: f64, my: f64, s: f64) -> [f64; 6] {
    let (a_, b_, c_, d_, e_, f_) = (c[0], c[1], c[2], c[3], c[4], c[5]);
    let s2 = s * s;
    [
        a_ * s2,
        b_ * s2,
        c_ * s2,
        -2.0 * a_ * s2 * mx - b_ * s2 * my + d_ * s,
        -b_ * s2 * mx - 2.0 * c_ * s2 * my + e_ * s,
        a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my - d_ * s * mx - e_ * s * my
            + f_,
    ]
}

fn conic_to_ellipse(&[a, b, c, d, e, f]: &[f64; 6]) -> Option<Ellipse> {
    let denom = 4.0 * a * c - b * b;
    if denom <= 0.0 {
        return None;
    }
    let cx = (b * e - 2.0 * c * d) / denom;
    let cy = (b * d - 2.0 * a * e) / denom;
    let f0 = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;

    let sum = a + c;
    let diff = ((a - c).powi(2) + b * b).sqrt();
    let l1 = (sum + diff) / 2.0;
    let l2 = (sum - diff) / 2.0;
    let a_sq = -f0 / l1;
    let b_sq = -f0 / l2;
    if !(a_sq > 0.0 && b_sq > 0.0) {
        return None;
    }

    // Axis of eigenvalue l1 (the shorter one when F' < 0).
    let mut angle = 0.5 * b.atan2(a - c);
    let (mut major, mut minor) = (a_sq.sqrt(), b_sq.sqrt());
    if major < minor {
        std::mem::swap(&mut major, &mut minor);
        angle += FRAC_PI_2;
    }
    while angle > FRAC_PI_2 {
        angle -= PI;
    }
    while angle <= -FRAC_PI_2 {
        angle += PI;
    }

    let ellipse = Ellipse {
        center: nalgebra::Point2::new(cx as f32, cy as f32),
        semi_major: major as f32,
        semi_minor: minor as f32,
        angle: angle as f32,
    };
    let finite = ellipse.center.x.is_finite()
        && ellipse.center.y.is_finite()
        && ellipse.semi_major.is_finite()
        && ellipse.angle.is_finite();
    finite.then_some(ellipse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(cx: f64, cy: f64, a: f64, b: f64, angle: f64, n: usize) -> Vec<Point2<f64>> {
        let (s, c) = angle.sin_cos();
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / n as f64;
                let (x, y) = (a * t.cos(), b * t.sin());
                Point2::new(cx + c * x - s * y, cy + s * x + c * y)
            })
            .collect()
    }

    #[test]
    fn recovers_a_circle() {
        let e = fit_ellipse(&sample(50.0, 40.0, 12.0, 12.0, 0.0, 40)).expect("fit");
        assert_relative_eq!(e.center.x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(e.center.y, 40.0, epsilon = 1e-3);
        assert_relative_eq!(e.mean_radius(), 12.0, epsilon = 1e-3);
    }

    #[test]
    fn recovers_a_rotated_ellipse() {
        let e = fit_ellipse(&sample(-20.0, 310.0, 30.0, 10.0, 0.4, 64)).expect("fit");
        assert_relative_eq!(e.center.x, -20.0, epsilon = 1e-2);
        assert_relative_eq!(e.center.y, 310.0, epsilon = 1e-2);
        assert_relative_eq!(e.semi_major, 30.0, epsilon = 1e-2);
        assert_relative_eq!(e.semi_minor, 10.0, epsilon = 1e-2);
        assert_relative_eq!(e.angle, 0.4, epsilon = 1e-3);
    }

    #[test]
    fn fit_of_a_traced_disk_is_centered() {
        let mut img = fiducial_grid_core::GrayImage::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                let (dx, dy) = (x as f32 - 20.0, y as f32 - 18.0);
                if dx * dx + dy * dy <= 100.0 {
                    img.set(x, y, 255);
                }
            }
        }
        let contours = crate::contours::find_contour_tree(&img.view());
        let e = fit_contour(&contours[0]).expect("fit");
        assert_relative_eq!(e.center.x, 20.0, epsilon = 0.2);
        assert_relative_eq!(e.center.y, 18.0, epsilon = 0.2);
        assert!((e.mean_radius() - 10.0).abs() < 1.0);
    }

    #[test]
    fn five_points_give_the_exact_conic() {
        let pts = sample(30.0, 40.0, 20.0, 12.0, 0.3, 5);
        let e = fit_ellipse(&pts).expect("fit of 5 points");
        assert_relative_eq!(e.center.x, 30.0, epsilon = 1e-3);
        assert_relative_eq!(e.center.y, 40.0, epsilon = 1e-3);
        assert_relative_eq!(e.semi_major, 20.0, epsilon = 1e-3);
        assert_relative_eq!(e.semi_minor, 12.0, epsilon = 1e-3);
        assert_relative_eq!(e.angle, 0.3, epsilon = 1e-3);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(fit_ellipse(&sample(0.0, 0.0, 5.0, 5.0, 0.0, 4)).is_none());
        let same = vec![Point2::new(3.0, 4.0); 10];
        assert!(fit_ellipse(&same).is_none());
    }
}
