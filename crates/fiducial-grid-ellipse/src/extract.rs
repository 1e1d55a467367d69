//! Concentric contour pairs to marker candidates.

use fiducial_grid_core::{CandidatePoint, GrayImageView, Overlay, Rgb};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::contours::{find_contour_tree, Contour};
use crate::fit::fit_contour;
use crate::morph::erode;
use crate::params::ExtractParams;

/// Candidates from an already traced contour tree.
///
/// A contour qualifies when it has a parent and at least
/// `min_contour_points` points. If its first child also has enough points
/// and both ellipse centers are closer than `concentricity_ratio` times the
/// child radius, the outer ellipse becomes a candidate tagged with the
/// contour's parent. Qualifying contours without a child are only drawn.
pub fn candidates_from_contours(
    contours: &[Contour],
    params: &ExtractParams,
    overlay: &mut dyn Overlay,
) -> Vec<CandidatePoint> {
    let mut out = Vec::new();
    for contour in contours {
        let Some(parent) = contour.parent else {
            continue;
        };
        if contour.len() < params.min_contour_points {
            continue;
        }
        let Some(outer) = fit_contour(contour) else {
            continue;
        };

        let Some(child_idx) = contour.first_child else {
            overlay.ellipse(&outer, Rgb::MAGENTA);
            continue;
        };
        let child = &contours[child_idx];
        if child.len() < params.min_contour_points {
            continue;
        }
        let Some(inner) = fit_contour(child) else {
            continue;
        };

        let offset = nalgebra::distance(&outer.center, &inner.center);
        if offset < inner.mean_radius() * params.concentricity_ratio {
            out.push(CandidatePoint {
                position: outer.center,
                radius: outer.mean_radius(),
                parent: Some(parent),
            });
            overlay.ellipse(&outer, Rgb::YELLOW);
        }
    }
    out
}

/// Erode `mask`, trace its contour tree and collect concentric candidates.
pub fn extract_candidates(
    mask: &GrayImageView<'_>,
    params: &ExtractParams,
    overlay: &mut dyn Overlay,
) -> Vec<CandidatePoint> {
    extract_with_contours(mask, params, overlay).1
}

/// [`extract_candidates`] that also returns the traced contour tree, whose
/// indices the candidates' `parent` ids refer to.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask, params, overlay), fields(w = mask.width, h = mask.height))
)]
pub fn extract_with_contours(
    mask: &GrayImageView<'_>,
    params: &ExtractParams,
    overlay: &mut dyn Overlay,
) -> (Vec<Contour>, Vec<CandidatePoint>) {
    let eroded = erode(mask, params.erosion_radius);
    let contours = find_contour_tree(&eroded.view());
    let candidates = candidates_from_contours(&contours, params, overlay);
    log::debug!(
        "{} concentric candidates from {} contours",
        candidates.len(),
        contours.len()
    );
    (contours, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiducial_grid_core::{GrayImage, NoOverlay, RecordingOverlay};

    fn disk(img: &mut GrayImage, cx: f32, cy: f32, r: f32, v: u8) {
        for y in 0..img.height {
            for x in 0..img.width {
                let (dx, dy) = (x as f32 - cx, y as f32 - cy);
                if dx * dx + dy * dy <= r * r {
                    img.set(x, y, v);
                }
            }
        }
    }

    fn paper_with_ring(center_offset: f32) -> GrayImage {
        let mut img = GrayImage::new(80, 80);
        for y in 5..75 {
            for x in 5..75 {
                img.set(x, y, 255);
            }
        }
        disk(&mut img, 40.0, 40.0, 16.0, 0);
        disk(&mut img, 40.0 + center_offset, 40.0, 7.0, 255);
        img
    }

    #[test]
    fn concentric_ring_yields_one_candidate() {
        let img = paper_with_ring(0.0);
        let mut rec = RecordingOverlay::default();
        let found = extract_candidates(&img.view(), &ExtractParams::default(), &mut rec);
        assert_eq!(found.len(), 1);
        let c = found[0];
        assert!((c.position.x - 40.0).abs() < 0.5);
        assert!((c.position.y - 40.0).abs() < 0.5);
        // Outer hole border sits just outside the eroded ring.
        assert!((c.radius - 19.0).abs() < 1.5, "radius {}", c.radius);
        assert_eq!(c.parent, Some(0));
        assert!(rec.ellipses.iter().any(|(_, col)| *col == Rgb::YELLOW));

        let (contours, again) =
            extract_with_contours(&img.view(), &ExtractParams::default(), &mut NoOverlay);
        assert_eq!(again, found);
        assert!(contours[0].first_child.is_some());
    }

    #[test]
    fn off_center_inner_blob_is_rejected() {
        let img = paper_with_ring(6.0);
        let found = extract_candidates(&img.view(), &ExtractParams::default(), &mut NoOverlay);
        assert!(found.is_empty());
    }

    #[test]
    fn plain_hole_is_drawn_but_not_accepted() {
        let mut img = GrayImage::new(60, 60);
        for y in 5..55 {
            for x in 5..55 {
                img.set(x, y, 255);
            }
        }
        disk(&mut img, 30.0, 30.0, 10.0, 0);
        let mut rec = RecordingOverlay::default();
        let found = extract_candidates(&img.view(), &ExtractParams::default(), &mut rec);
        assert!(found.is_empty());
        assert_eq!(rec.ellipses.len(), 1);
        assert_eq!(rec.ellipses[0].1, Rgb::MAGENTA);
    }

    fn ring_polygon(cx: i32, cy: i32, pts: &[(i32, i32)]) -> Vec<nalgebra::Point2<i32>> {
        pts.iter()
            .map(|&(x, y)| nalgebra::Point2::new(cx + x, cy + y))
            .collect()
    }

    #[test]
    fn five_point_contours_are_fitted() {
        let contours = vec![
            Contour {
                points: ring_polygon(0, 0, &[(0, 0), (99, 0), (99, 99), (0, 99)]),
                hole: false,
                parent: None,
                first_child: Some(1),
            },
            Contour {
                points: ring_polygon(
                    50,
                    50,
                    &[(20, 0), (6, 19), (-16, 12), (-16, -12), (6, -19)],
                ),
                hole: true,
                parent: Some(0),
                first_child: Some(2),
            },
            Contour {
                points: ring_polygon(50, 50, &[(10, 0), (3, 10), (-8, 6), (-8, -6), (3, -10)]),
                hole: false,
                parent: Some(1),
                first_child: None,
            },
        ];
        let found = candidates_from_contours(&contours, &ExtractParams::default(), &mut NoOverlay);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].parent, Some(0));
        assert!((found[0].position.x - 50.0).abs() < 1.0);
        assert!((found[0].position.y - 50.0).abs() < 1.0);
        assert!((found[0].radius - 20.0).abs() < 1.5, "radius {}", found[0].radius);
    }

    #[test]
    fn blank_mask_yields_nothing() {
        let img = GrayImage::new(32, 32);
        assert!(extract_candidates(&img.view(), &ExtractParams::default(), &mut NoOverlay).is_empty());
    }
}
