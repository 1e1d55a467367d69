use fiducial_grid_core::{GrayImage, NoOverlay, RecordingOverlay};
use fiducial_grid_ellipse::{
    binarize, extract_candidates, EllipseBoardDetector, EllipseBoardParams, ThresholdMode,
    TieBreak,
};
use nalgebra::Point2;

const BACKGROUND: u8 = 30;
const PAPER: u8 = 220;
const INK: u8 = 20;

fn fill_rect(img: &mut GrayImage, x0: usize, y0: usize, x1: usize, y1: usize, v: u8) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.set(x, y, v);
        }
    }
}

fn ring(img: &mut GrayImage, c: Point2<f32>, outer: f32, inner: f32) {
    for y in 0..img.height {
        for x in 0..img.width {
            let d = nalgebra::distance(&c, &Point2::new(x as f32, y as f32));
            if d <= inner {
                img.set(x, y, PAPER);
            } else if d <= outer {
                img.set(x, y, INK);
            }
        }
    }
}

fn board_centers() -> Vec<Point2<f32>> {
    let mut centers = Vec::new();
    for r in 0..4 {
        for c in 0..5 {
            centers.push(Point2::new(40.0 + 40.0 * c as f32, 40.0 + 40.0 * r as f32));
        }
    }
    centers
}

/// 4 x 5 ring board on a sheet, optionally with a second sheet carrying three rings.
fn render(skip: Option<usize>, distractor: bool) -> GrayImage {
    let mut img = GrayImage {
        width: 400,
        height: 240,
        data: vec![BACKGROUND; 400 * 240],
    };
    fill_rect(&mut img, 10, 10, 230, 190, PAPER);
    for (k, c) in board_centers().into_iter().enumerate() {
        if Some(k) != skip {
            ring(&mut img, c, 13.0, 6.0);
        }
    }
    if distractor {
        fill_rect(&mut img, 260, 10, 390, 110, PAPER);
        for c in [
            Point2::new(290.0, 40.0),
            Point2::new(330.0, 40.0),
            Point2::new(290.0, 80.0),
        ] {
            ring(&mut img, c, 13.0, 6.0);
        }
    }
    img
}

fn detect(img: &GrayImage, params: EllipseBoardParams) -> fiducial_grid_ellipse::EllipseBoardDetection {
    let mask = binarize(&img.view(), ThresholdMode::Otsu, false);
    EllipseBoardDetector::new(params).detect(&mask.view(), &mut NoOverlay)
}

#[test]
fn full_board_is_found() {
    let det = detect(&render(None, false), EllipseBoardParams::default());
    assert!(det.found);
    assert_eq!(det.points.len(), 20);
    assert_eq!(det.mode, None, "hierarchy filter only runs above the target");

    for c in board_centers() {
        assert!(
            det.points
                .iter()
                .any(|p| nalgebra::distance(&p.position, &c) < 0.5),
            "no candidate near {c:?}"
        );
    }
    let r = det.mean_radius.expect("radius");
    assert!(r > 13.0 && r < 18.0, "mean radius {r}");
    let parent = det.points[0].parent;
    assert!(det.points.iter().all(|p| p.parent == parent));
}

#[test]
fn foreign_sheet_is_voted_out() {
    for tie_break in [TieBreak::FirstSeen, TieBreak::LastSeen] {
        let params = EllipseBoardParams {
            tie_break,
            ..EllipseBoardParams::default()
        };
        let det = detect(&render(None, true), params);
        assert_eq!(det.candidates.len(), 23);
        assert!(det.mode.is_some());
        assert!(det.found);
        assert!(det.points.iter().all(|p| p.position.x < 240.0));
    }
}

#[test]
fn detector_candidates_match_plain_extraction() {
    let img = render(None, true);
    let mask = binarize(&img.view(), ThresholdMode::Otsu, false);
    let params = EllipseBoardParams::default();
    let det = EllipseBoardDetector::new(params.clone()).detect(&mask.view(), &mut NoOverlay);
    let plain = extract_candidates(&mask.view(), &params.extract, &mut NoOverlay);
    assert_eq!(det.candidates, plain);
}

#[test]
fn missing_ring_is_not_found() {
    let det = detect(&render(Some(7), false), EllipseBoardParams::default());
    assert_eq!(det.points.len(), 19);
    assert!(!det.found);
}

#[test]
fn held_grid_draws_edges() {
    let det = detect(&render(None, false), EllipseBoardParams::default());
    let detector = EllipseBoardDetector::default();
    let mut rec = RecordingOverlay::default();
    detector.draw_grid(&mut rec, &det.points);
    // 4 rows of 5 rings, linked end to start.
    assert_eq!(rec.lines.len(), 7);

    let mut none = RecordingOverlay::default();
    detector.draw_grid(&mut none, &det.points[..10]);
    assert!(none.lines.is_empty());
}
