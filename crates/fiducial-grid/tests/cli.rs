#![cfg(feature = "cli")]

use std::path::Path;

use assert_cmd::Command;
use fiducial_grid::io::{BoardKind, TrackerConfig, TrackingReport};
use fiducial_grid::FrameStatus;
use predicates::prelude::*;

fn save_ring_board(path: &Path) {
    let img = image::GrayImage::from_fn(400, 240, |x, y| {
        let (xf, yf) = (x as f32, y as f32);
        let mut v = if (10..=230).contains(&x) && (10..=190).contains(&y) {
            220
        } else {
            30
        };
        for r in 0..4 {
            for c in 0..5 {
                let (cx, cy) = (40.0 + 40.0 * c as f32, 40.0 + 40.0 * r as f32);
                let d = ((xf - cx).powi(2) + (yf - cy).powi(2)).sqrt();
                if d <= 6.0 {
                    v = 220;
                } else if d <= 13.0 {
                    v = 20;
                }
            }
        }
        image::Luma([v])
    });
    img.save(path).expect("save board");
}

fn save_blank(path: &Path) {
    image::GrayImage::from_pixel(400, 240, image::Luma([30]))
        .save(path)
        .expect("save blank");
}

#[test]
fn ellipse_run_writes_report_and_overlays() {
    let dir = tempfile::tempdir().expect("tempdir");
    save_ring_board(&dir.path().join("board.png"));
    save_blank(&dir.path().join("blank.png"));

    let cfg = TrackerConfig::new(
        BoardKind::Ellipse,
        vec![
            "board.png".into(),
            "blank.png".into(),
            "missing.png".into(),
            "blank.png".into(),
            "blank.png".into(),
        ],
    );
    let cfg_path = dir.path().join("cfg.json");
    cfg.write_json(&cfg_path).expect("write config");
    let report_path = dir.path().join("report.json");
    let overlays = dir.path().join("overlays");

    Command::cargo_bin("fiducial-grid")
        .expect("binary")
        .arg("--config")
        .arg(&cfg_path)
        .arg("--output")
        .arg(&report_path)
        .arg("--overlay-dir")
        .arg(&overlays)
        .arg("--log-level")
        .arg("warn")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 of 5 frames carried a grid"));

    let report = TrackingReport::load_json(&report_path).expect("report");
    assert_eq!(report.target_points, 20);
    let statuses: Vec<Option<FrameStatus>> = report.frames.iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![
            Some(FrameStatus::Fresh),
            Some(FrameStatus::Held { remaining: 1 }),
            None,
            Some(FrameStatus::Held { remaining: 0 }),
            Some(FrameStatus::Lost),
        ]
    );
    assert_eq!(report.frames[0].points.len(), 20);
    assert!(report.frames[2].error.is_some());
    assert!(overlays.join("frame_0000.png").exists());
    assert!(!overlays.join("frame_0002.png").exists());
}

#[test]
fn empty_frame_list_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg_path = dir.path().join("cfg.json");
    TrackerConfig::new(BoardKind::Deltille, Vec::new())
        .write_json(&cfg_path)
        .expect("write config");

    Command::cargo_bin("fiducial-grid")
        .expect("binary")
        .arg("--config")
        .arg(&cfg_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no frames"));
}

#[test]
fn missing_config_fails() {
    Command::cargo_bin("fiducial-grid")
        .expect("binary")
        .arg("--config")
        .arg("/nonexistent/fiducial-grid.json")
        .assert()
        .failure();
}

#[cfg(not(feature = "tracing"))]
#[test]
fn log_level_flag_controls_stderr_verbosity() {
    let dir = tempfile::tempdir().expect("tempdir");
    save_ring_board(&dir.path().join("board.png"));
    let cfg_path = dir.path().join("cfg.json");
    TrackerConfig::new(BoardKind::Ellipse, vec!["board.png".into()])
        .write_json(&cfg_path)
        .expect("write config");

    let run = |level: &str| {
        Command::cargo_bin("fiducial-grid")
            .expect("binary")
            .arg("--config")
            .arg(&cfg_path)
            .arg("--output")
            .arg(dir.path().join("report.json"))
            .arg("--log-level")
            .arg(level)
            .assert()
            .success()
    };

    run("debug").stderr(predicate::str::contains("DEBUG ellipse::threshold: binarize"));
    run("warn").stderr(predicate::str::contains("DEBUG").not());
}
