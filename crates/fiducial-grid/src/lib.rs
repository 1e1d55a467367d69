//! Facade crate for the `fiducial-grid-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core, ellipse-board and deltille crates
//! - per-pipeline trackers that mask each frame with the previous region of
//!   interest, run a detector and smooth the result with
//!   [`TemporalStabilizer`](fiducial_grid_core::TemporalStabilizer)
//! - JSON configuration and report types ([`io`])
//! - (feature `image`) adapters for `image::GrayImage`, a saddle source backed
//!   by `chess-corners` and an RGB overlay canvas ([`detect`])
//!
//! ## Quickstart
//!
//! ```no_run
//! use fiducial_grid::{EllipseBoardTracker, NoOverlay};
//! use fiducial_grid::ellipse::EllipseBoardParams;
//! use fiducial_grid::core::StabilizerParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = EllipseBoardTracker::new(EllipseBoardParams::default(), StabilizerParams::default());
//! for path in ["f0.png", "f1.png"] {
//!     let img = image::open(path)?.to_luma8();
//!     let frame = tracker.process(&fiducial_grid::detect::gray_view(&img), &mut NoOverlay);
//!     println!("{path}: {:?} with {} points", frame.status, frame.points.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `fiducial_grid::core`: images, points, line clustering, row ordering, ROI, hysteresis.
//! - `fiducial_grid::ellipse`: concentric-ring board extraction and filters.
//! - `fiducial_grid::deltille`: saddle-source abstraction and deltille ordering.
//! - `fiducial_grid::detect` (feature `image`): `image` crate glue.

pub use fiducial_grid_core as core;
pub use fiducial_grid_deltille as deltille;
pub use fiducial_grid_ellipse as ellipse;

pub use fiducial_grid_core::{
    CandidatePoint, FrameStatus, NoOverlay, OrderedGrid, Overlay, RoiQuad, StabilizerParams,
};

pub mod io;
mod tracker;

pub use tracker::{DeltilleTracker, EllipseBoardTracker, TrackedFrame};

#[cfg(feature = "image")]
pub mod detect;
