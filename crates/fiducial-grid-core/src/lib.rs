//! Core types and geometry for fiducial grid tracking.
//!
//! This crate knows nothing about how marker candidates are found. It holds
//! the shared vocabulary (points, ordered grids, ROI quads), the collinear
//! clustering that recovers rows from an unordered point cloud, the
//! row-major orderer built on it, and the per-pipeline hysteresis state.
//!
//! ```
//! use fiducial_grid_core::{order_grid_rows, RowPattern};
//! use nalgebra::Point2;
//!
//! let pts = vec![
//!     Point2::new(10.0, 0.0),
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 10.0),
//!     Point2::new(10.0, 10.0),
//! ];
//! let grid = order_grid_rows(&pts, RowPattern::uniform(2, 2), 0.5);
//! assert_eq!(grid.points[0], Point2::new(0.0, 10.0));
//! assert_eq!(grid.len(), 4);
//! ```

mod geometry;
mod image;
mod lines;
mod logger;
mod ordering;
mod overlay;
mod point;
mod roi;
mod tracking;

pub use geometry::{
    centroid, convex_hull, min_area_rect, point_to_line_perpendicular, point_to_segment_clamped,
    Ellipse,
};
pub use image::{GrayImage, GrayImageView};
pub use lines::{
    collinear_groups, line_members, peel_disjoint_lines, LineClusterParams, LineDistance,
};
pub use ordering::{order_grid_rows, RowPattern};
pub use overlay::{NoOverlay, Overlay, RecordingOverlay, Rgb};
pub use point::{CandidatePoint, OrderedGrid, Positioned};
pub use roi::RoiQuad;
pub use tracking::{
    DetectionState, FrameStatus, StabilizedFrame, StabilizerParams, TemporalStabilizer,
};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, init_tracing_with_level};

pub use logger::{init_with_level, parse_level};
