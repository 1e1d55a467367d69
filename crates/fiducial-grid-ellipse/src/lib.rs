//! Concentric-ring board extraction.
//!
//! The input is a binary mask in which the board is foreground and each
//! marker is a dark ring with a light center. After a light erosion the
//! contour tree of the mask is traced; a ring shows up as a hole border
//! whose first child is the light center. Pairs whose fitted ellipses are
//! concentric become [`CandidatePoint`](fiducial_grid_core::CandidatePoint)s
//! tagged with the contour that encloses the ring. Isolated candidates are
//! dropped and, when too many remain, only the largest group sharing an
//! enclosing contour is kept.
//!
//! ```
//! use fiducial_grid_core::{GrayImage, NoOverlay};
//! use fiducial_grid_ellipse::EllipseBoardDetector;
//!
//! let mask = GrayImage::new(64, 48);
//! let det = EllipseBoardDetector::default().detect(&mask.view(), &mut NoOverlay);
//! assert!(!det.found);
//! assert_eq!(det.mean_radius, None);
//! ```

mod contours;
mod detector;
mod edges;
mod extract;
mod filters;
mod fit;
mod morph;
mod params;
mod threshold;

pub use contours::{find_contour_tree, Contour};
pub use detector::{EllipseBoardDetection, EllipseBoardDetector};
pub use edges::{draw_ring_edges, ring_edges};
pub use extract::{candidates_from_contours, extract_candidates, extract_with_contours};
pub use filters::{
    filter_by_neighbor_density, hierarchy_mode, neighbor_links, retain_hierarchy_mode,
};
pub use fit::{fit_contour, fit_ellipse, MIN_FIT_POINTS};
pub use morph::{elliptical_kernel, erode};
pub use params::{DensityParams, EllipseBoardParams, ExtractParams, RingEdgeParams, TieBreak};
pub use threshold::{binarize, otsu_threshold, ThresholdMode};
