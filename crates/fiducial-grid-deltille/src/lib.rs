//! Deltille board ordering.
//!
//! A deltille board is a triangular tiling whose inner corners are monkey
//! saddles. Finding the saddles is delegated to a [`SaddlePointDetector`];
//! this crate orders whatever comes back into canonical rows (alternating
//! 8 and 9 points on the default 42-point board) and decides whether the
//! full board was seen.
//!
//! ```
//! use fiducial_grid_core::GrayImage;
//! use fiducial_grid_deltille::{DeltilleDetector, DeltilleParams, FixedSaddlePoints};
//!
//! let detector = DeltilleDetector::new(DeltilleParams::default(), FixedSaddlePoints::default());
//! let det = detector.detect(&GrayImage::new(32, 32).view());
//! assert!(!det.found);
//! assert!(det.grid.is_empty());
//! ```

mod detector;
mod draw;
mod params;
mod saddle;

pub use detector::{DeltilleDetection, DeltilleDetector};
pub use draw::draw_ordered_grid;
pub use params::DeltilleParams;
pub use saddle::{FixedSaddlePoints, SaddlePointDetector};
