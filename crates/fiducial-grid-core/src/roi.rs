//! Oriented region of interest carried from one frame to the next.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::{centroid, min_area_rect};
use crate::image::{GrayImage, GrayImageView};

/// Quadrilateral restricting where the next frame is searched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiQuad {
    pub corners: [Point2<f32>; 4],
}

impl RoiQuad {
    /// The whole frame, i.e. no restriction.
    pub fn full_frame(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            corners: [
                Point2::new(0.0, 0.0),
                Point2::new(w, 0.0),
                Point2::new(w, h),
                Point2::new(0.0, h),
            ],
        }
    }

    /// Minimum-area rectangle around `points`, scaled by `scale` about its
    /// own centroid. `None` for an empty point set.
    pub fn around_points(points: &[Point2<f32>], scale: f32) -> Option<Self> {
        let rect = min_area_rect(points)?;
        let center = centroid(&rect)?;
        Some(Self {
            corners: rect.map(|c| center + (c - center) * scale),
        })
    }

    pub fn centroid(&self) -> Point2<f32> {
        let sum = self
            .corners
            .iter()
            .fold(nalgebra::Vector2::zeros(), |acc, c| acc + c.coords);
        Point2::from(sum / 4.0)
    }

    /// Whether `p` lies inside the quad (boundary included).
    ///
    /// Works for either winding; degenerate quads contain only points on
    /// their boundary.
    pub fn contains(&self, p: Point2<f32>) -> bool {
        let mut sign = 0.0f32;
        for k in 0..4 {
            let a = self.corners[k];
            let b = self.corners[(k + 1) % 4];
            let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Copy of `src` with every pixel whose center falls outside the quad set to zero.
    pub fn mask_image(&self, src: &GrayImageView<'_>) -> GrayImage {
        let mut out = GrayImage::new(src.width, src.height);
        if src.is_empty() {
            return out;
        }

        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for c in &self.corners {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil().max(0.0) as usize).min(src.width);
        let y1 = (max_y.ceil().max(0.0) as usize).min(src.height);

        for y in y0..y1 {
            let row = y * src.width;
            for x in x0..x1 {
                if self.contains(Point2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    out.data[row + x] = src.data[row + x];
                }
            }
        }
        out
    }
}
