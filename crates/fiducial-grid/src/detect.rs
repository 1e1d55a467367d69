//! `image` crate glue: views, a ChESS saddle source and an RGB canvas.

use chess_corners::{find_chess_corners_image, ChessConfig};
use fiducial_grid_core::{GrayImageView, Overlay, Rgb};
use fiducial_grid_deltille::{DeltilleDetector, DeltilleParams, SaddlePointDetector};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the buffer helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },
}

/// ChESS settings that work on the synthetic boards used in tests.
pub fn default_chess_config() -> ChessConfig {
    let mut cfg = ChessConfig::single_scale();
    cfg.params.threshold_rel = 0.2;
    cfg.params.nms_radius = 2;
    cfg
}

/// Borrow an `image::GrayImage` as a core view.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidGrayDimensions { width, height })
}

/// Saddle points from the ChESS X-junction detector.
///
/// Deltille monkey saddles respond to the ChESS operator like chessboard
/// X-junctions, so the corner positions serve as raw saddle estimates.
pub struct ChessSaddleSource {
    pub config: ChessConfig,
}

impl ChessSaddleSource {
    pub fn new(config: ChessConfig) -> Self {
        Self { config }
    }
}

impl Default for ChessSaddleSource {
    fn default() -> Self {
        Self::new(default_chess_config())
    }
}

impl SaddlePointDetector for ChessSaddleSource {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(w = image.width, h = image.height))
    )]
    fn find_saddle_points(&self, image: &GrayImageView<'_>) -> Vec<Point2<f32>> {
        let Ok(img) = gray_image_from_slice(image.width as u32, image.height as u32, image.data)
        else {
            log::warn!("frame buffer does not match {}x{}", image.width, image.height);
            return Vec::new();
        };
        find_chess_corners_image(&img, &self.config)
            .iter()
            .map(|c| Point2::new(c.x, c.y))
            .collect()
    }
}

/// Deltille detector backed by [`ChessSaddleSource::default`].
pub fn default_deltille_detector(params: DeltilleParams) -> DeltilleDetector<ChessSaddleSource> {
    DeltilleDetector::new(params, ChessSaddleSource::default())
}

/// Overlay drawing one-pixel lines on an RGB copy of a frame.
///
/// Labels are ignored.
#[derive(Clone, Debug)]
pub struct RgbCanvas {
    image: ::image::RgbImage,
}

impl RgbCanvas {
    pub fn from_gray(view: &GrayImageView<'_>) -> Self {
        let image = ::image::RgbImage::from_fn(view.width as u32, view.height as u32, |x, y| {
            let v = view.data[y as usize * view.width + x as usize];
            ::image::Rgb([v, v, v])
        });
        Self { image }
    }

    pub fn image(&self) -> &::image::RgbImage {
        &self.image
    }

    pub fn into_inner(self) -> ::image::RgbImage {
        self.image
    }

    fn plot(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image
                .put_pixel(x as u32, y as u32, ::image::Rgb([color.0, color.1, color.2]));
        }
    }
}

impl Overlay for RgbCanvas {
    fn line(&mut self, a: Point2<f32>, b: Point2<f32>, color: Rgb) {
        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
