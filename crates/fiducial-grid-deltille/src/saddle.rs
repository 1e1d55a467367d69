use fiducial_grid_core::GrayImageView;
use nalgebra::Point2;

/// Source of raw subpixel saddle points (monkey saddles on a deltille board).
///
/// Implementations return points in any order; ordering and validation
/// happen downstream. Closures `Fn(&GrayImageView) -> Vec<Point2<f32>>`
/// implement this trait, which keeps tests free of a real detector.
pub trait SaddlePointDetector {
    fn find_saddle_points(&self, image: &GrayImageView<'_>) -> Vec<Point2<f32>>;
}

impl<F> SaddlePointDetector for F
where
    F: Fn(&GrayImageView<'_>) -> Vec<Point2<f32>>,
{
    fn find_saddle_points(&self, image: &GrayImageView<'_>) -> Vec<Point2<f32>> {
        self(image)
    }
}

/// Always returns the same points, regardless of the image.
#[derive(Clone, Debug, Default)]
pub struct FixedSaddlePoints(pub Vec<Point2<f32>>);

impl SaddlePointDetector for FixedSaddlePoints {
    fn find_saddle_points(&self, _image: &GrayImageView<'_>) -> Vec<Point2<f32>> {
        self.0.clone()
    }
}
