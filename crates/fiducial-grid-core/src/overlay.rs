//! Diagnostic drawing surface.
//!
//! Detectors draw what they saw through this trait; nothing downstream
//! depends on it. Pass [`NoOverlay`] to skip drawing entirely.

use nalgebra::Point2;

use crate::geometry::Ellipse;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

pub trait Overlay {
    fn line(&mut self, a: Point2<f32>, b: Point2<f32>, color: Rgb);

    fn ellipse(&mut self, ellipse: &Ellipse, color: Rgb) {
        let pts = ellipse.sample_points(32);
        for k in 0..pts.len() {
            self.line(pts[k], pts[(k + 1) % pts.len()], color);
        }
    }

    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgb) {
        self.ellipse(
            &Ellipse {
                center,
                semi_major: radius,
                semi_minor: radius,
                angle: 0.0,
            },
            color,
        );
    }

    fn cross(&mut self, center: Point2<f32>, half: f32, color: Rgb) {
        self.line(
            Point2::new(center.x - half, center.y),
            Point2::new(center.x + half, center.y),
            color,
        );
        self.line(
            Point2::new(center.x, center.y - half),
            Point2::new(center.x, center.y + half),
            color,
        );
    }

    /// Text annotation; surfaces without a font ignore it.
    fn label(&mut self, _at: Point2<f32>, _text: &str, _color: Rgb) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    #[inline]
    fn line(&mut self, _a: Point2<f32>, _b: Point2<f32>, _color: Rgb) {}

    #[inline]
    fn ellipse(&mut self, _ellipse: &Ellipse, _color: Rgb) {}
}

/// Records drawing calls, for tests and headless diagnostics.
#[derive(Clone, Debug, Default)]
pub struct RecordingOverlay {
    pub lines: Vec<(Point2<f32>, Point2<f32>, Rgb)>,
    pub ellipses: Vec<(Ellipse, Rgb)>,
    pub labels: Vec<(Point2<f32>, String)>,
}

impl Overlay for RecordingOverlay {
    fn line(&mut self, a: Point2<f32>, b: Point2<f32>, color: Rgb) {
        self.lines.push((a, b, color));
    }

    fn ellipse(&mut self, ellipse: &Ellipse, color: Rgb) {
        self.ellipses.push((*ellipse, color));
    }

    fn label(&mut self, at: Point2<f32>, text: &str, _color: Rgb) {
        self.labels.push((at, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_is_two_lines() {
        let mut rec = RecordingOverlay::default();
        rec.cross(Point2::new(5.0, 5.0), 2.0, Rgb::RED);
        assert_eq!(rec.lines.len(), 2);
        assert_eq!(rec.lines[0].0, Point2::new(3.0, 5.0));
    }

    #[test]
    fn circle_routes_through_ellipse() {
        let mut rec = RecordingOverlay::default();
        rec.circle(Point2::new(1.0, 2.0), 3.0, Rgb::GREEN);
        assert_eq!(rec.ellipses.len(), 1);
        assert_eq!(rec.ellipses[0].0.semi_minor, 3.0);
    }
}
