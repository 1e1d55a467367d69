use fiducial_grid_core::{Overlay, Positioned, Rgb};

const CROSS_HALF: f32 = 5.0;

/// Cross at every point, a polyline in canonical order and index labels.
pub fn draw_ordered_grid<T: Positioned>(overlay: &mut dyn Overlay, points: &[T]) {
    for (k, p) in points.iter().enumerate() {
        let at = p.position();
        overlay.cross(at, CROSS_HALF, Rgb::RED);
        if let Some(next) = points.get(k + 1) {
            overlay.line(at, next.position(), Rgb::CYAN);
        }
        overlay.label(at, &k.to_string(), Rgb::WHITE);
    }
}
