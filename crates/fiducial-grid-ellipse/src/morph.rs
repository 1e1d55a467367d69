use fiducial_grid_core::{GrayImage, GrayImageView};

/// Offsets of an elliptical structuring element inscribed in a
/// `(2r + 1) x (2r + 1)` box, built row by row: the top and bottom rows hold
/// the center pixel only, every other row spans
/// `round(r * sqrt(1 - dy^2 / r^2))` pixels either side of the center.
/// `radius == 2` gives the 17-tap 5 x 5 ellipse.
pub fn elliptical_kernel(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let r2 = (r * r) as f32;
    let mut kernel = Vec::new();
    for dy in -r..=r {
        let half = if dy.abs() == r {
            0
        } else {
            (r as f32 * ((r2 - (dy * dy) as f32) / r2).sqrt()).round() as i32
        };
        kernel.extend((-half..=half).map(|dx| (dx, dy)));
    }
    kernel
}

/// Grayscale erosion (local minimum) with [`elliptical_kernel`].
///
/// Neighbors outside the image are ignored, so the border does not eat
/// into foreground touching the frame edge. `radius == 0` copies the input.
pub fn erode(src: &GrayImageView<'_>, radius: u32) -> GrayImage {
    let mut out = src.to_owned_image();
    if radius == 0 || src.is_empty() {
        return out;
    }
    let kernel = elliptical_kernel(radius);

    for y in 0..src.height as i32 {
        for x in 0..src.width as i32 {
            let min = kernel
                .iter()
                .filter_map(|&(kx, ky)| src.get(x + kx, y + ky))
                .min()
                .unwrap_or(0);
            out.data[y as usize * src.width + x as usize] = min;
        }
    }
    out
}
