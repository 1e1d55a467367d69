//! Border following with full hierarchy (Suzuki & Abe, 1985).
//!
//! Foreground is any non-zero pixel. The image is copied into an `i32`
//! buffer with a one-pixel zero frame, borders are traced in raster order
//! and each traced border is labelled with its sequence number `nbd`
//! (contour `k` has `nbd = k + 2`; `1` stands for the frame). The last
//! border met on the current row (`lnbd`) decides the parent of the next
//! one.

use fiducial_grid_core::GrayImageView;
use nalgebra::Point2;

/// 8-neighborhood, counter-clockwise starting east (y grows downwards).
const NEIGHBORHOOD: [[i32; 2]; 8] = [
    [1, 0],
    [1, -1],
    [0, -1],
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, 1],
    [1, 1],
];

const FRAME: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    /// Border pixels in tracing order, uncompressed.
    pub points: Vec<Point2<i32>>,
    /// `true` for the border of a hole (background enclosed by foreground).
    pub hole: bool,
    /// Index of the enclosing contour, `None` when the frame encloses it.
    pub parent: Option<usize>,
    /// Index of the first traced contour directly inside this one.
    pub first_child: Option<usize>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn padded_binary(src: &GrayImageView<'_>) -> Vec<i32> {
    let pw = src.width + 2;
    let mut dst = vec![0i32; pw * (src.height + 2)];
    for (y, row) in src.data.chunks_exact(src.width).take(src.height).enumerate() {
        let start = (y + 1) * pw + 1;
        for (d, &v) in dst[start..start + src.width].iter_mut().zip(row) {
            *d = i32::from(v != 0);
        }
    }
    dst
}

/// Flat offsets for the 8 directions, repeated twice so a scan can run
/// past index 7 without wrapping.
fn neighborhood_deltas(width: usize) -> [isize; 16] {
    let mut deltas = [0isize; 16];
    for (i, [dx, dy]) in NEIGHBORHOOD.iter().enumerate() {
        let d = *dx as isize + *dy as isize * width as isize;
        deltas[i] = d;
        deltas[i + 8] = d;
    }
    deltas
}

#[inline]
fn step(pos: usize, delta: isize) -> usize {
    (pos as isize + delta) as usize
}

/// Trace one border starting at `pos`, marking it with `nbd` / `-nbd`.
fn follow_border(
    buf: &mut [i32],
    pos: usize,
    nbd: i32,
    mut point: Point2<i32>,
    hole: bool,
    deltas: &[isize; 16],
) -> Vec<Point2<i32>> {
    let mut points = Vec::new();

    // Clockwise search from the background neighbor that triggered the trace.
    let start = if hole { 0 } else { 4 };
    let mut s = start;
    let mut pos1 = pos;
    loop {
        s = (s + 7) & 7;
        let p = step(pos, deltas[s]);
        if buf[p] != 0 {
            pos1 = p;
            break;
        }
        if s == start {
            break;
        }
    }

    if pos1 == pos {
        buf[pos] = -nbd;
        points.push(point);
        return points;
    }

    let mut pos3 = pos;
    loop {
        let s_end = s;
        // Counter-clockwise search for the next border pixel.
        let mut pos4;
        loop {
            s += 1;
            pos4 = step(pos3, deltas[s]);
            if buf[pos4] != 0 {
                break;
            }
        }
        s &= 7;

        // East neighbor was examined and found zero.
        if s != 0 && s <= s_end {
            buf[pos3] = -nbd;
        } else if buf[pos3] == 1 {
            buf[pos3] = nbd;
        }

        points.push(point);
        point.x += NEIGHBORHOOD[s][0];
        point.y += NEIGHBORHOOD[s][1];

        if pos4 == pos && pos3 == pos1 {
            break;
        }
        pos3 = pos4;
        s = (s + 4) & 7;
    }
    points
}

fn parent_of(contours: &[Contour], lnbd: i32, hole: bool) -> Option<usize> {
    if lnbd <= FRAME {
        return None;
    }
    let prev = (lnbd - 2) as usize;
    if contours[prev].hole == hole {
        contours[prev].parent
    } else {
        Some(prev)
    }
}

/// Every border of `src` with its containment tree.
///
/// Contours are returned in tracing order, so a parent always precedes its
/// children.
pub fn find_contour_tree(src: &GrayImageView<'_>) -> Vec<Contour> {
    if src.is_empty() {
        return Vec::new();
    }
    let pw = src.width + 2;
    let mut buf = padded_binary(src);
    let deltas = neighborhood_deltas(pw);
    let mut contours: Vec<Contour> = Vec::new();

    for y in 0..src.height {
        let mut lnbd = FRAME;
        let mut pos = (y + 1) * pw + 1;
        for x in 0..src.width {
            let pix = buf[pos];
            if pix != 0 {
                let hole = if pix == 1 && buf[pos - 1] == 0 {
                    Some(false)
                } else if pix >= 1 && buf[pos + 1] == 0 {
                    if pix > 1 {
                        lnbd = pix;
                    }
                    Some(true)
                } else {
                    None
                };

                if let Some(hole) = hole {
                    let idx = contours.len();
                    let nbd = idx as i32 + 2;
                    let parent = parent_of(&contours, lnbd, hole);
                    let points = follow_border(
                        &mut buf,
                        pos,
                        nbd,
                        Point2::new(x as i32, y as i32),
                        hole,
                        &deltas,
                    );
                    if let Some(p) = parent {
                        contours[p].first_child.get_or_insert(idx);
                    }
                    contours.push(Contour {
                        points,
                        hole,
                        parent,
                        first_child: None,
                    });
                }

                let v = buf[pos];
                if v != 1 {
                    lnbd = v.abs();
                }
            }
            pos += 1;
        }
    }
    log::debug!("traced {} contours", contours.len());
    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiducial_grid_core::GrayImage;

    fn fill(img: &mut GrayImage, x0: usize, y0: usize, x1: usize, y1: usize, v: u8) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.set(x, y, v);
            }
        }
    }

    #[test]
    fn square_ring_has_outer_border_and_hole() {
        let src = GrayImage {
            width: 5,
            height: 5,
            data: vec![
                0, 0, 0, 0, 0, //
                0, 255, 255, 255, 0, //
                0, 255, 0, 255, 0, //
                0, 255, 255, 255, 0, //
                0, 0, 0, 0, 0,
            ],
        };
        let contours = find_contour_tree(&src.view());
        assert_eq!(contours.len(), 2);
        assert!(!contours[0].hole);
        assert_eq!(contours[0].parent, None);
        assert_eq!(contours[0].first_child, Some(1));
        assert_eq!(contours[0].len(), 8);
        assert!(contours[1].hole);
        assert_eq!(contours[1].parent, Some(0));
    }

    #[test]
    fn nested_regions_form_a_chain() {
        let mut img = GrayImage::new(14, 14);
        fill(&mut img, 1, 1, 12, 12, 255);
        fill(&mut img, 3, 3, 10, 10, 0);
        fill(&mut img, 5, 5, 8, 8, 255);

        let contours = find_contour_tree(&img.view());
        assert_eq!(contours.len(), 3);
        assert_eq!(
            contours
                .iter()
                .map(|c| (c.hole, c.parent, c.first_child))
                .collect::<Vec<_>>(),
            vec![
                (false, None, Some(1)),
                (true, Some(0), Some(2)),
                (false, Some(1), None),
            ]
        );
    }

    #[test]
    fn siblings_share_a_parent() {
        let mut img = GrayImage::new(20, 10);
        fill(&mut img, 1, 1, 18, 8, 255);
        fill(&mut img, 3, 3, 6, 6, 0);
        fill(&mut img, 11, 3, 14, 6, 0);

        let contours = find_contour_tree(&img.view());
        let holes: Vec<&Contour> = contours.iter().filter(|c| c.hole).collect();
        assert_eq!(holes.len(), 2);
        assert!(holes.iter().all(|c| c.parent == Some(0)));
        assert_eq!(contours[0].first_child, Some(1));
    }

    #[test]
    fn isolated_pixel_is_a_single_point_contour() {
        let mut img = GrayImage::new(3, 3);
        img.set(1, 1, 7);
        let contours = find_contour_tree(&img.view());
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, vec![Point2::new(1, 1)]);
    }

    #[test]
    fn empty_image_has_no_contours() {
        let img = GrayImage::new(0, 0);
        assert!(find_contour_tree(&img.view()).is_empty());
    }
}
