use std::borrow::Cow;

use crate::pixel::{PixelBuffer, Rgb};
use crate::stroke::LineSegment;

/// Rasterize `strokes` onto a copy of `base`, in order, later segments on top.
///
/// Returns `Cow::Borrowed(base)` when there is nothing to draw so the caller
/// can tell that no new snapshot was produced.
pub fn commit<'a>(base: &'a PixelBuffer, strokes: &[LineSegment]) -> Cow<'a, PixelBuffer> {
    if strokes.is_empty() {
        return Cow::Borrowed(base);
    }
    let mut canvas = base.clone();
    for segment in strokes {
        draw_segment(&mut canvas, segment);
    }
    Cow::Owned(canvas)
}

/// Walk the segment with Bresenham and stamp a round brush of `width` pixels
/// at every step. Pixels outside the canvas are skipped.
///
/// The walk is first clipped to the canvas grown by the brush reach, so
/// endpoints far off the canvas cost nothing; clipped endpoints are rounded to
/// the nearest pixel. The walk stops early once one stamp covers the whole
/// canvas.
pub fn draw_segment(canvas: &mut PixelBuffer, segment: &LineSegment) {
    let brush = Brush::new(segment.width);
    let bounds = Bounds::around(canvas, brush.reach());
    let start = (segment.start.x as i64, segment.start.y as i64);
    let end = (segment.end.x as i64, segment.end.y as i64);
    let Some(((mut x, mut y), (x1, y1))) = bounds.clip(start, end) else {
        return;
    };

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if brush.stamp(canvas, x, y, segment.color) || (x == x1 && y == y1) {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// A disc of diameter `width` centred on a pixel.
///
/// Measured in half-pixel units so even widths stay symmetric: width 1 is a
/// single pixel, 2 a 2x2 block, 3 a 3x3 block, 4 a 4x4 block minus corners.
/// Offset `d` from the centre sits at `2d - shift` half-pixels.
#[derive(Debug, Clone, Copy)]
struct Brush {
    width: i64,
    shift: i64,
}

impl Brush {
    fn new(width: u32) -> Self {
        let width = i64::from(width.max(1));
        Self {
            width,
            shift: (width - 1) % 2,
        }
    }

    /// Largest pixel offset the brush can reach from its centre.
    fn reach(&self) -> i64 {
        self.width / 2 + 1
    }

    /// Offsets `lo..=hi` whose half-pixel position lies within `limit`.
    fn span(&self, limit: i64) -> (i64, i64) {
        (-(limit - self.shift).div_euclid(2), (limit + self.shift).div_euclid(2))
    }

    fn half_pixel(&self, d: i64) -> i128 {
        i128::from(2 * d - self.shift)
    }

    /// Horizontal offsets covered on the row `dy` away from the centre.
    fn row_span(&self, dy: i64) -> Option<(i64, i64)> {
        let q = self.half_pixel(dy);
        let rem = i128::from(self.width).pow(2) - q * q;
        if rem < 0 {
            return None;
        }
        Some(self.span(rem.isqrt() as i64))
    }

    fn covers(&self, dx: i64, dy: i64) -> bool {
        let (px, py) = (self.half_pixel(dx), self.half_pixel(dy));
        px * px + py * py <= i128::from(self.width).pow(2)
    }

    /// Paint the brush centred on (cx, cy), clipped to the canvas. Returns
    /// `true` when every canvas pixel lies under the brush.
    fn stamp(&self, canvas: &mut PixelBuffer, cx: i64, cy: i64, color: Rgb) -> bool {
        let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
        let (top, bottom) = self.span(self.width);
        for y in (cy + top).max(0)..=(cy + bottom).min(h - 1) {
            let Some((left, right)) = self.row_span(y - cy) else {
                continue;
            };
            let (x0, x1) = ((cx + left).max(0), (cx + right).min(w - 1));
            if x0 <= x1 {
                canvas.fill_span(y as u32, x0 as u32, x1 as u32, color);
            }
        }
        [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
            .iter()
            .all(|&(x, y)| self.covers(x - cx, y - cy))
    }
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: (i64, i64),
    max: (i64, i64),
}

impl Bounds {
    /// The canvas grown by `margin` pixels on every side.
    fn around(canvas: &PixelBuffer, margin: i64) -> Self {
        Self {
            min: (-margin, -margin),
            max: (
                i64::from(canvas.width()) - 1 + margin,
                i64::from(canvas.height()) - 1 + margin,
            ),
        }
    }

    fn contains(&self, (x, y): (i64, i64)) -> bool {
        (self.min.0..=self.max.0).contains(&x) && (self.min.1..=self.max.1).contains(&y)
    }

    /// Liang-Barsky clip of the segment `a`-`b`. `None` when it misses the
    /// rectangle entirely.
    fn clip(&self, a: (i64, i64), b: (i64, i64)) -> Option<((i64, i64), (i64, i64))> {
        if self.contains(a) && self.contains(b) {
            return Some((a, b));
        }
        let (x0, y0) = (a.0 as f64, a.1 as f64);
        let (dx, dy) = (b.0 as f64 - x0, b.1 as f64 - y0);
        let edges = [
            (-dx, x0 - self.min.0 as f64),
            (dx, self.max.0 as f64 - x0),
            (-dy, y0 - self.min.1 as f64),
            (dy, self.max.1 as f64 - y0),
        ];

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| {
            let x = (x0 + t * dx).round() as i64;
            let y = (y0 + t * dy).round() as i64;
            (
                x.clamp(self.min.0, self.max.0),
                y.clamp(self.min.1, self.max.1),
            )
        };
        Some((at(t0), at(t1)))
    }
}
