use crate::error::RenderError;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Integer pixel coordinate. May lie outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Anything the tree can be drawn onto
pub trait Surface {
    /// Stroke a straight segment. Off-surface parts are the surface's problem.
    fn draw_line(&mut self, from: Point, to: Point, width: i32, color: Rgb<u8>);
}

/// One recorded `draw_line` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub width: i32,
    pub color: Rgb<u8>,
}

impl Surface for Vec<Segment> {
    fn draw_line(&mut self, from: Point, to: Point, width: i32, color: Rgb<u8>) {
        self.push(Segment { from, to, width, color });
    }
}

/// RGB raster backed by an `image` buffer
pub struct Canvas {
    image: RgbImage,
    segments: usize,
}

impl Canvas {
    /// Create a canvas filled with `background`
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            segments: 0,
        }
    }

    /// Get canvas dimensions
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Number of `draw_line` calls so far
    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Set a pixel, silently ignoring coordinates outside the canvas
    pub fn set(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        let (width, height) = self.size();
        if x >= 0 && (x as u32) < width && y >= 0 && (y as u32) < height {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Encode the canvas as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Cursor::new(Vec::new());
        self.image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Write the canvas to `path` as PNG
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Clip the segment to the canvas rectangle (Liang-Barsky). `None` when
    /// no part of it is on the canvas.
    fn clip(&self, from: Point, to: Point) -> Option<(Point, Point)> {
        let (width, height) = self.size();
        let (x0, y0) = (f64::from(from.x), f64::from(from.y));
        let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
        let (max_x, max_y) = (f64::from(width) - 1.0, f64::from(height) - 1.0);

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
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
            Point::new(
                (x0 + t * dx).round().clamp(0.0, max_x) as i32,
                (y0 + t * dy).round().clamp(0.0, max_y) as i32,
            )
        };
        Some((at(t0), at(t1)))
    }

    /// One-pixel line (Bresenham), clipped to the canvas first
    fn hairline(&mut self, from: Point, to: Point, color: Rgb<u8>) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };
        let (mut x, mut y) = (i64::from(from.x), i64::from(from.y));
        let (end_x, end_y) = (i64::from(to.x), i64::from(to.y));
        let dx = (end_x - x).abs();
        let dy = -(end_y - y).abs();
        let sx = if x < end_x { 1 } else { -1 };
        let sy = if y < end_y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x as i32, y as i32, color);
            if x == end_x && y == end_y {
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

    /// Thick line with butt ends: every pixel whose centre is within
    /// `width / 2` of the segment, measured perpendicular to it, and
    /// between the two endpoints along it.
    fn stroke(&mut self, from: Point, to: Point, width: i32, color: Rgb<u8>) {
        let (ax, ay) = (f64::from(from.x), f64::from(from.y));
        let (dx, dy) = (f64::from(to.x) - ax, f64::from(to.y) - ay);
        let len = dx.hypot(dy);
        if len == 0.0 {
            return;
        }
        let (ux, uy) = (dx / len, dy / len);
        let half = f64::from(width) / 2.0;

        // Bounding box of the stroke, clipped to the canvas
        let (cw, ch) = self.size();
        let min_x = (from.x.min(to.x) as f64 - half).floor().max(0.0) as i64;
        let max_x = (from.x.max(to.x) as f64 + half).ceil().min(f64::from(cw) - 1.0) as i64;
        let min_y = (from.y.min(to.y) as f64 - half).floor().max(0.0) as i64;
        let max_y = (from.y.max(to.y) as f64 + half).ceil().min(f64::from(ch) - 1.0) as i64;

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let rx = px as f64 - ax;
                let ry = py as f64 - ay;
                let along = rx * ux + ry * uy;
                let across = (rx * uy - ry * ux).abs();
                if (0.0..=len).contains(&along) && across <= half {
                    self.image.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

impl Surface for Canvas {
    fn draw_line(&mut self, from: Point, to: Point, width: i32, color: Rgb<u8>) {
        self.segments += 1;
        if width <= 1 {
            self.hairline(from, to, color);
        } else {
            self.stroke(from, to, width, color);
        }
    }
}
