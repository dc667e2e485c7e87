// ============================================================================
// PIXEL TARGETS
// ============================================================================

use crate::color::Color;
use rusttype::{point, Font, PositionedGlyph, Scale};

/// Borrowed RGBA frame, either the window framebuffer or a [`Surface`].
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Alpha-blends `color` over the pixel at `(x, y)`; out-of-bounds writes
    /// are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        let dst = [
            self.frame[idx] as f32,
            self.frame[idx + 1] as f32,
            self.frame[idx + 2] as f32,
        ];
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
            0xff,
        ];
        self.frame[idx..idx + 4].copy_from_slice(&out);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
        ))
    }

    // ------------------------------------------------------------------------
    // Shapes. Coordinates follow the bounding-box convention: `(x0, y0)` is
    // the top-left corner, `(x1, y1)` the bottom-right one.
    // ------------------------------------------------------------------------

    pub fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        for y in y0.floor() as i32..y1.ceil() as i32 {
            for x in x0.floor() as i32..x1.ceil() as i32 {
                let cx = x as f32 + 0.5;
                let cy = y as f32 + 0.5;
                if cx >= x0 && cx <= x1 && cy >= y0 && cy <= y1 {
                    self.set_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    pub fn stroke_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        for (ax, ay, bx, by) in [
            (x0, y0, x1, y0),
            (x0, y1, x1, y1),
            (x0, y0, x0, y1),
            (x1, y0, x1, y1),
        ] {
            self.line(ax, ay, bx, by, width, color);
        }
    }

    pub fn fill_ellipse(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        self.ellipse(x0, y0, x1, y1, color, |edge| 0.5 - edge);
    }

    pub fn stroke_ellipse(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        self.ellipse(x0, y0, x1, y1, color, |edge| width / 2.0 + 0.5 - edge.abs());
    }

    /// Shared ellipse rasteriser. `coverage` maps the signed pixel distance to
    /// the ellipse outline (negative inside) to an alpha value.
    fn ellipse(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        color: Color,
        coverage: impl Fn(f32) -> f32,
    ) {
        let rx = (x1 - x0).abs() / 2.0;
        let ry = (y1 - y0).abs() / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let cx = (x0 + x1) / 2.0;
        let cy = (y0 + y1) / 2.0;
        let r_min = rx.min(ry);
        for y in (cy - ry - 2.0).floor() as i32..=(cy + ry + 2.0).ceil() as i32 {
            for x in (cx - rx - 2.0).floor() as i32..=(cx + rx + 2.0).ceil() as i32 {
                let nx = (x as f32 + 0.5 - cx) / rx;
                let ny = (y as f32 + 0.5 - cy) / ry;
                let edge = ((nx * nx + ny * ny).sqrt() - 1.0) * r_min;
                let aa = coverage(edge).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Anti-aliased line with round caps.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
        let pad = thickness.ceil() + 1.0;
        let min_x = (x0.min(x1) - pad).floor() as i32;
        let max_x = (x0.max(x1) + pad).ceil() as i32;
        let min_y = (y0.min(y1) - pad).floor() as i32;
        let max_y = (y0.max(y1) + pad).ceil() as i32;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5 - x0;
                let py = y as f32 + 0.5 - y0;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - (x as f32 + 0.5)).powi(2) + (ly - (y as f32 + 0.5)).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Circular arc stroke. Angles are in degrees, measured counter-clockwise
    /// from three o'clock with y pointing up; `extent` sweeps from `start`.
    pub fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        extent: f32,
        width: f32,
        color: Color,
    ) {
        let pad = radius + width + 2.0;
        let (start, extent) = if extent < 0.0 {
            (start + extent, -extent)
        } else {
            (start, extent)
        };
        for y in (cy - pad).floor() as i32..=(cy + pad).ceil() as i32 {
            for x in (cx - pad).floor() as i32..=(cx + pad).ceil() as i32 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                let aa = (width / 2.0 + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
                if aa <= 0.01 {
                    continue;
                }
                let angle = (-dy).atan2(dx).to_degrees().rem_euclid(360.0);
                if (angle - start).rem_euclid(360.0) <= extent.min(360.0) {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Draws `text` centred on `(x, y)`.
    pub fn text(&mut self, x: i32, y: i32, text: &str, font: &Font, scale: Scale, color: Color) {
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();
        let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(min_x, max_x, min_y, max_y), bb| {
                (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                )
            },
        );
        let width_px = if min_x < max_x { max_x - min_x } else { 0 };
        let height_px = if min_y < max_y { max_y - min_y } else { 0 };
        let offset_x = x - width_px / 2;
        let offset_y = y - height_px / 2;
        for glyph in glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.set_pixel(px, py, color, v);
                });
            }
        }
    }

    /// Left-aligned variant of [`Canvas::text`]; `y` is the vertical centre.
    pub fn text_left(&mut self, x: i32, y: i32, text: &str, font: &Font, scale: Scale, color: Color) {
        let width = text_width(text, font, scale);
        self.text(x + width / 2, y, text, font, scale, color);
    }

    /// Copies `surface` with nearest-neighbour upscaling so that its top-left
    /// corner lands on `(dst_x, dst_y)`.
    pub fn blit(&mut self, surface: &Surface, dst_x: i32, dst_y: i32, scale: usize) {
        let scale = scale.max(1);
        for sy in 0..surface.height() {
            for sx in 0..surface.width() {
                let Some(color) = surface.pixel(sx, sy) else {
                    continue;
                };
                for oy in 0..scale {
                    for ox in 0..scale {
                        self.set_pixel(
                            dst_x + (sx * scale + ox) as i32,
                            dst_y + (sy * scale + oy) as i32,
                            color,
                            1.0,
                        );
                    }
                }
            }
        }
    }
}

pub fn text_width(text: &str, font: &Font, scale: Scale) -> i32 {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let (min_x, max_x) = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold((i32::MAX, i32::MIN), |(min_x, max_x), bb| {
            (min_x.min(bb.min.x), max_x.max(bb.max.x))
        });
    if min_x < max_x {
        max_x - min_x
    } else {
        0
    }
}

/// Fixed-size RGBA drawing surface owned by one appliance.
#[derive(Debug, Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    background: Color,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let mut surface = Self {
            width,
            height,
            background,
            pixels: vec![0; width * height * 4],
        };
        surface.clear();
        surface
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.pixels, self.width, self.height)
    }

    /// Resets every pixel to the background colour.
    pub fn clear(&mut self) {
        let background = self.background;
        self.canvas().clear(background);
    }

    pub fn is_blank(&self) -> bool {
        let bg = [self.background.r, self.background.g, self.background.b];
        self.pixels.chunks_exact(4).all(|px| px[..3] == bg)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::new(0xf0, 0xf0, 0xf0);
    const INK: Color = Color::new(0x33, 0x33, 0x33);

    #[test]
    fn new_surface_is_blank() {
        let surface = Surface::new(40, 40, BG);
        assert!(surface.is_blank());
        assert_eq!(surface.pixel(39, 39), Some(BG));
        assert_eq!(surface.pixel(40, 0), None);
    }

    #[test]
    fn drawing_then_clearing() {
        let mut surface = Surface::new(40, 40, BG);
        surface.canvas().fill_rect(5.0, 5.0, 20.0, 25.0, INK);
        assert!(!surface.is_blank());
        assert_eq!(surface.pixel(10, 10), Some(INK));
        assert_eq!(surface.pixel(30, 30), Some(BG));

        surface.clear();
        assert!(surface.is_blank());
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut surface = Surface::new(10, 10, BG);
        let mut canvas = surface.canvas();
        canvas.set_pixel(-1, 3, INK, 1.0);
        canvas.set_pixel(3, 10, INK, 1.0);
        canvas.line(-20.0, -20.0, -5.0, -5.0, 3.0, INK);
        assert!(surface.is_blank());
    }

    #[test]
    fn filled_ellipse_covers_centre_not_corners() {
        let mut surface = Surface::new(40, 40, BG);
        surface.canvas().fill_ellipse(15.0, 15.0, 25.0, 25.0, INK);
        assert_eq!(surface.pixel(20, 20), Some(INK));
        assert_eq!(surface.pixel(15, 15), Some(BG));
    }

    #[test]
    fn right_half_arc_leaves_left_side_untouched() {
        let mut surface = Surface::new(40, 40, BG);
        surface.canvas().arc(20.0, 20.0, 10.0, 270.0, 180.0, 2.0, INK);
        assert_ne!(surface.pixel(30, 20), Some(BG));
        assert_eq!(surface.pixel(9, 20), Some(BG));
    }

    #[test]
    fn blit_scales_pixels() {
        let mut src = Surface::new(2, 2, BG);
        src.canvas().set_pixel(1, 1, INK, 1.0);

        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.clear(Color::WHITE);
        canvas.blit(&src, 0, 0, 2);
        assert_eq!(canvas.pixel(0, 0), Some(BG));
        assert_eq!(canvas.pixel(2, 2), Some(INK));
        assert_eq!(canvas.pixel(3, 3), Some(INK));
    }
}
