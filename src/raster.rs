// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================

use std::f64::consts::TAU;
use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::GaugeError;
use crate::scene::{DrawCommand, Outline, Scene, Viewport};

/// Reads a TrueType/OpenType font for labels and the readout.
pub fn load_font(path: &Path) -> Result<Font<'static>, GaugeError> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| GaugeError::Font(path.display().to_string()))
}

/// An RGBA8 frame covering the visible part of the gauge, with its top-left
/// corner at the output origin.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Color of the pixel at `x, y`, if it is on the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 3)
            .map(|px| (px[0], px[1], px[2]))
    }

    /// Paints every command of `scene`, in order. Text is skipped when no font
    /// is given.
    pub fn draw(&mut self, scene: &Scene, font: Option<&Font<'_>>) {
        let viewport = Viewport::new(scene);
        for command in scene.commands() {
            match command {
                DrawCommand::Ring { arc, opacity, .. } => {
                    let Some(color) = arc.color.as_deref().and_then(Color::parse) else {
                        continue;
                    };
                    if arc.radius <= 0.0 {
                        continue;
                    }
                    let (cx, cy) = viewport.to_pixels(arc.rotation.cx, arc.rotation.cy);
                    self.stroke_ring(
                        (cx, cy),
                        viewport.length(arc.radius),
                        viewport.length(arc.stroke_width),
                        arc.rotation.degrees.to_radians(),
                        arc.dash.arc / arc.radius,
                        color,
                        *opacity,
                    );
                }
                DrawCommand::Face {
                    outline,
                    fill,
                    opacity,
                } => {
                    if let Some(color) = Color::parse(fill) {
                        self.fill_face(&viewport, outline, color, *opacity);
                    }
                }
                DrawCommand::Axis {
                    outline,
                    stroke,
                    stroke_width,
                } => {
                    let Some(color) = Color::parse(stroke) else {
                        continue;
                    };
                    let span = if outline.full_circle {
                        TAU
                    } else {
                        outline.span.to_radians()
                    };
                    self.stroke_ring(
                        viewport.to_pixels(outline.center, outline.center),
                        viewport.length(outline.radius),
                        viewport.length(*stroke_width).max(1.0),
                        (outline.start_angle - 90.0).to_radians(),
                        span,
                        color,
                        1.0,
                    );
                }
                DrawCommand::Tick { start, end, stroke } => {
                    let Some(color) = Color::parse(stroke) else {
                        continue;
                    };
                    let (x0, y0) = viewport.to_pixels(start.0 as f64, start.1 as f64);
                    let (x1, y1) = viewport.to_pixels(end.0 as f64, end.1 as f64);
                    self.thick_line(
                        (x0, y0),
                        (x1, y1),
                        viewport.length(1.0).max(1.0) as f32,
                        color,
                    );
                }
                DrawCommand::Label {
                    anchor,
                    text,
                    font_size,
                    fill,
                } => {
                    let (Some(font), Some(color)) = (font, Color::parse(fill)) else {
                        continue;
                    };
                    let (x, y) = viewport.to_pixels(anchor.0 as f64, anchor.1 as f64);
                    let size = viewport.length(*font_size) as f32;
                    self.text(font, (x, y), text, size, color);
                }
                DrawCommand::Readout {
                    x,
                    y,
                    text,
                    font_size,
                    fill,
                } => {
                    let (Some(font), Some(color)) = (font, Color::parse(fill)) else {
                        continue;
                    };
                    self.text(font, (*x, *y), text, *font_size as f32, color);
                }
            }
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    /// Pixel rows and columns around `center` within `reach`, clipped to the canvas.
    fn clip(&self, center: (f64, f64), reach: f64) -> Option<(i32, i32, i32, i32)> {
        let min_x = ((center.0 - reach).floor() as i32).max(0);
        let max_x = ((center.0 + reach).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((center.1 - reach).floor() as i32).max(0);
        let max_y = ((center.1 + reach).ceil() as i32).min(self.height as i32 - 1);
        (min_x <= max_x && min_y <= max_y).then_some((min_x, max_x, min_y, max_y))
    }

    /// Ring segment centered on `radius`, starting at `start` radians
    /// (clockwise from east) and running `span` radians.
    #[allow(clippy::too_many_arguments)]
    fn stroke_ring(
        &mut self,
        center: (f64, f64),
        radius: f64,
        width: f64,
        start: f64,
        span: f64,
        color: Color,
        alpha: f32,
    ) {
        if !(span > 0.0) || !(radius > 0.0) {
            return;
        }
        let inner = radius - width / 2.0;
        let outer = radius + width / 2.0;
        let full = span >= TAU;
        let start = start.rem_euclid(TAU);
        let Some((min_x, max_x, min_y, max_y)) = self.clip(center, outer + 1.0) else {
            return;
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f64 - center.0;
                let dy = y as f64 - center.1;
                let dist = dx.hypot(dy);
                if dist < inner - 1.0 || dist > outer + 1.0 {
                    continue;
                }
                if !full && (dy.atan2(dx) - start).rem_euclid(TAU) > span {
                    continue;
                }
                let aa = if dist > outer {
                    1.0 - (dist - outer).min(1.0)
                } else if dist < inner {
                    1.0 - (inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, alpha * aa as f32);
                }
            }
        }
    }

    /// The region an SVG renderer fills for an arc path: the disc cut by the
    /// chord between the sweep's ends, keeping the side the arc bulges to.
    fn fill_face(&mut self, viewport: &Viewport, outline: &Outline, color: Color, alpha: f32) {
        let center = viewport.to_pixels(outline.center, outline.center);
        let radius = viewport.length(outline.radius);
        if !(radius > 0.0) {
            return;
        }
        let at = |deg: f64| {
            let t = deg.to_radians();
            (center.0 + radius * t.sin(), center.1 - radius * t.cos())
        };
        let cross = |a: (f64, f64), b: (f64, f64), p: (f64, f64)| {
            (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
        };
        let chord = (!outline.full_circle).then(|| {
            let a = at(outline.start_angle);
            let b = at(outline.start_angle + outline.span);
            let bulge = at(outline.start_angle + outline.span / 2.0);
            (a, b, cross(a, b, bulge).signum())
        });
        let Some((min_x, max_x, min_y, max_y)) = self.clip(center, radius + 1.0) else {
            return;
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64, y as f64);
                let dist = (p.0 - center.0).hypot(p.1 - center.1);
                if dist > radius + 1.0 {
                    continue;
                }
                if let Some((a, b, side)) = chord {
                    if cross(a, b, p) * side < 0.0 {
                        continue;
                    }
                }
                let aa = if dist > radius {
                    1.0 - (dist - radius).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, alpha * aa as f32);
                }
            }
        }
    }

    fn thick_line(&mut self, from: (f64, f64), to: (f64, f64), thickness: f32, color: Color) {
        let pad = thickness.ceil() as f64 + 1.0;
        let min_x = (from.0.min(to.0) - pad).floor().max(0.0) as i32;
        let max_x = (from.0.max(to.0) + pad).ceil().min(self.width as f64 - 1.0) as i32;
        let min_y = (from.1.min(to.1) - pad).floor().max(0.0) as i32;
        let max_y = (from.1.max(to.1) + pad).ceil().min(self.height as f64 - 1.0) as i32;
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let len_sq = dx * dx + dy * dy;
        let half = thickness as f64 / 2.0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - from.0;
                let py = y as f64 - from.1;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = from.0 + t * dx;
                let ly = from.1 + t * dy;
                let dist = (lx - x as f64).hypot(ly - y as f64);
                let aa = (1.0 - (dist - half).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Draws `text` centered on `at`, both horizontally and vertically.
    fn text(&mut self, font: &Font<'_>, at: (f64, f64), text: &str, size: f32, color: Color) {
        if !(size > 0.0) {
            return;
        }
        let scale = Scale::uniform(size);
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
        if min_x > max_x || min_y > max_y {
            return;
        }
        let offset_x = at.0.round() as i32 - (max_x - min_x) / 2;
        let offset_y = at.1.round() as i32 - (max_y - min_y) / 2;

        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.blend(px, py, color, v);
                });
            }
        }
    }
}
