//! Software rasterizer that replays a render plan into an RGBA8 frame.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::paint::{Paint, PaintStyle, Point, Rect, StrokeCap, TextAlign, TypefaceMetrics};
use crate::plan::Surface;

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
        }
    }

    /// Text is only drawn when a font is attached.
    pub fn with_font(mut self, font: &'a Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// RGBA of a pixel, `None` outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        set_pixel(self.frame, self.width, x as usize, y as usize, color, coverage);
    }

    /// Pixel rows and columns covered by `rect`, clipped to the canvas.
    fn clip(&self, rect: Rect) -> Option<(i32, i32, i32, i32)> {
        let min_x = (rect.left.floor() as i32).max(0);
        let min_y = (rect.top.floor() as i32).max(0);
        let max_x = (rect.right.ceil() as i32).min(self.width as i32 - 1);
        let max_y = (rect.bottom.ceil() as i32).min(self.height as i32 - 1);
        (min_x <= max_x && min_y <= max_y).then_some((min_x, min_y, max_x, max_y))
    }
}

// ============================================================================
// SURFACE
// ============================================================================

impl Surface for Canvas<'_> {
    fn draw_arc(
        &mut self,
        oval: Rect,
        start_angle: f32,
        sweep_angle: f32,
        use_center: bool,
        paint: &Paint,
    ) {
        if sweep_angle == 0.0 || !sweep_angle.is_finite() {
            return;
        }
        let (start, sweep) = if sweep_angle < 0.0 {
            (start_angle + sweep_angle, -sweep_angle)
        } else {
            (start_angle, sweep_angle)
        };
        let center = oval.center();
        let radius = oval.width().min(oval.height()) / 2.0;
        let half_stroke = match paint.style {
            PaintStyle::Stroke => paint.stroke_width / 2.0,
            PaintStyle::Fill => 0.0,
        };
        let reach = radius + half_stroke + 1.0;
        let Some((min_x, min_y, max_x, max_y)) = self.clip(Rect::around(center, reach)) else {
            return;
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let pixel = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let (dx, dy) = (pixel.x - center.x, pixel.y - center.y);
                let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
                if sweep < 360.0 && (angle - start).rem_euclid(360.0) > sweep {
                    continue;
                }
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = if use_center || paint.style == PaintStyle::Fill {
                    (radius + 0.5 - dist).clamp(0.0, 1.0)
                } else {
                    (half_stroke + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0)
                };
                if coverage > 0.01 {
                    let color = paint.shader.color_at(pixel);
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        let thickness = paint.stroke_width.max(1.0);
        let pad = thickness.ceil() + 1.0;
        let bounds = Rect::new(
            from.x.min(to.x) - pad,
            from.y.min(to.y) - pad,
            from.x.max(to.x) + pad,
            from.y.max(to.y) + pad,
        );
        let Some((min_x, min_y, max_x, max_y)) = self.clip(bounds) else {
            return;
        };
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let pixel = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let raw_t = if len_sq > 0.0 {
                    ((pixel.x - from.x) * dx + (pixel.y - from.y) * dy) / len_sq
                } else {
                    0.0
                };
                if paint.stroke_cap == StrokeCap::Butt && !(0.0..=1.0).contains(&raw_t) {
                    continue;
                }
                let t = raw_t.clamp(0.0, 1.0);
                let nearest = Point::new(from.x + t * dx, from.y + t * dy);
                let dist = nearest.distance(pixel);
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    let color = paint.shader.color_at(pixel);
                    self.blend(x, y, color, aa);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint) {
        let Some(font) = self.font else {
            return;
        };
        if text.is_empty() || paint.text_size <= 0.0 {
            return;
        }
        let scale = Scale::uniform(paint.text_size);
        let width = text_width(text, font, scale);
        let origin_x = match paint.text_align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(origin_x, y)).collect();
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    let color = paint
                        .shader
                        .color_at(Point::new(px as f32 + 0.5, py as f32 + 0.5));
                    self.blend(px, py, color, v);
                });
            }
        }
    }
}

// ============================================================================
// TEXT HELPERS
// ============================================================================

/// Advance width of `text` at `scale`, in pixels.
pub fn text_width(text: &str, font: &Font, scale: Scale) -> f32 {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    match glyphs.last() {
        Some(last) => last.position().x + last.unpositioned().h_metrics().advance_width,
        None => 0.0,
    }
}

/// Per-size vertical metrics of a loaded font, for label placement.
pub fn typeface_metrics(font: &Font) -> TypefaceMetrics {
    let v = font.v_metrics(Scale::uniform(1.0));
    let ascent = -v.ascent;
    let descent = -v.descent;
    TypefaceMetrics {
        top: ascent - v.line_gap / 2.0,
        ascent,
        descent,
        bottom: descent + v.line_gap / 2.0,
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: Color, coverage: f32) {
    let idx = (y * width + x) * 4;
    let Some(dst) = frame.get_mut(idx..idx + 4) else {
        return;
    };
    let a = coverage.clamp(0.0, 1.0) * color.a as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    let src = [color.r as f32, color.g as f32, color.b as f32];
    for (channel, value) in dst.iter_mut().zip(src) {
        *channel = (value * a + *channel as f32 * (1.0 - a)).round() as u8;
    }
    dst[3] = (255.0 * a + dst[3] as f32 * (1.0 - a)).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Shader, TileMode};

    fn frame(width: usize, height: usize) -> Vec<u8> {
        vec![0; width * height * 4]
    }

    const SYSTEM_FONTS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    // Text rendering needs a real font; tests that use it pass trivially on
    // machines without any of these.
    fn system_font() -> Option<Font<'static>> {
        let font = SYSTEM_FONTS
            .iter()
            .filter_map(|path| std::fs::read(path).ok())
            .find_map(Font::try_from_vec);
        if font.is_none() {
            eprintln!("no system font found, skipping text checks");
        }
        font
    }

    /// Inclusive bounding box of every pixel with any red in it.
    fn ink_bounds(buf: &[u8], width: usize) -> Option<(usize, usize, usize, usize)> {
        buf.chunks_exact(4)
            .enumerate()
            .filter(|(_, px)| px[0] > 0)
            .map(|(i, _)| (i % width, i / width))
            .fold(None, |bounds, (x, y)| match bounds {
                None => Some((x, y, x, y)),
                Some((min_x, min_y, max_x, max_y)) => {
                    Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)))
                }
            })
    }

    fn draw_aligned(font: &Font<'static>, align: TextAlign) -> (usize, usize, usize, usize) {
        let (width, height) = (120, 40);
        let mut buf = frame(width, height);
        let mut canvas = Canvas::new(&mut buf, width, height).with_font(font);
        canvas.clear(Color::BLACK);
        canvas.draw_text(
            "808",
            60.0,
            30.0,
            &Paint::fill(Color::new(0xff, 0, 0)).with_text(20.0, align),
        );
        ink_bounds(&buf, width).expect("text left no ink")
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buf = frame(4, 3);
        let mut canvas = Canvas::new(&mut buf, 4, 3);
        canvas.clear(Color::new(1, 2, 3));
        assert_eq!(canvas.pixel(3, 2), Some([1, 2, 3, 255]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn line_covers_its_path_only() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        canvas.clear(Color::BLACK);
        let red = Color::new(0xff, 0, 0);
        canvas.draw_line(
            Point::new(2.0, 10.5),
            Point::new(18.0, 10.5),
            &Paint::stroke(2.0, red),
        );
        assert_eq!(canvas.pixel(10, 10), Some([0xff, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(10, 2), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn butt_cap_stops_at_endpoints() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        canvas.clear(Color::BLACK);
        let paint = Paint::stroke(4.0, Color::WHITE);
        canvas.draw_line(Point::new(5.0, 10.0), Point::new(15.0, 10.0), &paint);
        assert_eq!(canvas.pixel(3, 9), Some([0, 0, 0, 0xff]));

        let round = paint.with_cap(StrokeCap::Round);
        canvas.draw_line(Point::new(5.0, 10.0), Point::new(15.0, 10.0), &round);
        assert_eq!(canvas.pixel(4, 9), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn stroked_arc_respects_sweep() {
        let mut buf = frame(41, 41);
        let mut canvas = Canvas::new(&mut buf, 41, 41);
        canvas.clear(Color::BLACK);
        let oval = Rect::around(Point::new(20.5, 20.5), 15.0);
        // Top half only: 180 -> 360.
        canvas.draw_arc(oval, 180.0, 180.0, false, &Paint::stroke(3.0, Color::WHITE));
        assert_eq!(canvas.pixel(20, 5), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(20, 35), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(20, 20), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn filled_wedge_reaches_center() {
        let mut buf = frame(41, 41);
        let mut canvas = Canvas::new(&mut buf, 41, 41);
        canvas.clear(Color::BLACK);
        let oval = Rect::around(Point::new(20.5, 20.5), 15.0);
        canvas.draw_arc(oval, 0.0, 90.0, true, &Paint::fill(Color::WHITE));
        assert_eq!(canvas.pixel(25, 25), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(15, 15), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn translucent_colors_blend() {
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        canvas.clear(Color::BLACK);
        let half_white = Color::rgba(0xff, 0xff, 0xff, 0x80);
        canvas.draw_line(
            Point::new(0.0, 5.5),
            Point::new(10.0, 5.5),
            &Paint::stroke(2.0, half_white),
        );
        let [r, g, b, _] = canvas.pixel(5, 5).unwrap();
        assert_eq!((r, g, b), (0x80, 0x80, 0x80));
    }

    #[test]
    fn gradient_line_is_shaded_along_its_length() {
        let mut buf = frame(30, 5);
        let mut canvas = Canvas::new(&mut buf, 30, 5);
        canvas.clear(Color::BLACK);
        let (from, to) = (Point::new(0.0, 2.5), Point::new(30.0, 2.5));
        let paint = Paint::stroke(2.0, Color::WHITE).with_shader(Shader::LinearGradient {
            from,
            to,
            colors: vec![Color::WHITE, Color::BLACK],
            tile_mode: TileMode::Clamp,
        });
        canvas.draw_line(from, to, &paint);
        let near = canvas.pixel(1, 2).unwrap()[0];
        let far = canvas.pixel(28, 2).unwrap()[0];
        assert!(near > far);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        canvas.clear(Color::BLACK);
        canvas.draw_text(
            "42",
            5.0,
            5.0,
            &Paint::fill(Color::WHITE).with_text(8.0, TextAlign::Center),
        );
        assert!(buf.chunks_exact(4).all(|px| px == [0, 0, 0, 0xff]));
    }

    #[test]
    fn text_metrics_from_font() {
        let Some(font) = system_font() else {
            return;
        };
        let scale = Scale::uniform(20.0);
        let one = text_width("1", &font, scale);
        let hundred = text_width("100", &font, scale);
        assert!(one > 0.0);
        assert!(hundred > one * 2.0);
        assert_eq!(text_width("", &font, scale), 0.0);

        let metrics = typeface_metrics(&font);
        assert!(metrics.top <= metrics.ascent);
        assert!(metrics.ascent < 0.0);
        assert!(metrics.descent > 0.0);
        assert!(metrics.bottom >= metrics.descent);
    }

    #[test]
    fn text_is_anchored_by_alignment() {
        let Some(font) = system_font() else {
            return;
        };
        let (left, _, _, bottom) = draw_aligned(&font, TextAlign::Left);
        assert!(left >= 59);
        // Digits sit on the baseline.
        assert!(bottom <= 31);

        let (_, _, right, _) = draw_aligned(&font, TextAlign::Right);
        assert!(right <= 60);

        let (min_x, _, max_x, _) = draw_aligned(&font, TextAlign::Center);
        let middle = (min_x + max_x) as f32 / 2.0;
        assert!((middle - 60.0).abs() <= 3.0);
    }

    #[test]
    fn drawing_outside_is_clipped() {
        let mut buf = frame(8, 8);
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        canvas.draw_line(
            Point::new(-50.0, -50.0),
            Point::new(-40.0, -40.0),
            &Paint::stroke(2.0, Color::WHITE),
        );
        canvas.draw_arc(
            Rect::around(Point::new(100.0, 100.0), 5.0),
            0.0,
            360.0,
            false,
            &Paint::stroke(2.0, Color::WHITE),
        );
        assert!(buf.iter().all(|&b| b == 0));
    }
}
