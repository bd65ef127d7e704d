//! Drawing parameters shared by the render plan and the surfaces that
//! replay it.

use crate::color::Color;

// ============================================================================
// COORDINATES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` along `angle` degrees, clockwise from
    /// the positive x axis (y grows downwards).
    pub fn on_circle(center: Point, radius: f32, angle: f32) -> Self {
        let rad = (angle as f64).to_radians();
        Self {
            x: (center.x as f64 + rad.cos() * radius as f64) as f32,
            y: (center.y as f64 + rad.sin() * radius as f64) as f32,
        }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Square bounding a circle of `radius` around `center`.
    pub fn around(center: Point, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

// ============================================================================
// PAINT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
}

/// Horizontal anchoring of text relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How a gradient continues outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

/// Source of color for a paint. Gradient colors are evenly spaced.
#[derive(Debug, Clone, PartialEq)]
pub enum Shader {
    Solid(Color),
    LinearGradient {
        from: Point,
        to: Point,
        colors: Vec<Color>,
        tile_mode: TileMode,
    },
    RadialGradient {
        center: Point,
        radius: f32,
        colors: Vec<Color>,
        tile_mode: TileMode,
    },
}

impl Shader {
    /// Color of the shader at a surface position.
    pub fn color_at(&self, point: Point) -> Color {
        match self {
            Shader::Solid(color) => *color,
            Shader::LinearGradient {
                from,
                to,
                colors,
                tile_mode,
            } => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let len_sq = dx * dx + dy * dy;
                let t = if len_sq > 0.0 {
                    ((point.x - from.x) * dx + (point.y - from.y) * dy) / len_sq
                } else {
                    0.0
                };
                sample_gradient(colors, t, *tile_mode)
            }
            Shader::RadialGradient {
                center,
                radius,
                colors,
                tile_mode,
            } => {
                let t = if *radius > 0.0 {
                    point.distance(*center) / radius
                } else {
                    1.0
                };
                sample_gradient(colors, t, *tile_mode)
            }
        }
    }
}

/// Samples evenly spaced color stops at position `t`.
pub fn sample_gradient(colors: &[Color], t: f32, tile_mode: TileMode) -> Color {
    match colors {
        [] => Color::TRANSPARENT,
        [only] => *only,
        _ => {
            let t = match tile_mode {
                TileMode::Clamp => t.clamp(0.0, 1.0),
                TileMode::Repeat => t.rem_euclid(1.0),
                TileMode::Mirror => {
                    let m = t.rem_euclid(2.0);
                    if m > 1.0 {
                        2.0 - m
                    } else {
                        m
                    }
                }
            };
            let segments = (colors.len() - 1) as f32;
            let scaled = t * segments;
            let index = (scaled.floor() as usize).min(colors.len() - 2);
            colors[index].lerp(colors[index + 1], scaled - index as f32)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub style: PaintStyle,
    pub stroke_width: f32,
    pub stroke_cap: StrokeCap,
    pub shader: Shader,
    pub text_size: f32,
    pub text_align: TextAlign,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            stroke_cap: StrokeCap::Butt,
            shader: Shader::Solid(color),
            text_size: 0.0,
            text_align: TextAlign::Left,
        }
    }

    pub fn stroke(width: f32, color: Color) -> Self {
        Self {
            style: PaintStyle::Stroke,
            stroke_width: width,
            ..Self::fill(color)
        }
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.stroke_cap = cap;
        self
    }

    pub fn with_shader(mut self, shader: Shader) -> Self {
        self.shader = shader;
        self
    }

    pub fn with_text(mut self, size: f32, align: TextAlign) -> Self {
        self.text_size = size;
        self.text_align = align;
        self
    }

    /// The solid color of this paint, if it has one.
    pub fn color(&self) -> Option<Color> {
        match self.shader {
            Shader::Solid(color) => Some(color),
            _ => None,
        }
    }
}

// ============================================================================
// FONT METRICS
// ============================================================================

/// Vertical font metrics at a given text size, relative to the baseline
/// (negative is above it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub top: f32,
    pub ascent: f32,
    pub descent: f32,
    pub bottom: f32,
}

/// Font metrics per unit of text size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypefaceMetrics {
    pub top: f32,
    pub ascent: f32,
    pub descent: f32,
    pub bottom: f32,
}

impl TypefaceMetrics {
    pub fn at_size(&self, size: f32) -> FontMetrics {
        FontMetrics {
            top: self.top * size,
            ascent: self.ascent * size,
            descent: self.descent * size,
            bottom: self.bottom * size,
        }
    }
}

impl Default for TypefaceMetrics {
    // Proportions of a typical sans-serif UI face.
    fn default() -> Self {
        Self {
            top: -1.056_640_6,
            ascent: -0.927_734_4,
            descent: 0.244_140_6,
            bottom: 0.271_484_4,
        }
    }
}
