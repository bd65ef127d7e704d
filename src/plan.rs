//! Retained-mode render plan for the dashboard.
//!
//! A [`RenderPlan`] is an ordered list of [`DrawCommand`]s; later commands
//! draw over earlier ones. Building one is a pure function of the resolved
//! config, derived geometry, layout and current state, and any [`Surface`]
//! can replay it.

use crate::color::Color;
use crate::config::GaugeConfig;
use crate::geometry::{DerivedGeometry, GaugeState};
use crate::layout::Layout;
use crate::paint::{
    FontMetrics, Paint, Point, Rect, Shader, StrokeCap, TextAlign, TileMode, TypefaceMetrics,
};

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Arc of the oval inscribed in `oval`, angles in degrees, clockwise.
    /// With `use_center` the wedge to the oval's center is filled.
    Arc {
        oval: Rect,
        start_angle: f32,
        sweep_angle: f32,
        use_center: bool,
        paint: Paint,
    },
    Line {
        from: Point,
        to: Point,
        paint: Paint,
    },
    /// Single-line text; `y` is the baseline, `x` is anchored per the
    /// paint's alignment.
    Text {
        text: String,
        x: f32,
        y: f32,
        paint: Paint,
    },
}

/// Drawing primitives a host provides.
pub trait Surface {
    fn draw_arc(
        &mut self,
        oval: Rect,
        start_angle: f32,
        sweep_angle: f32,
        use_center: bool,
        paint: &Paint,
    );
    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &Paint);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
    commands: Vec<DrawCommand>,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays every command, in order, onto `surface`.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Arc {
                    oval,
                    start_angle,
                    sweep_angle,
                    use_center,
                    paint,
                } => surface.draw_arc(*oval, *start_angle, *sweep_angle, *use_center, paint),
                DrawCommand::Line { from, to, paint } => surface.draw_line(*from, *to, paint),
                DrawCommand::Text { text, x, y, paint } => surface.draw_text(text, *x, *y, paint),
            }
        }
    }
}

// ============================================================================
// PLAN BUILDER
// ============================================================================

/// Everything one frame of the dashboard depends on.
pub struct Frame<'a> {
    pub config: &'a GaugeConfig,
    pub geometry: &'a DerivedGeometry,
    pub layout: &'a Layout,
    pub state: &'a GaugeState,
    pub typeface: &'a TypefaceMetrics,
}

pub fn build_plan(frame: &Frame) -> RenderPlan {
    let mut plan = RenderPlan::new();
    add_stripes(&mut plan, frame);
    add_big_slices(&mut plan, frame);
    add_slice_labels(&mut plan, frame);
    add_small_slices(&mut plan, frame);
    add_inner_arc(&mut plan, frame);
    add_inner_slices(&mut plan, frame);
    add_readout(&mut plan, frame);
    add_pointer(&mut plan, frame);
    plan
}

impl Frame<'_> {
    fn center(&self) -> Point {
        self.layout.center
    }

    fn current_angle(&self) -> f32 {
        self.state.current_angle()
    }

    fn point(&self, radius: f32, angle: f32) -> Point {
        Point::on_circle(self.center(), radius, angle)
    }

    /// Sweep from the current angle to the end of the dial.
    fn remaining_sweep(&self) -> f32 {
        self.config.sweep_angle - self.current_angle() + self.config.start_angle
    }

    /// Sweep from the start of the dial to the current angle.
    fn active_sweep(&self) -> f32 {
        self.current_angle() - self.config.start_angle
    }
}

fn add_arc(plan: &mut RenderPlan, oval: Rect, start: f32, sweep: f32, use_center: bool, paint: Paint) {
    plan.add_command(DrawCommand::Arc {
        oval,
        start_angle: start,
        sweep_angle: sweep,
        use_center,
        paint,
    });
}

fn add_line(plan: &mut RenderPlan, from: Point, to: Point, paint: Paint) {
    plan.add_command(DrawCommand::Line { from, to, paint });
}

fn add_stripes(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let center = frame.center();
    let radius = config.radius();
    let start = config.start_angle;
    let current = frame.current_angle();

    // Outer band
    let r = radius - config.out_stripe_width / 2.0;
    add_arc(
        plan,
        Rect::around(center, r),
        start,
        config.sweep_angle,
        false,
        Paint::stroke(config.out_stripe_width, config.out_stripe_color),
    );

    // Mid band, split at the current angle
    let r = radius - config.out_stripe_width - config.stripe_gap - config.mid_stripe_width / 2.0;
    let oval = Rect::around(center, r);
    add_arc(
        plan,
        oval,
        start,
        frame.active_sweep(),
        false,
        Paint::stroke(config.mid_stripe_width, config.mid_stripe_color_light),
    );
    add_arc(
        plan,
        oval,
        current,
        frame.remaining_sweep(),
        false,
        Paint::stroke(config.mid_stripe_width, config.mid_stripe_color),
    );

    // Inner wedge, radial gradient fading from the rim
    let r = radius - config.out_stripe_width - config.stripe_gap - config.mid_stripe_width;
    let oval = Rect::around(center, r);
    let wedge = |edge: Color| {
        Paint::fill(edge).with_shader(Shader::RadialGradient {
            center,
            radius: r,
            colors: vec![
                config.inner_stripe_color_start,
                config.inner_stripe_color_start,
                edge,
            ],
            tile_mode: TileMode::Clamp,
        })
    };
    add_arc(
        plan,
        oval,
        start,
        frame.active_sweep(),
        true,
        wedge(config.inner_stripe_color_light),
    );
    add_arc(
        plan,
        oval,
        current,
        frame.remaining_sweep(),
        true,
        wedge(config.inner_stripe_color),
    );
}

fn add_big_slices(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let paint = Paint::stroke(config.big_slice_stroke, config.arc_color).with_cap(StrokeCap::Round);
    for i in 0..=config.big_slice_count {
        let angle = big_slice_angle(frame, i);
        add_line(
            plan,
            frame.point(config.radius(), angle),
            frame.point(config.radii.big_slice, angle),
            paint.clone(),
        );
    }
}

fn big_slice_angle(frame: &Frame, index: u32) -> f32 {
    index as f32 * frame.geometry.big_slice_angle + frame.config.start_angle
}

fn add_slice_labels(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let metrics = frame.typeface.at_size(config.slice_text_size);
    for (i, label) in frame.geometry.slice_labels.iter().enumerate() {
        let angle = big_slice_angle(frame, i as u32);
        let (align, dy) = label_placement(angle, &metrics);
        let anchor = frame.point(config.radii.slice_text, angle);
        plan.add_command(DrawCommand::Text {
            text: label.clone(),
            x: anchor.x,
            y: anchor.y + dy,
            paint: Paint::fill(config.text_color).with_text(config.slice_text_size, align),
        });
    }
}

/// Tolerance for float drift in accumulated tick angles.
const ANGLE_EPSILON: f32 = 1e-3;

/// Alignment and baseline shift that keep a label inside the dial next to
/// its tick.
///
/// Labels on the left half hang to the right of their anchor and vice versa.
/// At 90 and 270 degrees the text is centered horizontally; at 0 and 180 it
/// is centered vertically on the anchor.
pub fn label_placement(angle: f32, metrics: &FontMetrics) -> (TextAlign, f32) {
    let mut a = angle.rem_euclid(360.0);
    for cardinal in [0.0, 90.0, 180.0, 270.0, 360.0] {
        if (a - cardinal).abs() < ANGLE_EPSILON {
            a = cardinal % 360.0;
        }
    }

    let align = if a > 90.0 && a < 270.0 {
        TextAlign::Left
    } else if a < 90.0 || a > 270.0 {
        TextAlign::Right
    } else {
        TextAlign::Center
    };

    let dy = if (a > 180.0 && a < 270.0) || a > 270.0 {
        -metrics.ascent
    } else if (a > 90.0 && a < 180.0) || (a > 0.0 && a < 90.0) {
        0.0
    } else if a == 0.0 || a == 180.0 {
        (metrics.bottom - metrics.top) / 2.0 - metrics.bottom
    } else if a == 270.0 {
        metrics.descent - metrics.ascent
    } else {
        -metrics.bottom
    };
    (align, dy)
}

fn add_small_slices(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let paint = Paint::stroke(config.thin_stroke, config.arc_color).with_cap(StrokeCap::Round);
    for i in 0..frame.geometry.small_slice_count {
        if i % config.slice_count_per_big_slice == 0 {
            continue;
        }
        let angle = i as f32 * frame.geometry.small_slice_angle + config.start_angle;
        add_line(
            plan,
            frame.point(config.radius(), angle),
            frame.point(config.radii.small_slice, angle),
            paint.clone(),
        );
    }
}

fn add_inner_arc(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let oval = Rect::around(frame.center(), config.inner_radius());
    let stroke = |color| Paint::stroke(config.thin_stroke, color).with_cap(StrokeCap::Round);
    add_arc(
        plan,
        oval,
        config.start_angle,
        frame.active_sweep(),
        false,
        stroke(config.mid_stripe_color_light),
    );
    // The inactive part closes the full circle.
    add_arc(
        plan,
        oval,
        frame.current_angle(),
        360.0 - frame.current_angle() + config.start_angle,
        false,
        stroke(config.inactive_color),
    );
}

fn add_inner_slices(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let current = frame.current_angle();
    let outer = config.inner_radius() - config.inner_slice_inset;
    for i in 0..frame.geometry.inner_slice_count {
        let angle = i as f32 * frame.geometry.inner_slice_angle + config.start_angle;
        let color = if angle >= config.start_angle && angle <= current + ANGLE_EPSILON {
            config.mid_stripe_color_light
        } else {
            config.inactive_color
        };
        add_line(
            plan,
            frame.point(outer, angle),
            frame.point(config.radii.inner_slice, angle),
            Paint::stroke(config.thin_stroke, color).with_cap(StrokeCap::Round),
        );
    }
}

fn add_readout(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let center = frame.center();

    let value_metrics = frame.typeface.at_size(config.value_text_size);
    let half_height = (value_metrics.bottom - value_metrics.top) / 2.0;
    plan.add_command(DrawCommand::Text {
        text: frame.state.current_value().to_string(),
        x: center.x,
        y: center.y + half_height - value_metrics.bottom,
        paint: Paint::stroke(config.value_stroke, config.text_color)
            .with_text(config.value_text_size, TextAlign::Center),
    });

    let unit_size = config.value_text_size / 3.0;
    let unit_metrics = frame.typeface.at_size(unit_size);
    plan.add_command(DrawCommand::Text {
        text: config.unit_text.clone(),
        x: center.x,
        y: center.y + half_height + unit_metrics.bottom,
        paint: Paint::fill(config.text_color).with_text(unit_size, TextAlign::Center),
    });
}

fn add_pointer(plan: &mut RenderPlan, frame: &Frame) {
    let config = frame.config;
    let angle = frame.current_angle();
    let from = frame.point(
        config.radius() - config.out_stripe_width - config.pointer_inset,
        angle,
    );
    let to = frame.point(config.inner_radius() + config.pointer_inset, angle);
    let paint = Paint::stroke(config.pointer_stroke, config.mid_stripe_color_light)
        .with_cap(StrokeCap::Round)
        .with_shader(Shader::LinearGradient {
            from,
            to,
            colors: vec![config.mid_stripe_color_light, config.inner_stripe_color_start],
            tile_mode: TileMode::Clamp,
        });
    add_line(plan, from, to, paint);
}
