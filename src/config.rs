use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::geometry::{inner_slices_per_turn, small_slices, MAX_TICK_COUNT};
use crate::layout::Padding;

// ============================================================================
// FIXED LAYOUT CONSTANTS (dp)
// ============================================================================

/// Length of a small tick, measured inward from the outer radius.
pub const SMALL_SLICE_LENGTH_DP: f32 = 8.0;
/// How much further a big tick reaches past a small one.
pub const BIG_SLICE_EXTRA_DP: f32 = 4.0;
/// Gap between the end of a big tick and its label anchor.
pub const SLICE_TEXT_GAP_DP: f32 = 3.0;
/// Gap between the outer band and the mid band.
pub const STRIPE_GAP_DP: f32 = 1.0;
/// Length of an inner tick, measured inward from the inner radius.
pub const INNER_SLICE_LENGTH_DP: f32 = 8.0;
pub const INNER_SLICE_INSET_DP: f32 = 2.0;
pub const POINTER_INSET_DP: f32 = 2.0;
pub const BIG_SLICE_STROKE_DP: f32 = 2.0;
pub const THIN_STROKE_DP: f32 = 1.0;
pub const POINTER_STROKE_DP: f32 = 2.0;
pub const VALUE_STROKE_DP: f32 = 2.0;

// ============================================================================
// DENSITY
// ============================================================================

/// Converts abstract size units into surface pixels.
///
/// `dp` is used for lengths and strokes, `sp` for text sizes, mirroring the
/// split a mobile host makes between display density and font scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub density: f32,
    pub scaled_density: f32,
}

impl Density {
    pub const fn new(density: f32) -> Self {
        Self {
            density,
            scaled_density: density,
        }
    }

    pub fn dp(&self, value: f32) -> f32 {
        value * self.density
    }

    pub fn sp(&self, value: f32) -> f32 {
        value * self.scaled_density
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::new(1.0)
    }
}

// ============================================================================
// RAW STYLE
// ============================================================================

/// Style inputs as the host supplies them, in density-independent units.
///
/// Built with the generated builder or deserialized from JSON; fields left
/// out take the defaults below.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStyle {
    /// Outer radius of the dial (dp).
    #[builder(default = 80.0)]
    pub radius: f32,
    /// Degrees, clockwise from 3 o'clock.
    #[builder(default = 180.0)]
    pub start_angle: f32,
    #[builder(default = 180.0)]
    pub sweep_angle: f32,
    #[builder(default = 10)]
    pub big_slice_count: u32,
    #[builder(default = 5)]
    pub slice_count_per_big_slice: u32,
    #[builder(default = 5)]
    pub inner_slice_count_per_small_slice: u32,
    #[builder(default = 0)]
    pub min_value: i64,
    #[builder(default = 100)]
    pub max_value: i64,
    #[builder(default = 0)]
    pub current_value: i64,

    // Ticks and text
    #[builder(default = Color::WHITE)]
    pub arc_color: Color,
    /// Falls back to `arc_color` when unset.
    pub text_color: Option<Color>,
    #[builder(default = 12.0)]
    pub slice_text_size: f32,
    #[builder(default = 14.0)]
    pub value_text_size: f32,
    #[builder(default = "".to_string())]
    pub unit_text: String,

    // Stripe bands
    #[builder(default = 8.0)]
    pub out_stripe_width: f32,
    #[builder(default = Color::from_argb(0x3300_8fff))]
    pub out_stripe_color: Color,
    #[builder(default = 6.0)]
    pub mid_stripe_width: f32,
    #[builder(default = Color::from_argb(0xff00_8fff))]
    pub mid_stripe_color_light: Color,
    #[builder(default = Color::from_argb(0x8000_8fff))]
    pub mid_stripe_color: Color,
    #[builder(default = Color::from_argb(0xaa00_8fff))]
    pub inner_stripe_color_light: Color,
    #[builder(default = Color::from_argb(0x4000_8fff))]
    pub inner_stripe_color: Color,
    #[builder(default = Color::BLACK)]
    pub inner_stripe_color_start: Color,
    /// Color of the not-yet-reached part of the inner arc and inner ticks.
    #[builder(default = Color::GRAY)]
    pub inactive_color: Color,

    #[builder(default)]
    pub padding: Padding,
}

impl Default for DashboardStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

// ============================================================================
// RESOLVED CONFIGURATION
// ============================================================================

/// Concentric radii of the dial, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radii {
    pub outer: f32,
    pub small_slice: f32,
    pub big_slice: f32,
    pub slice_text: f32,
    pub inner: f32,
    pub inner_slice: f32,
}

impl Radii {
    fn new(radius: f32, density: Density) -> Self {
        let small_slice = radius - density.dp(SMALL_SLICE_LENGTH_DP);
        let big_slice = small_slice - density.dp(BIG_SLICE_EXTRA_DP);
        let slice_text = big_slice - density.dp(SLICE_TEXT_GAP_DP);
        let inner = radius / 12.0 * 5.0;
        let inner_slice = inner - density.dp(INNER_SLICE_LENGTH_DP);
        Self {
            outer: radius,
            small_slice,
            big_slice,
            slice_text,
            inner,
            inner_slice,
        }
    }

    /// `inner_slice < inner < slice_text < big_slice < small_slice < outer`,
    /// all non-negative.
    fn is_ordered(&self) -> bool {
        let chain = [
            self.inner_slice,
            self.inner,
            self.slice_text,
            self.big_slice,
            self.small_slice,
            self.outer,
        ];
        self.inner_slice >= 0.0 && chain.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// Validated gauge configuration with every size converted to pixels.
///
/// Read-only once resolved; build a new one when the style or density
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeConfig {
    pub radii: Radii,
    pub start_angle: f32,
    pub sweep_angle: f32,
    pub big_slice_count: u32,
    pub slice_count_per_big_slice: u32,
    pub inner_slice_count_per_small_slice: u32,
    pub min_value: i64,
    pub max_value: i64,

    pub arc_color: Color,
    pub text_color: Color,
    pub slice_text_size: f32,
    pub value_text_size: f32,
    pub unit_text: String,

    pub out_stripe_width: f32,
    pub out_stripe_color: Color,
    pub mid_stripe_width: f32,
    pub mid_stripe_color_light: Color,
    pub mid_stripe_color: Color,
    pub inner_stripe_color_light: Color,
    pub inner_stripe_color: Color,
    pub inner_stripe_color_start: Color,
    pub inactive_color: Color,

    pub stripe_gap: f32,
    pub inner_slice_inset: f32,
    pub pointer_inset: f32,
    pub big_slice_stroke: f32,
    pub thin_stroke: f32,
    pub pointer_stroke: f32,
    pub value_stroke: f32,

    pub padding: Padding,
}

impl GaugeConfig {
    pub fn resolve(style: &DashboardStyle, density: Density) -> Result<Self, ConfigError> {
        let sweep = style.sweep_angle;
        if sweep > 360.0 {
            return Err(ConfigError::SweepAngleTooLarge(sweep));
        }
        if sweep.is_nan() || sweep <= 0.0 {
            return Err(ConfigError::SweepAngleNotPositive(sweep));
        }
        let start = style.start_angle;
        if !(0.0..360.0).contains(&start) {
            return Err(ConfigError::StartAngleOutOfRange(start));
        }
        for (field, count) in [
            ("big_slice_count", style.big_slice_count),
            ("slice_count_per_big_slice", style.slice_count_per_big_slice),
            (
                "inner_slice_count_per_small_slice",
                style.inner_slice_count_per_small_slice,
            ),
        ] {
            if count == 0 {
                return Err(ConfigError::ZeroCount { field });
            }
        }
        let small_slice_count =
            small_slices(style.big_slice_count, style.slice_count_per_big_slice);
        if small_slice_count > MAX_TICK_COUNT {
            return Err(ConfigError::TooManyTicks {
                field: "slice_count_per_big_slice",
                count: small_slice_count,
                limit: MAX_TICK_COUNT,
            });
        }
        let inner_slice_count = inner_slices_per_turn(
            small_slice_count,
            style.inner_slice_count_per_small_slice,
            sweep,
        );
        if inner_slice_count > MAX_TICK_COUNT as f64 {
            return Err(ConfigError::TooManyTicks {
                field: "inner_slice_count_per_small_slice",
                count: inner_slice_count as u64,
                limit: MAX_TICK_COUNT,
            });
        }
        if style.max_value <= style.min_value {
            return Err(ConfigError::EmptyRange {
                min: style.min_value,
                max: style.max_value,
            });
        }

        let radius = density.dp(style.radius);
        let radii = Radii::new(radius, density);
        if !radii.is_ordered() {
            return Err(ConfigError::RadiusTooSmall { radius });
        }

        let config = Self {
            radii,
            start_angle: start,
            sweep_angle: sweep,
            big_slice_count: style.big_slice_count,
            slice_count_per_big_slice: style.slice_count_per_big_slice,
            inner_slice_count_per_small_slice: style.inner_slice_count_per_small_slice,
            min_value: style.min_value,
            max_value: style.max_value,
            arc_color: style.arc_color,
            text_color: style.text_color.unwrap_or(style.arc_color),
            slice_text_size: density.sp(style.slice_text_size),
            value_text_size: density.sp(style.value_text_size),
            unit_text: style.unit_text.clone(),
            out_stripe_width: density.dp(style.out_stripe_width),
            out_stripe_color: style.out_stripe_color,
            mid_stripe_width: density.dp(style.mid_stripe_width),
            mid_stripe_color_light: style.mid_stripe_color_light,
            mid_stripe_color: style.mid_stripe_color,
            inner_stripe_color_light: style.inner_stripe_color_light,
            inner_stripe_color: style.inner_stripe_color,
            inner_stripe_color_start: style.inner_stripe_color_start,
            inactive_color: style.inactive_color,
            stripe_gap: density.dp(STRIPE_GAP_DP),
            inner_slice_inset: density.dp(INNER_SLICE_INSET_DP),
            pointer_inset: density.dp(POINTER_INSET_DP),
            big_slice_stroke: density.dp(BIG_SLICE_STROKE_DP),
            thin_stroke: density.dp(THIN_STROKE_DP),
            pointer_stroke: density.dp(POINTER_STROKE_DP),
            value_stroke: density.dp(VALUE_STROKE_DP),
            padding: style.padding.scaled(density.density),
        };
        log::debug!(
            "resolved gauge: radius={}px start={} sweep={} range=[{}, {}]",
            radius,
            start,
            sweep,
            config.min_value,
            config.max_value
        );
        Ok(config)
    }

    pub fn radius(&self) -> f32 {
        self.radii.outer
    }

    pub fn inner_radius(&self) -> f32 {
        self.radii.inner
    }

    pub fn end_angle(&self) -> f32 {
        self.start_angle + self.sweep_angle
    }
}
