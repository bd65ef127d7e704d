use crate::config::GaugeConfig;
use crate::paint::Point;

// ============================================================================
// VALUE <-> ANGLE
// ============================================================================

/// Maps a value onto the dial, clamping it to `[min_value, max_value]`.
///
/// `min_value` lands on `start_angle` and `max_value` on
/// `start_angle + sweep_angle`.
pub fn angle_from_value(config: &GaugeConfig, value: i64) -> f32 {
    let value = value.clamp(config.min_value, config.max_value);
    let fraction = offset_from_min(config, value) as f64 / value_span(config) as f64;
    (config.sweep_angle as f64 * fraction) as f32 + config.start_angle
}

/// Inverse of [`angle_from_value`]; angles outside the sweep are clamped.
pub fn value_from_angle(config: &GaugeConfig, angle: f32) -> f64 {
    let fraction = ((angle - config.start_angle) / config.sweep_angle).clamp(0.0, 1.0) as f64;
    config.min_value as f64 + fraction * value_span(config) as f64
}

// Widened so the full i64 range does not overflow.
fn value_span(config: &GaugeConfig) -> i128 {
    config.max_value as i128 - config.min_value as i128
}

fn offset_from_min(config: &GaugeConfig, value: i64) -> i128 {
    value as i128 - config.min_value as i128
}

/// Whether `angle` (any turn) falls on the swept part of the dial.
pub fn sweep_contains(start_angle: f32, sweep_angle: f32, angle: f32) -> bool {
    sweep_angle >= 360.0 || (angle - start_angle).rem_euclid(360.0) <= sweep_angle
}

/// Labels for the big ticks, `big_slice_count + 1` of them.
///
/// The ends are exactly `min_value` and `max_value`; the ticks in between use
/// the integer step `(max - min) / big_slice_count` times the tick index.
pub fn slice_labels(config: &GaugeConfig) -> Vec<String> {
    let count = config.big_slice_count as i128;
    let step = value_span(config) / count;
    (0..=count)
        .map(|i| match i {
            0 => config.min_value.to_string(),
            i if i == count => config.max_value.to_string(),
            i => (step * i).to_string(),
        })
        .collect()
}

// ============================================================================
// DERIVED GEOMETRY
// ============================================================================

/// Upper bound on small ticks and on inner ticks, each of which becomes one
/// line in every render plan.
pub const MAX_TICK_COUNT: u64 = 10_000;

pub(crate) fn small_slices(big_slice_count: u32, slice_count_per_big_slice: u32) -> u64 {
    big_slice_count as u64 * slice_count_per_big_slice as u64
}

/// `floor(360 / inner_slice_angle)`, computed without the f32 rounding of the
/// chained divisions so exact multiples are not lost.
pub(crate) fn inner_slices_per_turn(small_slice_count: u64, per_small: u32, sweep_angle: f32) -> f64 {
    let inner_per_sweep = small_slice_count as f64 * per_small as f64;
    (360.0 * inner_per_sweep / sweep_angle as f64 + 1e-9).floor()
}

/// Furthest reach of the dial around its pivot, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Extents {
    fn of(config: &GaugeConfig) -> Self {
        let radius = config.radius();
        let inner = config.inner_radius();
        let (start, sweep) = (config.start_angle, config.sweep_angle);
        let first = Point::on_circle(Point::default(), radius, start);
        let last = Point::on_circle(Point::default(), radius, start + sweep);

        let mut xs = vec![-inner, inner, first.x, last.x];
        if sweep_contains(start, sweep, 180.0) {
            xs.push(-radius);
        }
        if sweep_contains(start, sweep, 0.0) {
            xs.push(radius);
        }

        let mut ys = vec![-inner, inner, first.y, last.y];
        if sweep_contains(start, sweep, 270.0) {
            ys.push(-radius);
        }
        if sweep_contains(start, sweep, 90.0) {
            ys.push(radius);
        }

        let (min_x, max_x) = min_max(&xs);
        let (min_y, max_y) = min_max(&ys);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Shift from the middle of the extents to the pivot.
    pub fn center_offset(&self) -> Point {
        Point::new(
            -(self.min_x + self.max_x) / 2.0,
            -(self.min_y + self.max_y) / 2.0,
        )
    }
}

fn min_max(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Angles, counts and labels that follow from a [`GaugeConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedGeometry {
    pub big_slice_angle: f32,
    pub small_slice_angle: f32,
    pub small_slice_count: u32,
    pub inner_slice_angle: f32,
    /// Inner ticks run the full circle, not only the sweep.
    pub inner_slice_count: u32,
    pub slice_labels: Vec<String>,
    pub extents: Extents,
}

impl DerivedGeometry {
    pub fn derive(config: &GaugeConfig) -> Self {
        let big_slice_angle = config.sweep_angle / config.big_slice_count as f32;
        let small_slice_angle = big_slice_angle / config.slice_count_per_big_slice as f32;
        let inner_slice_angle = small_slice_angle / config.inner_slice_count_per_small_slice as f32;
        // Both counts are bounded by MAX_TICK_COUNT when the config resolves.
        let small_slice_count = small_slices(config.big_slice_count, config.slice_count_per_big_slice);
        let inner_slice_count = inner_slices_per_turn(
            small_slice_count,
            config.inner_slice_count_per_small_slice,
            config.sweep_angle,
        );
        let small_slice_count = small_slice_count.min(MAX_TICK_COUNT) as u32;
        let inner_slice_count = inner_slice_count.min(MAX_TICK_COUNT as f64) as u32;

        let geometry = Self {
            big_slice_angle,
            small_slice_angle,
            small_slice_count,
            inner_slice_angle,
            inner_slice_count,
            slice_labels: slice_labels(config),
            extents: Extents::of(config),
        };
        log::debug!(
            "derived geometry: {} big / {} small / {} inner ticks, extents {:?}",
            config.big_slice_count + 1,
            geometry.small_slice_count,
            geometry.inner_slice_count,
            geometry.extents
        );
        geometry
    }
}

// ============================================================================
// STATE
// ============================================================================

/// The one mutable part of a dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    current_value: i64,
    current_angle: f32,
}

impl GaugeState {
    pub fn new(config: &GaugeConfig, value: i64) -> Self {
        let mut state = Self {
            current_value: config.min_value,
            current_angle: config.start_angle,
        };
        state.set_value(config, value);
        state
    }

    /// Stores the value clamped to the gauge range and recomputes its angle.
    pub fn set_value(&mut self, config: &GaugeConfig, value: i64) {
        let clamped = value.clamp(config.min_value, config.max_value);
        if clamped != value {
            log::trace!(
                "value {} outside [{}, {}], clamped to {}",
                value,
                config.min_value,
                config.max_value,
                clamped
            );
        }
        self.current_value = clamped;
        self.current_angle = angle_from_value(config, clamped);
    }

    pub fn current_value(&self) -> i64 {
        self.current_value
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }
}
