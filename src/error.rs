//! Configuration errors

use thiserror::Error;

/// Reasons a dashboard style cannot be turned into a usable gauge.
///
/// Raised once, when the style is resolved; a dashboard is never built from
/// a style that fails any of these checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sweep angle must be at most 360 degrees, got {0}")]
    SweepAngleTooLarge(f32),

    #[error("sweep angle must be more than 0 degrees, got {0}")]
    SweepAngleNotPositive(f32),

    #[error("start angle must be in [0, 360) degrees, got {0}")]
    StartAngleOutOfRange(f32),

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("{field} would draw {count} ticks, more than the limit of {limit}")]
    TooManyTicks {
        field: &'static str,
        count: u64,
        limit: u64,
    },

    #[error("max value ({max}) must be greater than min value ({min})")]
    EmptyRange { min: i64, max: i64 },

    #[error("radius {radius}px is too small for the dial rings")]
    RadiusTooSmall { radius: f32 },

    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}
