//! Size negotiation between the dashboard and its host.

use serde::{Deserialize, Serialize};

use crate::config::GaugeConfig;
use crate::geometry::DerivedGeometry;
use crate::paint::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn uniform(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A layout constraint for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasureSpec {
    Exactly(f32),
    AtMost(f32),
    #[default]
    Unspecified,
}

impl MeasureSpec {
    pub fn resolve(self, natural: f32) -> f32 {
        match self {
            MeasureSpec::Exactly(size) => size,
            MeasureSpec::AtMost(size) => natural.min(size),
            MeasureSpec::Unspecified => natural,
        }
    }
}

/// Resolved size of the dashboard and where the dial pivot sits inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub size: Size,
    pub center: Point,
}

impl Layout {
    /// `2 * radius` plus padding on each axis.
    pub fn natural_size(config: &GaugeConfig) -> Size {
        let diameter = config.radius() * 2.0;
        Size::new(
            diameter + config.padding.horizontal(),
            diameter + config.padding.vertical(),
        )
    }

    pub fn measure(
        config: &GaugeConfig,
        geometry: &DerivedGeometry,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Self {
        let natural = Self::natural_size(config);
        let size = Size::new(width.resolve(natural.width), height.resolve(natural.height));
        let layout = Self::within(config, geometry, size);
        log::debug!(
            "measured {:?} x {:?} -> {}x{}, pivot ({}, {})",
            width,
            height,
            size.width,
            size.height,
            layout.center.x,
            layout.center.y
        );
        layout
    }

    /// Places the dial in a box of the given size, keeping the swept part of
    /// the dial centered in the padded content area.
    pub fn within(config: &GaugeConfig, geometry: &DerivedGeometry, size: Size) -> Self {
        let padding = &config.padding;
        let content_width = (size.width - padding.horizontal()).max(0.0);
        let content_height = (size.height - padding.vertical()).max(0.0);
        let offset = geometry.extents.center_offset();
        Self {
            size,
            center: Point::new(
                padding.left + content_width / 2.0 + offset.x,
                padding.top + content_height / 2.0 + offset.y,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DashboardStyle, Density};

    fn gauge(style: DashboardStyle) -> (GaugeConfig, DerivedGeometry) {
        let config = GaugeConfig::resolve(&style, Density::default()).unwrap();
        let geometry = DerivedGeometry::derive(&config);
        (config, geometry)
    }

    #[test]
    fn measure_spec_modes() {
        assert_eq!(MeasureSpec::Exactly(50.0).resolve(160.0), 50.0);
        assert_eq!(MeasureSpec::Exactly(500.0).resolve(160.0), 500.0);
        assert_eq!(MeasureSpec::AtMost(100.0).resolve(160.0), 100.0);
        assert_eq!(MeasureSpec::AtMost(300.0).resolve(160.0), 160.0);
        assert_eq!(MeasureSpec::Unspecified.resolve(160.0), 160.0);
    }

    #[test]
    fn natural_size_includes_padding() {
        let (config, geometry) = gauge(
            DashboardStyle::builder()
                .radius(100.0)
                .padding(Padding {
                    left: 4.0,
                    top: 6.0,
                    right: 8.0,
                    bottom: 10.0,
                })
                .build(),
        );
        let layout = Layout::measure(
            &config,
            &geometry,
            MeasureSpec::Unspecified,
            MeasureSpec::Unspecified,
        );
        assert_eq!(layout.size, Size::new(212.0, 216.0));
    }

    #[test]
    fn full_circle_pivot_is_box_center() {
        let (config, geometry) = gauge(
            DashboardStyle::builder()
                .radius(100.0)
                .start_angle(0.0)
                .sweep_angle(360.0)
                .build(),
        );
        let layout = Layout::measure(
            &config,
            &geometry,
            MeasureSpec::Exactly(300.0),
            MeasureSpec::Exactly(200.0),
        );
        assert!((layout.center.x - 150.0).abs() < 1e-3);
        assert!((layout.center.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn half_dial_is_shifted_down_to_center_its_extent() {
        let (config, geometry) = gauge(DashboardStyle::builder().radius(120.0).build());
        let layout = Layout::within(&config, &geometry, Size::new(240.0, 240.0));
        let inner = config.inner_radius();
        // Extent spans [-R, inner] vertically around the pivot.
        let top = layout.center.y - 120.0;
        let bottom = layout.center.y + inner;
        assert!((layout.center.x - 120.0).abs() < 1e-3);
        assert!((top - (240.0 - bottom)).abs() < 1e-3);
    }

    #[test]
    fn oversized_padding_does_not_go_negative() {
        let (config, geometry) = gauge(
            DashboardStyle::builder()
                .radius(100.0)
                .start_angle(0.0)
                .sweep_angle(360.0)
                .padding(Padding::uniform(50.0))
                .build(),
        );
        let layout = Layout::within(&config, &geometry, Size::new(20.0, 20.0));
        assert_eq!(layout.center, Point::new(50.0, 50.0));
    }
}
