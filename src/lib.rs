//! A speedometer-style dial gauge.
//!
//! The gauge is described by a [`DashboardStyle`], resolved once into a
//! [`GaugeConfig`], and turned into a [`RenderPlan`] every time its value or
//! size changes. Plans are plain data: replay them onto any [`Surface`], such
//! as the pixel-buffer [`raster::Canvas`] the [`window`] host uses.

pub mod animator;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod paint;
pub mod plan;
pub mod raster;
pub mod window;

pub use color::Color;
pub use config::{DashboardStyle, Density, GaugeConfig};
pub use error::ConfigError;
pub use geometry::{DerivedGeometry, GaugeState};
pub use layout::{Layout, MeasureSpec, Padding, Size};
pub use paint::TypefaceMetrics;
pub use plan::{DrawCommand, RenderPlan, Surface};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for updates sent to a running dashboard window
#[derive(Debug, Clone)]
pub enum DashboardCommand {
    SetValue(i64),
    SetStyle(Box<DashboardStyle>),
}

/// Main dashboard struct - the primary public interface
#[derive(Debug, Clone)]
pub struct Dashboard {
    style: DashboardStyle,
    density: Density,
    typeface: TypefaceMetrics,
    config: GaugeConfig,
    geometry: DerivedGeometry,
    constraints: (MeasureSpec, MeasureSpec),
    layout: Layout,
    state: GaugeState,
}

impl Dashboard {
    pub fn new(style: DashboardStyle, density: Density) -> Result<Self, ConfigError> {
        let config = GaugeConfig::resolve(&style, density)?;
        let geometry = DerivedGeometry::derive(&config);
        let constraints = (MeasureSpec::Unspecified, MeasureSpec::Unspecified);
        let layout = Layout::measure(&config, &geometry, constraints.0, constraints.1);
        let state = GaugeState::new(&config, style.current_value);
        Ok(Self {
            style,
            density,
            typeface: TypefaceMetrics::default(),
            config,
            geometry,
            constraints,
            layout,
            state,
        })
    }

    /// Font metrics used to place labels and the readout.
    pub fn with_typeface(mut self, typeface: TypefaceMetrics) -> Self {
        self.typeface = typeface;
        self
    }

    pub fn set_typeface(&mut self, typeface: TypefaceMetrics) {
        self.typeface = typeface;
    }

    /// Replaces the style. On error the dashboard keeps its previous style.
    ///
    /// The current value is kept (re-clamped to the new range); the style's
    /// own `current_value` only seeds a new dashboard.
    pub fn set_style(&mut self, style: DashboardStyle) -> Result<(), ConfigError> {
        self.reconfigure(style, self.density)
    }

    pub fn set_density(&mut self, density: Density) -> Result<(), ConfigError> {
        self.reconfigure(self.style.clone(), density)
    }

    fn reconfigure(&mut self, style: DashboardStyle, density: Density) -> Result<(), ConfigError> {
        let config = GaugeConfig::resolve(&style, density)?;
        let geometry = DerivedGeometry::derive(&config);
        self.layout = Layout::measure(&config, &geometry, self.constraints.0, self.constraints.1);
        self.state = GaugeState::new(&config, self.state.current_value());
        self.style = style;
        self.density = density;
        self.config = config;
        self.geometry = geometry;
        Ok(())
    }

    /// Negotiates the dashboard size and re-centers the dial.
    pub fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> Size {
        self.constraints = (width, height);
        self.layout = Layout::measure(&self.config, &self.geometry, width, height);
        self.layout.size
    }

    /// Size the dashboard would take with no constraints.
    pub fn natural_size(&self) -> Size {
        Layout::natural_size(&self.config)
    }

    /// Sets the current value (clamped to the range) and returns the plan to
    /// draw it.
    pub fn update_value(&mut self, value: i64) -> RenderPlan {
        self.state.set_value(&self.config, value);
        self.render_plan()
    }

    pub fn render_plan(&self) -> RenderPlan {
        plan::build_plan(&plan::Frame {
            config: &self.config,
            geometry: &self.geometry,
            layout: &self.layout,
            state: &self.state,
            typeface: &self.typeface,
        })
    }

    pub fn min_value(&self) -> i64 {
        self.config.min_value
    }

    pub fn max_value(&self) -> i64 {
        self.config.max_value
    }

    pub fn current_value(&self) -> i64 {
        self.state.current_value()
    }

    pub fn current_angle(&self) -> f32 {
        self.state.current_angle()
    }

    pub fn style(&self) -> &DashboardStyle {
        &self.style
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn geometry(&self) -> &DerivedGeometry {
        &self.geometry
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Applies one command and returns the plan for the new state.
    pub fn apply(&mut self, command: DashboardCommand) -> Result<RenderPlan, ConfigError> {
        match command {
            DashboardCommand::SetValue(value) => Ok(self.update_value(value)),
            DashboardCommand::SetStyle(style) => {
                self.set_style(*style)?;
                Ok(self.render_plan())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_value_from_style() {
        let style = DashboardStyle::builder().current_value(30).build();
        let dashboard = Dashboard::new(style, Density::default()).unwrap();
        assert_eq!(dashboard.current_value(), 30);
        assert!((dashboard.current_angle() - 234.0).abs() < 1e-4);
    }

    #[test]
    fn failed_style_change_keeps_previous_state() {
        let mut dashboard = Dashboard::new(DashboardStyle::default(), Density::default()).unwrap();
        dashboard.update_value(70);
        let before = dashboard.render_plan();
        let bad = DashboardStyle::builder().sweep_angle(0.0).build();
        assert_eq!(
            dashboard.set_style(bad),
            Err(ConfigError::SweepAngleNotPositive(0.0))
        );
        assert_eq!(dashboard.render_plan(), before);
    }

    #[test]
    fn style_change_reclamps_value() {
        let mut dashboard = Dashboard::new(DashboardStyle::default(), Density::default()).unwrap();
        dashboard.update_value(90);
        dashboard
            .set_style(DashboardStyle::builder().max_value(50).build())
            .unwrap();
        assert_eq!(dashboard.current_value(), 50);
        assert_eq!(dashboard.current_angle(), 360.0);
    }

    #[test]
    fn measure_is_kept_across_density_changes() {
        let mut dashboard = Dashboard::new(DashboardStyle::default(), Density::default()).unwrap();
        assert_eq!(dashboard.natural_size(), Size::new(160.0, 160.0));
        dashboard.measure(MeasureSpec::Exactly(400.0), MeasureSpec::AtMost(1000.0));
        dashboard.set_density(Density::new(2.0)).unwrap();
        assert_eq!(dashboard.layout().size, Size::new(400.0, 320.0));
    }

    #[test]
    fn apply_commands() {
        let mut dashboard = Dashboard::new(DashboardStyle::default(), Density::default()).unwrap();
        let plan = dashboard.apply(DashboardCommand::SetValue(55)).unwrap();
        assert_eq!(plan, dashboard.render_plan());
        assert_eq!(dashboard.current_value(), 55);

        let style = DashboardStyle::builder().unit_text("bar".to_string()).build();
        dashboard
            .apply(DashboardCommand::SetStyle(Box::new(style)))
            .unwrap();
        assert_eq!(dashboard.config().unit_text, "bar");
        assert_eq!(dashboard.current_value(), 55);
    }
}
