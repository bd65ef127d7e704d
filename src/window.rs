//! Desktop host: shows a [`Dashboard`] in a winit window, rasterized into a
//! `pixels` frame buffer.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::color::Color;
use crate::config::Density;
use crate::error::ConfigError;
use crate::layout::MeasureSpec;
use crate::raster::{typeface_metrics, Canvas};
use crate::{Dashboard, DashboardCommand};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to open window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixel buffer error: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("invalid dashboard configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read font {}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a usable font", path.display())]
    FontParse { path: PathBuf },
}

#[derive(Clone, Builder)]
pub struct WindowOptions {
    #[builder(default = "Dashboard".to_string(), into)]
    pub title: String,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::BLACK)]
    pub background: Color,
    /// Without a font, labels and the readout are skipped.
    pub font: Option<Font<'static>>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

pub fn show(dashboard: Dashboard, options: WindowOptions) -> Result<(), HostError> {
    run_window(dashboard, options, None)
}

/// Like [`show`], applying commands from `receiver` before each frame.
pub fn show_with_commands(
    dashboard: Dashboard,
    receiver: Receiver<DashboardCommand>,
    options: WindowOptions,
) -> Result<(), HostError> {
    run_window(dashboard, options, Some(receiver))
}

/// Loads a TrueType/OpenType font for labels and the readout.
pub fn load_font(path: &Path) -> Result<Font<'static>, HostError> {
    let data = std::fs::read(path).map_err(|source| HostError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    let font = Font::try_from_vec(data).ok_or_else(|| HostError::FontParse {
        path: path.to_path_buf(),
    })?;
    log::info!("loaded font {}", path.display());
    Ok(font)
}

// ============================================================================
// EVENT LOOP
// ============================================================================

fn run_window(
    mut dashboard: Dashboard,
    options: WindowOptions,
    receiver: Option<Receiver<DashboardCommand>>,
) -> Result<(), HostError> {
    // The style is in density-independent units, which is what winit's
    // logical size measures.
    dashboard.set_density(Density::default())?;
    let natural = dashboard.natural_size();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&options.title)
        .with_inner_size(LogicalSize::new(
            natural.width.max(1.0) as f64,
            natural.height.max(1.0) as f64,
        ))
        .build(&event_loop)?;
    let window = Arc::new(window);

    let scale_factor = window.scale_factor();
    dashboard.set_density(Density::new(scale_factor as f32))?;
    if let Some(font) = &options.font {
        dashboard.set_typeface(typeface_metrics(font));
    }

    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    dashboard.measure(
        MeasureSpec::Exactly(fb_width as f32),
        MeasureSpec::Exactly(fb_height as f32),
    );
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
    log::info!(
        "opened {}x{} window at scale factor {}",
        fb_width,
        fb_height,
        scale_factor
    );

    let frame_duration = Duration::from_secs_f64(1.0 / options.max_framerate.max(1.0));
    let mut last_frame = Instant::now();
    let window_clone = window.clone();

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!("window closed");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                        log::warn!("failed to resize buffer: {}", err);
                    }
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        log::warn!("failed to resize surface: {}", err);
                    }
                    dashboard.measure(
                        MeasureSpec::Exactly(fb_width as f32),
                        MeasureSpec::Exactly(fb_height as f32),
                    );
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    if let Err(err) = dashboard.set_density(Density::new(scale_factor as f32)) {
                        log::warn!("ignoring scale factor {}: {}", scale_factor, err);
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Some(receiver) = &receiver {
                        drain_commands(&mut dashboard, receiver);
                    }

                    let plan = dashboard.render_plan();
                    let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                    if let Some(font) = &options.font {
                        canvas = canvas.with_font(font);
                    }
                    canvas.clear(options.background);
                    plan.render(&mut canvas);
                    if let Err(err) = pixels.render() {
                        log::warn!("render failed: {}", err);
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn drain_commands(dashboard: &mut Dashboard, receiver: &Receiver<DashboardCommand>) {
    while let Ok(command) = receiver.try_recv() {
        if let Err(err) = dashboard.apply(command) {
            log::warn!("rejected style update: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardStyle;
    use std::sync::mpsc;

    #[test]
    fn default_options() {
        let options = WindowOptions::default();
        assert_eq!(options.title, "Dashboard");
        assert_eq!(options.max_framerate, 60.0);
        assert_eq!(options.background, Color::BLACK);
        assert!(options.font.is_none());
    }

    #[test]
    fn font_loading_errors() {
        let missing = std::env::temp_dir().join("dashboard-no-such-font.ttf");
        assert!(matches!(
            load_font(&missing),
            Err(HostError::FontRead { path, .. }) if path == missing
        ));

        let garbage = std::env::temp_dir()
            .join(format!("dashboard-garbage-{}.ttf", std::process::id()));
        std::fs::write(&garbage, b"definitely not a font").unwrap();
        let result = load_font(&garbage);
        std::fs::remove_file(&garbage).unwrap();
        assert!(matches!(result, Err(HostError::FontParse { .. })));
    }

    #[test]
    fn drains_all_pending_commands() {
        let mut dashboard = Dashboard::new(DashboardStyle::default(), Density::default()).unwrap();
        let (sender, receiver) = mpsc::channel();
        sender.send(DashboardCommand::SetValue(10)).unwrap();
        sender
            .send(DashboardCommand::SetStyle(Box::new(
                DashboardStyle::builder().sweep_angle(400.0).build(),
            )))
            .unwrap();
        sender.send(DashboardCommand::SetValue(80)).unwrap();

        drain_commands(&mut dashboard, &receiver);
        assert_eq!(dashboard.current_value(), 80);
        assert_eq!(dashboard.config().sweep_angle, 180.0);
        assert!(receiver.try_recv().is_err());
    }
}
