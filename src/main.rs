use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use dashboard::animator::ValueAnimator;
use dashboard::window::{self, WindowOptions};
use dashboard::{Dashboard, DashboardCommand, DashboardStyle, Density};

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(author, version, about = "Sweeps a dial gauge across its range", long_about = None)]
struct Cli {
    /// JSON file with dashboard style overrides
    #[arg(short, long, value_name = "FILE")]
    style: Option<PathBuf>,

    /// TrueType/OpenType font for labels and the readout
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Length of one sweep from min to max
    #[arg(long, default_value_t = 5000)]
    duration_ms: u64,

    /// Frame rate cap
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let style = match &cli.style {
        Some(path) => load_style(path)?,
        None => DashboardStyle::default(),
    };
    let dashboard = Dashboard::new(style, Density::default()).context("invalid dashboard style")?;

    let font = match &cli.font {
        Some(path) => Some(window::load_font(path)?),
        None => {
            log::warn!("no --font given, labels and readout will not be drawn");
            None
        }
    };

    let animator = ValueAnimator::builder()
        .from(dashboard.min_value())
        .to(dashboard.max_value())
        .duration(Duration::from_millis(cli.duration_ms))
        .build();
    let (sender, receiver) = mpsc::channel();
    let tick = Duration::from_secs_f64(1.0 / cli.fps.max(1.0));
    thread::spawn(move || {
        let started = Instant::now();
        loop {
            let value = animator.value_at(started.elapsed());
            if sender.send(DashboardCommand::SetValue(value)).is_err() {
                break;
            }
            thread::sleep(tick);
        }
    });

    let options = WindowOptions::builder()
        .max_framerate(cli.fps)
        .maybe_font(font)
        .build();
    window::show_with_commands(dashboard, receiver, options).context("window host failed")?;
    Ok(())
}

fn load_style(path: &Path) -> Result<DashboardStyle> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read style {}", path.display()))?;
    let style = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse style {}", path.display()))?;
    log::info!("loaded style from {}", path.display());
    Ok(style)
}
