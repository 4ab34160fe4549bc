use anyhow::{Context, Result, bail};
use clap::Parser;
use progressive_fractals::{
    Colour, ComplexWindow, MandelbrotConfig, RenderEvent, RenderPresenterPort, RenderTarget,
    SessionOptions, SessionState, Viewport,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Renders one Mandelbrot viewport progressively and logs each refinement level
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "progressive-fractals")]
struct Cli {
    /// Image width in pixels
    #[arg(long, default_value = "640")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "480")]
    height: u32,

    /// Zoom factor applied about the reference window (must be > 0)
    #[arg(short, long, default_value = "1.0")]
    zoom: f64,

    /// Horizontal pan in screen pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pan_x: f64,

    /// Vertical pan in screen pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pan_y: f64,

    /// Iteration cap per sample point
    #[arg(short = 'i', long)]
    max_iterations: Option<u32>,

    /// Squared bailout radius (4 is standard)
    #[arg(long)]
    escape_radius_sq: Option<f64>,

    /// Hue degrees advanced per iteration
    #[arg(long)]
    density: Option<f64>,

    /// Length of the hue cycle in degrees
    #[arg(long)]
    hues: Option<f64>,

    /// HSV saturation in [0, 1]
    #[arg(long)]
    saturation: Option<f32>,

    /// HSV brightness in [0, 1]
    #[arg(long)]
    brightness: Option<f32>,

    /// Colour by integer iteration count instead of the smoothed value
    #[arg(long)]
    banded: bool,

    /// Muted wallpaper palette (saturation and brightness 0.5)
    #[arg(long)]
    wallpaper: bool,

    /// Use the [-2.1, 1] x [-1.2, 1.2] reference window instead of [-2, 2]²
    #[arg(long)]
    classic: bool,

    /// Delay before rendering starts, in milliseconds
    #[arg(long, default_value = "0")]
    start_delay_ms: u64,
}

impl Cli {
    fn viewport(&self) -> Result<Viewport> {
        Viewport::new(self.pan_x, self.pan_y, self.zoom, self.width, self.height)
            .context("invalid viewport")
    }

    fn config(&self) -> Result<MandelbrotConfig> {
        let mut config = if self.wallpaper {
            MandelbrotConfig::wallpaper()
        } else {
            MandelbrotConfig::default()
        };

        if self.classic {
            config = config.with_reference_window(ComplexWindow::classic_reference());
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(escape_radius_sq) = self.escape_radius_sq {
            config = config.with_escape_radius_sq(escape_radius_sq);
        }
        if let Some(density) = self.density {
            config = config.with_density(density);
        }
        if let Some(hues) = self.hues {
            config = config.with_hues(hues);
        }
        if let Some(saturation) = self.saturation {
            config = config.with_saturation(saturation);
        }
        if let Some(brightness) = self.brightness {
            config = config.with_brightness(brightness);
        }

        config = config.with_smooth_colouring(!self.banded);
        config.validate().context("invalid colour configuration")?;

        Ok(config)
    }
}

/// Logs session events and remembers the interior pixel count of the last
/// finished frame.
#[derive(Default)]
struct LoggingPresenter {
    interior_pixels: AtomicU64,
}

impl RenderPresenterPort for LoggingPresenter {
    fn present(&self, event: RenderEvent) {
        match event {
            RenderEvent::Started {
                generation,
                width,
                height,
            } => {
                debug!(generation, width, height, "session started");
            }
            RenderEvent::PartialFrame(frame) => {
                let progress = frame.progress;
                if progress.rows_completed == progress.rows_total {
                    info!(
                        level = progress.level,
                        block_size = progress.block_size,
                        "level complete"
                    );
                }
            }
            RenderEvent::Finished(frame) => {
                let interior = (0..frame.pixel_buffer.height())
                    .flat_map(|y| (0..frame.pixel_buffer.width()).map(move |x| (x, y)))
                    .filter(|&(x, y)| frame.pixel_buffer.pixel(x, y) == Some(Colour::BLACK))
                    .count() as u64;
                self.interior_pixels.store(interior, Ordering::Release);

                info!(
                    generation = frame.generation,
                    interior,
                    duration_ms = frame.render_duration.as_millis() as u64,
                    "frame finished"
                );
            }
            RenderEvent::Cancelled { generation } => {
                info!(generation, "session cancelled");
            }
        }
    }
}

fn run(cli: &Cli) -> Result<u64> {
    let viewport = cli.viewport()?;
    let config = cli.config()?;
    let presenter = Arc::new(LoggingPresenter::default());
    let options =
        SessionOptions::default().with_start_delay(Duration::from_millis(cli.start_delay_ms));

    let mut target = RenderTarget::new(
        "cli",
        Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>,
    )
    .with_options(options);

    let session = target.start(&viewport, &config)?;
    let state = session.wait();

    if state != SessionState::Finished {
        bail!("render ended in state {state:?}");
    }

    Ok(presenter.interior_pixels.load(Ordering::Acquire))
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let interior = run(&cli)?;

    info!(
        interior,
        total = u64::from(cli.width) * u64::from(cli.height),
        "done"
    );

    Ok(())
}
