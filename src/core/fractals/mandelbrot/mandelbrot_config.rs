use crate::core::data::complex_window::ComplexWindow;
use crate::core::fractals::mandelbrot::errors::ConfigError;

pub const DEFAULT_MAX_ITERATIONS: u32 = 300;
pub const DEFAULT_ESCAPE_RADIUS_SQ: f64 = 4.0;
pub const DEFAULT_DENSITY: f64 = 10.0;
pub const DEFAULT_HUES: f64 = 360.0;
pub const WALLPAPER_SATURATION: f32 = 0.5;
pub const WALLPAPER_BRIGHTNESS: f32 = 0.5;

/// Per-session render settings: iteration limits plus colouring.
///
/// Set once before a session starts and read-only while it runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotConfig {
    /// Hue degrees advanced per (continuous) iteration.
    pub density: f64,
    /// Length of the hue cycle, in degrees.
    pub hues: f64,
    pub saturation: f32,
    pub brightness: f32,
    pub max_iterations: u32,
    pub escape_radius_sq: f64,
    /// Colour by the normalised iteration count instead of the integer one.
    pub smooth_colouring: bool,
    /// Region framed by the image at zero pan and unit zoom.
    pub reference_window: ComplexWindow,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            hues: DEFAULT_HUES,
            saturation: 1.0,
            brightness: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            escape_radius_sq: DEFAULT_ESCAPE_RADIUS_SQ,
            smooth_colouring: true,
            reference_window: ComplexWindow::standard_reference(),
        }
    }
}

impl MandelbrotConfig {
    /// Muted palette for a background surface.
    #[must_use]
    pub fn wallpaper() -> Self {
        Self {
            saturation: WALLPAPER_SATURATION,
            brightness: WALLPAPER_BRIGHTNESS,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_escape_radius_sq(mut self, escape_radius_sq: f64) -> Self {
        self.escape_radius_sq = escape_radius_sq;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    #[must_use]
    pub fn with_hues(mut self, hues: f64) -> Self {
        self.hues = hues;
        self
    }

    #[must_use]
    pub fn with_saturation(mut self, saturation: f32) -> Self {
        self.saturation = saturation;
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub fn with_smooth_colouring(mut self, smooth_colouring: bool) -> Self {
        self.smooth_colouring = smooth_colouring;
        self
    }

    #[must_use]
    pub fn with_reference_window(mut self, reference_window: ComplexWindow) -> Self {
        self.reference_window = reference_window;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroMaxIterations);
        }

        if !self.escape_radius_sq.is_finite() || self.escape_radius_sq <= 0.0 {
            return Err(ConfigError::InvalidEscapeRadius(self.escape_radius_sq));
        }

        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ConfigError::InvalidDensity(self.density));
        }

        if !self.hues.is_finite() || self.hues <= 0.0 {
            return Err(ConfigError::InvalidHues(self.hues));
        }

        if !(0.0..=1.0).contains(&self.saturation) {
            return Err(ConfigError::SaturationOutOfRange(self.saturation));
        }

        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ConfigError::BrightnessOutOfRange(self.brightness));
        }

        Ok(())
    }
}
