use crate::core::actions::progressive_scan::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;
use crate::core::data::escape_result::EscapeResult;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use crate::core::util::hsv_to_rgb::hsv_to_rgb;

/// Cycles the hue with the escape value at fixed saturation and brightness.
/// Interior points are black.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueCycleColourMap {
    density: f64,
    hues: f64,
    saturation: f32,
    brightness: f32,
    smooth: bool,
}

impl HueCycleColourMap {
    #[must_use]
    pub fn from_config(config: &MandelbrotConfig) -> Self {
        Self {
            density: config.density,
            hues: config.hues,
            saturation: config.saturation,
            brightness: config.brightness,
            smooth: config.smooth_colouring,
        }
    }

    #[must_use]
    pub fn hue(&self, value: f64) -> f64 {
        (value * self.density).rem_euclid(self.hues)
    }

    /// `0.0` is the interior sentinel and maps to black.
    #[must_use]
    pub fn map(&self, value: f64) -> Colour {
        if value == 0.0 {
            return Colour::BLACK;
        }

        hsv_to_rgb(self.hue(value), self.saturation, self.brightness)
    }
}

impl Default for HueCycleColourMap {
    fn default() -> Self {
        Self::from_config(&MandelbrotConfig::default())
    }
}

impl ColourMap for HueCycleColourMap {
    fn colour_for(&self, result: &EscapeResult) -> Colour {
        self.map(result.colour_value(self.smooth))
    }

    fn display_name(&self) -> &str {
        "Hue cycle"
    }
}
