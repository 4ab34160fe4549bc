use crate::core::actions::progressive_scan::ports::escape_evaluator::EscapeEvaluator;
use crate::core::data::complex::Complex;
use crate::core::data::escape_result::EscapeResult;
use crate::core::fractals::mandelbrot::errors::ConfigError;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;

/// Escape-time evaluation of `z := z² + c` starting from `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotEvaluator {
    max_iterations: u32,
    escape_radius_sq: f64,
}

impl MandelbrotEvaluator {
    pub fn new(max_iterations: u32, escape_radius_sq: f64) -> Result<Self, ConfigError> {
        if max_iterations == 0 {
            return Err(ConfigError::ZeroMaxIterations);
        }

        if !escape_radius_sq.is_finite() || escape_radius_sq <= 0.0 {
            return Err(ConfigError::InvalidEscapeRadius(escape_radius_sq));
        }

        Ok(Self {
            max_iterations,
            escape_radius_sq,
        })
    }

    pub fn from_config(config: &MandelbrotConfig) -> Result<Self, ConfigError> {
        Self::new(config.max_iterations, config.escape_radius_sq)
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }
}

impl EscapeEvaluator for MandelbrotEvaluator {
    #[inline]
    fn evaluate(&self, c: Complex) -> EscapeResult {
        let mut z_re = 0.0;
        let mut z_im = 0.0;
        let mut z_re_sq = 0.0;
        let mut z_im_sq = 0.0;
        let mut iterations = 0;

        loop {
            z_im = 2.0 * z_re * z_im + c.imag;
            z_re = z_re_sq - z_im_sq + c.real;
            z_re_sq = z_re * z_re;
            z_im_sq = z_im * z_im;
            iterations += 1;

            if iterations >= self.max_iterations || z_re_sq + z_im_sq >= self.escape_radius_sq {
                break;
            }
        }

        let final_magnitude_sq = z_re_sq + z_im_sq;

        EscapeResult {
            iterations,
            final_magnitude_sq,
            escaped: final_magnitude_sq >= self.escape_radius_sq,
        }
    }
}
