use std::f64::consts::LN_2;

/// Outcome of iterating one sample point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EscapeResult {
    pub iterations: u32,
    pub final_magnitude_sq: f64,
    pub escaped: bool,
}

impl EscapeResult {
    /// Normalised iteration count `n + 1 - log2(ln |z|)`.
    ///
    /// Falls back to the integer count whenever the logarithms are undefined
    /// or the result is not finite. Meaningful only for escaped points.
    #[must_use]
    pub fn continuous_iterations(&self) -> f64 {
        let iterations = f64::from(self.iterations);
        let nu = iterations + 1.0 - self.final_magnitude_sq.sqrt().ln().ln() / LN_2;

        if nu.is_finite() { nu } else { iterations }
    }

    /// Value handed to the colour map; `0.0` marks an interior point.
    #[must_use]
    pub fn colour_value(&self, smooth: bool) -> f64 {
        if !self.escaped {
            return 0.0;
        }

        if smooth {
            self.continuous_iterations()
        } else {
            f64::from(self.iterations)
        }
    }
}
