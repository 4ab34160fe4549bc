use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("maximum iterations must be greater than zero")]
    ZeroMaxIterations,

    #[error("escape radius squared must be positive and finite: {0}")]
    InvalidEscapeRadius(f64),

    #[error("colour density must be positive and finite: {0}")]
    InvalidDensity(f64),

    #[error("hue cycle length must be positive and finite: {0}")]
    InvalidHues(f64),

    #[error("saturation must be within [0, 1]: {0}")]
    SaturationOutOfRange(f32),

    #[error("brightness must be within [0, 1]: {0}")]
    BrightnessOutOfRange(f32),
}
