use crate::core::data::pixel_buffer::PixelBufferError;
use crate::core::data::viewport::ViewportError;
use crate::core::fractals::mandelbrot::errors::ConfigError;
use crate::core::util::pixel_to_complex_coords::MappingError;
use thiserror::Error;

/// Reasons a session could not be started. Cancellation is not one of them.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    PixelBuffer(#[from] PixelBufferError),

    #[error("failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),
}
