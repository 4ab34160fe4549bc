//! Progressive escape-time Mandelbrot rendering.
//!
//! A render paints one coarse block, then refines it level by level down to
//! single pixels, so a usable preview appears almost at once. Renders run on
//! background sessions that can be cancelled between any two blocks.

pub mod controllers;
pub mod core;

pub use crate::controllers::render_session::{
    FrameData, PartialFrame, RenderError, RenderEvent, RenderPresenterPort, RenderSession,
    RenderTarget, SessionHandle, SessionOptions, SessionState,
};
pub use crate::core::actions::cancellation::{CancelToken, CancellationFlag, Cancelled, NeverCancel};
pub use crate::core::actions::progressive_scan::ports::block_painter::BlockPainter;
pub use crate::core::actions::progressive_scan::ports::colour_map::ColourMap;
pub use crate::core::actions::progressive_scan::ports::escape_evaluator::EscapeEvaluator;
pub use crate::core::actions::progressive_scan::progressive_scan::{
    ProgressiveScanner, ScanProgress, ScanSummary,
};
pub use crate::core::data::colour::Colour;
pub use crate::core::data::complex::Complex;
pub use crate::core::data::complex_window::{ComplexWindow, ComplexWindowError};
pub use crate::core::data::escape_result::EscapeResult;
pub use crate::core::data::pixel_block::PixelBlock;
pub use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError, SharedPixelBuffer};
pub use crate::core::data::viewport::{Viewport, ViewportError};
pub use crate::core::fractals::mandelbrot::algorithm::MandelbrotEvaluator;
pub use crate::core::fractals::mandelbrot::colour_maps::hue_cycle::HueCycleColourMap;
pub use crate::core::fractals::mandelbrot::errors::ConfigError;
pub use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
pub use crate::core::util::pixel_to_complex_coords::{
    MappingError, PixelMapping, viewport_to_complex_window,
};
