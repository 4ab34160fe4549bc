use crate::core::data::complex::Complex;
use crate::core::data::complex_window::ComplexWindow;
use crate::core::data::viewport::Viewport;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum MappingError {
    /// The pixel scale overflows `f64`, or pan and zoom push the image so far
    /// out that adjacent pixels collapse onto the same point.
    #[error("zoom {zoom} has no representable pixel scale")]
    DegenerateScale { zoom: f64 },
}

/// Linear map from image pixels to points on the complex plane.
///
/// Derived once per render from a [`Viewport`] and a reference rectangle.
/// Both axes share one scale, so the fractal is never stretched: the
/// reference rectangle is fitted against the shorter image edge and the
/// other axis is widened to cover the rest of the image, keeping the
/// reference centred.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelMapping {
    origin: Complex,
    pixels_per_unit_re: f64,
    pixels_per_unit_im: f64,
    image_width: u32,
    image_height: u32,
}

impl PixelMapping {
    pub fn new(viewport: &Viewport, reference: &ComplexWindow) -> Result<Self, MappingError> {
        let width = f64::from(viewport.image_width());
        let height = f64::from(viewport.image_height());
        let zoom = viewport.zoom();
        let re_size = reference.width();
        let im_size = reference.height();

        let size_min = width.min(height);
        let (size_re, size_im) = if height >= width {
            (size_min, size_min * im_size / re_size)
        } else {
            (size_min * re_size / im_size, size_min)
        };

        let pixels_per_unit_re = size_re * zoom / re_size;
        let pixels_per_unit_im = size_im * zoom / im_size;

        let offset_re = viewport.pan_x() + ((size_re - width) / 2.0).min(0.0);
        let offset_im = viewport.pan_y() + ((size_im - height) / 2.0).min(0.0);

        let origin = Complex::new(
            offset_re / pixels_per_unit_re + reference.re_min() / zoom,
            offset_im / pixels_per_unit_im + reference.im_min() / zoom,
        );

        let mapping = Self {
            origin,
            pixels_per_unit_re,
            pixels_per_unit_im,
            image_width: viewport.image_width(),
            image_height: viewport.image_height(),
        };

        // Coordinates are largest in magnitude at one edge, so checking the
        // first and last pixel steps covers every neighbouring pair.
        let last_x = viewport.image_width() as i32;
        let last_y = viewport.image_height() as i32;
        let steps_resolve = |from: Complex, to: Complex| to.real > from.real && to.imag > from.imag;
        let scale_is_usable = [pixels_per_unit_re, pixels_per_unit_im, origin.real, origin.imag]
            .iter()
            .all(|value| value.is_finite())
            && steps_resolve(origin, mapping.pixel_to_complex(1, 1))
            && steps_resolve(
                mapping.pixel_to_complex(last_x - 1, last_y - 1),
                mapping.pixel_to_complex(last_x, last_y),
            );

        if !scale_is_usable {
            return Err(MappingError::DegenerateScale { zoom });
        }

        Ok(mapping)
    }

    /// The complex point under pixel `(0, 0)`.
    #[must_use]
    pub fn origin(&self) -> Complex {
        self.origin
    }

    #[must_use]
    pub fn pixels_per_unit(&self) -> (f64, f64) {
        (self.pixels_per_unit_re, self.pixels_per_unit_im)
    }

    #[must_use]
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    #[must_use]
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Maps a pixel's top-left corner onto the plane.
    ///
    /// Coordinates outside the image are extrapolated rather than rejected.
    #[inline]
    #[must_use]
    pub fn pixel_to_complex(&self, x: i32, y: i32) -> Complex {
        Complex::new(
            self.origin.real + f64::from(x) / self.pixels_per_unit_re,
            self.origin.imag + f64::from(y) / self.pixels_per_unit_im,
        )
    }

    /// The region of the plane covered by the whole image.
    ///
    /// Non-empty on both axes: construction rejects scales where neighbouring
    /// pixels share a coordinate.
    #[must_use]
    pub fn window(&self) -> ComplexWindow {
        let re_max = self.origin.real + f64::from(self.image_width) / self.pixels_per_unit_re;
        let im_max = self.origin.imag + f64::from(self.image_height) / self.pixels_per_unit_im;

        ComplexWindow::from_bounds(self.origin.real, re_max, self.origin.imag, im_max)
    }
}

/// Derives the window of the plane a viewport covers.
#[must_use]
pub fn viewport_to_complex_window(
    viewport: &Viewport,
    reference: &ComplexWindow,
) -> Result<ComplexWindow, MappingError> {
    PixelMapping::new(viewport, reference).map(|mapping| mapping.window())
}
