use thiserror::Error;

/// Largest accepted image edge, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 1 << 15;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("zoom must be positive and finite: {zoom}")]
    InvalidZoom { zoom: f64 },

    #[error("pan must be finite: ({pan_x}, {pan_y})")]
    NonFinitePan { pan_x: f64, pan_y: f64 },

    #[error("image size must be non-zero: {width}x{height}")]
    ZeroSized { width: u32, height: u32 },

    #[error("image size {width}x{height} exceeds the {max}px limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("zoom factor must be positive and finite: {factor}")]
    InvalidZoomFactor { factor: f64 },
}

/// Pan and zoom onto the reference rectangle, plus the target image size.
///
/// Pan is measured in screen pixels. Immutable for the duration of a render;
/// a changed viewport is applied by restarting the render.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pan_x: f64,
    pan_y: f64,
    zoom: f64,
    image_width: u32,
    image_height: u32,
}

impl Viewport {
    pub fn new(
        pan_x: f64,
        pan_y: f64,
        zoom: f64,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self, ViewportError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ViewportError::InvalidZoom { zoom });
        }

        if !pan_x.is_finite() || !pan_y.is_finite() {
            return Err(ViewportError::NonFinitePan { pan_x, pan_y });
        }

        if image_width == 0 || image_height == 0 {
            return Err(ViewportError::ZeroSized {
                width: image_width,
                height: image_height,
            });
        }

        if image_width > MAX_IMAGE_DIMENSION || image_height > MAX_IMAGE_DIMENSION {
            return Err(ViewportError::TooLarge {
                width: image_width,
                height: image_height,
                max: MAX_IMAGE_DIMENSION,
            });
        }

        Ok(Self {
            pan_x,
            pan_y,
            zoom,
            image_width,
            image_height,
        })
    }

    /// No pan, unit zoom.
    pub fn identity(image_width: u32, image_height: u32) -> Result<Self, ViewportError> {
        Self::new(0.0, 0.0, 1.0, image_width, image_height)
    }

    #[must_use]
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    #[must_use]
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    #[must_use]
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Appends a translation, in screen pixels, after the current transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Result<Self, ViewportError> {
        Self::new(
            self.pan_x + dx,
            self.pan_y + dy,
            self.zoom,
            self.image_width,
            self.image_height,
        )
    }

    /// Appends a uniform scale after the current transform.
    ///
    /// Post-scaling multiplies the accumulated pan as well, so a pan
    /// followed by a zoom keeps the panned region under the same pixels.
    pub fn zoom_by(&self, factor: f64) -> Result<Self, ViewportError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewportError::InvalidZoomFactor { factor });
        }

        Self::new(
            self.pan_x * factor,
            self.pan_y * factor,
            self.zoom * factor,
            self.image_width,
            self.image_height,
        )
    }

    /// Keeps pan and zoom, targets a new image size.
    pub fn resized(&self, image_width: u32, image_height: u32) -> Result<Self, ViewportError> {
        Self::new(self.pan_x, self.pan_y, self.zoom, image_width, image_height)
    }

    /// Drops any accumulated pan and zoom.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
            ..*self
        }
    }
}
