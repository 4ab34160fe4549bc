use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ComplexWindowError {
    #[error("complex window size must be positive: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("complex window bounds must be finite")]
    NonFinite,
}

/// An axis-aligned region of the complex plane.
///
/// Used both for the fixed reference rectangle a render is framed against and
/// for the window a viewport actually covers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComplexWindow {
    re_min: f64,
    re_max: f64,
    im_min: f64,
    im_max: f64,
}

impl ComplexWindow {
    pub fn new(
        re_min: f64,
        re_max: f64,
        im_min: f64,
        im_max: f64,
    ) -> Result<Self, ComplexWindowError> {
        if ![re_min, re_max, im_min, im_max].iter().all(|v| v.is_finite()) {
            return Err(ComplexWindowError::NonFinite);
        }

        let width = re_max - re_min;
        let height = im_max - im_min;

        if width <= 0.0 || height <= 0.0 {
            return Err(ComplexWindowError::InvalidSize { width, height });
        }

        Ok(Self {
            re_min,
            re_max,
            im_min,
            im_max,
        })
    }

    /// Skips validation; callers guarantee `re_max > re_min` and `im_max > im_min`.
    pub(crate) const fn from_bounds(re_min: f64, re_max: f64, im_min: f64, im_max: f64) -> Self {
        Self {
            re_min,
            re_max,
            im_min,
            im_max,
        }
    }

    /// `[-2, 2] × [-2, 2]`, centred on the origin.
    #[must_use]
    pub const fn standard_reference() -> Self {
        Self {
            re_min: -2.0,
            re_max: 2.0,
            im_min: -2.0,
            im_max: 2.0,
        }
    }

    /// `[-2.1, 1] × [-1.2, 1.2]`, framing the whole set with little margin.
    #[must_use]
    pub const fn classic_reference() -> Self {
        Self {
            re_min: -2.1,
            re_max: 1.0,
            im_min: -1.2,
            im_max: 1.2,
        }
    }

    #[must_use]
    pub fn re_min(&self) -> f64 {
        self.re_min
    }

    #[must_use]
    pub fn re_max(&self) -> f64 {
        self.re_max
    }

    #[must_use]
    pub fn im_min(&self) -> f64 {
        self.im_min
    }

    #[must_use]
    pub fn im_max(&self) -> f64 {
        self.im_max
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.re_max - self.re_min
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.im_max - self.im_min
    }
}

impl Default for ComplexWindow {
    fn default() -> Self {
        Self::standard_reference()
    }
}
