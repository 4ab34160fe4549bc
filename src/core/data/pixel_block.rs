/// A square of the output image painted with one sampled colour.
///
/// The block samples the fractal at its top-left pixel. It may extend past the
/// image edge; writes are clipped to the buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PixelBlock {
    pub x: i32,
    pub y: i32,
    pub size: u32,
}

/// Half-open pixel span `[x0, x1) × [y0, y1)` inside an image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClippedSpan {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl ClippedSpan {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

impl PixelBlock {
    #[must_use]
    pub const fn new(x: i32, y: i32, size: u32) -> Self {
        Self { x, y, size }
    }

    /// Whether the sampled top-left pixel lies inside a `width × height` image.
    #[must_use]
    pub fn origin_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }

    /// Intersects the block with a `width × height` image.
    #[must_use]
    pub fn clip(&self, width: u32, height: u32) -> Option<ClippedSpan> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.size)).min(i64::from(width));
        let bottom = (i64::from(self.y) + i64::from(self.size)).min(i64::from(height));

        if left >= right || top >= bottom {
            return None;
        }

        Some(ClippedSpan {
            x0: left as u32,
            y0: top as u32,
            x1: right as u32,
            y1: bottom as u32,
        })
    }
}
