use crate::core::data::colour::Colour;
use crate::core::data::pixel_block::PixelBlock;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    #[error("could not allocate a {width}x{height} pixel buffer")]
    AllocationFailed { width: u32, height: u32 },
}

pub type PixelBufferData = Vec<u8>;

/// Packed RGB image, row-major, three bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    buffer: PixelBufferData,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer, failing instead of aborting when memory is short.
    pub fn new(width: u32, height: u32) -> Result<Self, PixelBufferError> {
        let failed = || PixelBufferError::AllocationFailed { width, height };
        let total_bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(failed)?;

        let mut buffer = PixelBufferData::new();
        buffer.try_reserve_exact(total_bytes).map_err(|_| failed())?;
        buffer.resize(total_bytes, 0);

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn buffer(&self) -> &PixelBufferData {
        &self.buffer
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = self.index(x, y);

        Some(Colour::new(
            self.buffer[index],
            self.buffer[index + 1],
            self.buffer[index + 2],
        ))
    }

    pub fn fill(&mut self, colour: Colour) {
        for pixel in self.buffer.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&[colour.r, colour.g, colour.b]);
        }
    }

    /// Paints the part of `block` that overlaps the image. Returns whether
    /// anything was written.
    pub fn fill_block(&mut self, block: PixelBlock, colour: Colour) -> bool {
        let Some(span) = block.clip(self.width, self.height) else {
            return false;
        };

        let rgb = [colour.r, colour.g, colour.b];

        for y in span.y0..span.y1 {
            let start = self.index(span.x0, y);
            let end = self.index(span.x1, y);

            for pixel in self.buffer[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&rgb);
            }
        }

        true
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

/// A [`PixelBuffer`] shared between one painting worker and any number of
/// presenters.
///
/// Each block fill holds the write lock for the whole rectangle, so readers
/// see every block either untouched or fully painted.
#[derive(Debug, Clone)]
pub struct SharedPixelBuffer {
    inner: Arc<RwLock<PixelBuffer>>,
}

impl SharedPixelBuffer {
    #[must_use]
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            inner: Arc::new(RwLock::new(buffer)),
        }
    }

    /// Read access to the committed pixels.
    pub fn read(&self) -> RwLockReadGuard<'_, PixelBuffer> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies the committed pixels out.
    #[must_use]
    pub fn snapshot(&self) -> PixelBuffer {
        self.read().clone()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, PixelBuffer> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
