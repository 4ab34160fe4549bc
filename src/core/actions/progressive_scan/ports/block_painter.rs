use crate::core::data::colour::Colour;
use crate::core::data::pixel_block::PixelBlock;
use crate::core::data::pixel_buffer::SharedPixelBuffer;

/// Destination of a progressive scan.
///
/// Every call paints one whole rectangle; implementations must not let a
/// reader observe a block half-written.
pub trait BlockPainter {
    fn clear(&mut self, colour: Colour);

    fn paint_block(&mut self, block: PixelBlock, colour: Colour);
}

impl BlockPainter for SharedPixelBuffer {
    fn clear(&mut self, colour: Colour) {
        self.write().fill(colour);
    }

    fn paint_block(&mut self, block: PixelBlock, colour: Colour) {
        self.write().fill_block(block, colour);
    }
}
