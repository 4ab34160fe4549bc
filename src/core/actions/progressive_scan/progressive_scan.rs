use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::actions::progressive_scan::ports::block_painter::BlockPainter;
use crate::core::actions::progressive_scan::ports::colour_map::ColourMap;
use crate::core::actions::progressive_scan::ports::escape_evaluator::EscapeEvaluator;
use crate::core::data::colour::Colour;
use crate::core::data::pixel_block::PixelBlock;
use crate::core::util::block_schedule::initial_block_size;
use crate::core::util::pixel_to_complex_coords::PixelMapping;

/// Checkpoint emitted after the first block and after every grid row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    /// Edge of the blocks being painted at this level.
    pub block_size: u32,
    /// `0` for the single coarsest block, then one per refinement level.
    pub level: u32,
    pub rows_completed: u32,
    pub rows_total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Block edge of every level run, coarsest first.
    pub block_sizes: Vec<u32>,
    pub blocks_painted: u64,
}

/// Coarse-to-fine renderer.
///
/// Paints one block covering the whole image, then repeatedly halves the
/// block edge. At each level the grid of the previous pitch is walked and the
/// three quadrants of every cell that the previous level did not sample are
/// painted; the top-left quadrant keeps its coarser colour, which was already
/// sampled at that exact pixel. Once the level with 1px blocks completes every
/// pixel holds the colour sampled at its own coordinate, and every pixel was
/// sampled exactly once.
pub struct ProgressiveScanner<'a, E, M> {
    mapping: PixelMapping,
    evaluator: &'a E,
    colour_map: &'a M,
}

impl<'a, E, M> ProgressiveScanner<'a, E, M>
where
    E: EscapeEvaluator,
    M: ColourMap,
{
    #[must_use]
    pub fn new(mapping: PixelMapping, evaluator: &'a E, colour_map: &'a M) -> Self {
        Self {
            mapping,
            evaluator,
            colour_map,
        }
    }

    /// Runs every level to completion, or stops at the first cancellation
    /// poll that fires, leaving the painter with whatever was already painted.
    ///
    /// Cancellation is polled before each level, each row, each block
    /// evaluation and each block write.
    pub fn run<P, C, F>(
        &self,
        painter: &mut P,
        cancel: &C,
        mut on_progress: F,
    ) -> Result<ScanSummary, Cancelled>
    where
        P: BlockPainter,
        C: CancelToken,
        F: FnMut(ScanProgress),
    {
        let width = self.mapping.image_width();
        let height = self.mapping.image_height();
        let mut block = initial_block_size(width, height);
        let mut summary = ScanSummary::default();

        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        painter.clear(Colour::WHITE);

        let first = PixelBlock::new(0, 0, block);
        let colour = self.sample(first);
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        painter.paint_block(first, colour);
        summary.blocks_painted += 1;
        summary.block_sizes.push(block);

        on_progress(ScanProgress {
            block_size: block,
            level: 0,
            rows_completed: 1,
            rows_total: 1,
        });

        let mut level = 0;

        while block > 1 {
            let stride = block;
            block = stride / 2;
            level += 1;

            if cancel.is_cancelled() {
                return Err(Cancelled);
            }

            let rows_total = height.div_ceil(stride);
            let mut rows_completed = 0;
            let mut y1 = 0;

            while y1 < height {
                if cancel.is_cancelled() {
                    return Err(Cancelled);
                }

                let blocks = self.row_blocks(y1, stride, block);
                let colours = blocks
                    .par_iter()
                    .map(|&block| {
                        if cancel.is_cancelled() {
                            Err(Cancelled)
                        } else {
                            Ok(self.sample(block))
                        }
                    })
                    .collect::<Result<Vec<Colour>, Cancelled>>()?;

                for (&block, &colour) in blocks.iter().zip(&colours) {
                    if cancel.is_cancelled() {
                        return Err(Cancelled);
                    }
                    painter.paint_block(block, colour);
                }

                summary.blocks_painted += blocks.len() as u64;
                rows_completed += 1;
                trace!(level, rows_completed, rows_total, "row painted");

                on_progress(ScanProgress {
                    block_size: block,
                    level,
                    rows_completed,
                    rows_total,
                });

                y1 += stride;
            }

            summary.block_sizes.push(block);
            debug!(level, block_size = block, "refinement level complete");
        }

        Ok(summary)
    }

    /// Quadrants of every cell in the grid row at `y1` that the previous
    /// level left unsampled, skipping those whose origin is off the image.
    fn row_blocks(&self, y1: u32, stride: u32, block: u32) -> Vec<PixelBlock> {
        let width = self.mapping.image_width();
        let height = self.mapping.image_height();
        let y2 = y1 + block;

        (0..width)
            .step_by(stride as usize)
            .flat_map(|x1| {
                let x2 = x1 + block;
                [(x1, y2), (x2, y1), (x2, y2)]
            })
            .map(|(x, y)| PixelBlock::new(x as i32, y as i32, block))
            .filter(|candidate| candidate.origin_within(width, height))
            .collect()
    }

    #[inline]
    fn sample(&self, block: PixelBlock) -> Colour {
        let c = self.mapping.pixel_to_complex(block.x, block.y);
        let result = self.evaluator.evaluate(c);
        self.colour_map.colour_for(&result)
    }
}
