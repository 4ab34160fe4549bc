use crate::core::actions::progressive_scan::progressive_scan::ScanProgress;
use crate::core::data::pixel_buffer::{PixelBuffer, SharedPixelBuffer};
use std::time::Duration;

#[derive(Debug)]
pub struct PartialFrame {
    pub generation: u64,
    pub progress: ScanProgress,
    /// The live buffer the worker is painting. Readers see every block
    /// committed so far.
    pub buffer: SharedPixelBuffer,
}

#[derive(Debug)]
pub struct FrameData {
    pub generation: u64,
    pub pixel_buffer: PixelBuffer,
    pub render_duration: Duration,
}

#[derive(Debug)]
pub enum RenderEvent {
    Started {
        generation: u64,
        width: u32,
        height: u32,
    },
    PartialFrame(PartialFrame),
    Finished(FrameData),
    Cancelled {
        generation: u64,
    },
}

impl RenderEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Started { generation, .. } | Self::Cancelled { generation } => *generation,
            Self::PartialFrame(frame) => frame.generation,
            Self::Finished(frame) => frame.generation,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Cancelled { .. })
    }
}
