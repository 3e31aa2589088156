//! Contracts the player consumes: decoded frames and a playback transport.

use tracing::trace;

use crate::frame::PixelBuffer;
use crate::time::{FrameIndex, MediaTime};

/// Random-access supplier of decoded frames.
///
/// The source owns decoding; every buffer it hands out belongs to the
/// caller, which must drop it once done.
pub trait FrameSource {
    /// Number of frames the source can address.
    fn frame_count(&self) -> FrameIndex;

    /// Decode frame `index`. `None` is a decode miss, not an error.
    fn get_frame(&mut self, index: FrameIndex) -> Option<PixelBuffer>;
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    fn frame_count(&self) -> FrameIndex {
        (**self).frame_count()
    }

    fn get_frame(&mut self, index: FrameIndex) -> Option<PixelBuffer> {
        (**self).get_frame(index)
    }
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn frame_count(&self) -> FrameIndex {
        (**self).frame_count()
    }

    fn get_frame(&mut self, index: FrameIndex) -> Option<PixelBuffer> {
        (**self).get_frame(index)
    }
}

/// The media transport the player drives.
pub trait Playback {
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Current media position.
    fn position(&self) -> MediaTime;
    fn seek(&mut self, time: MediaTime);
}

/// Frames held in memory, with optional gaps that behave as decode misses.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    frames: Vec<Option<PixelBuffer>>,
    fetches: usize,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = PixelBuffer>) -> Self {
        Self::with_gaps(frames.into_iter().map(Some))
    }

    /// `None` entries count towards the frame count but fail to decode.
    pub fn with_gaps(frames: impl IntoIterator<Item = Option<PixelBuffer>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            fetches: 0,
        }
    }

    pub fn push(&mut self, frame: PixelBuffer) {
        self.frames.push(Some(frame));
    }

    /// Turn frame `index` into a decode miss.
    pub fn drop_frame(&mut self, index: FrameIndex) {
        if let Some(slot) = self.frames.get_mut(index as usize) {
            *slot = None;
        }
    }

    /// How many times [`FrameSource::get_frame`] has been called.
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl FrameSource for MemorySource {
    fn frame_count(&self) -> FrameIndex {
        self.frames.len().min(FrameIndex::MAX as usize) as FrameIndex
    }

    fn get_frame(&mut self, index: FrameIndex) -> Option<PixelBuffer> {
        self.fetches += 1;
        let frame = self.frames.get(index as usize).cloned().flatten();
        if frame.is_none() {
            trace!(index, "memory source miss");
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    #[test]
    fn test_memory_source_gaps() {
        let px = PixelBuffer::filled(2, 2, PixelFormat::Rgb8, [1, 2, 3, 0]);
        let mut source = MemorySource::with_gaps(vec![Some(px.clone()), None, Some(px)]);

        assert_eq!(source.frame_count(), 3);
        assert!(source.get_frame(0).is_some());
        assert!(source.get_frame(1).is_none());
        assert!(source.get_frame(7).is_none());
        assert_eq!(source.fetches(), 3);
    }

    #[test]
    fn test_drop_frame() {
        let px = PixelBuffer::filled(1, 1, PixelFormat::Rgb8, [0; 4]);
        let mut source = MemorySource::new(vec![px.clone(), px]);
        source.drop_frame(1);
        assert!(source.get_frame(1).is_none());
        assert_eq!(source.frame_count(), 2);
    }
}
