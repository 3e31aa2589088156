//! FrameScrub Core - Foundation types for frame-accurate scrubbing
//!
//! This crate provides the fundamental types used throughout FrameScrub:
//! - Time representation (MediaTime, FrameRate, FrameClock, Timecode)
//! - Pixel buffers and channel layouts
//! - The frame source and playback contracts the player consumes

pub mod error;
pub mod frame;
pub mod source;
pub mod time;

pub use error::{Result, ScrubError};
pub use frame::{BufferShape, PixelBuffer, PixelFormat};
pub use source::{FrameSource, MemorySource, Playback};
pub use time::{FrameClock, FrameIndex, FrameRate, MediaTime, Timecode};
