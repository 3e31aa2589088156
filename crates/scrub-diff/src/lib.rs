//! FrameScrub Diff - locating frames whose image content changed
//!
//! - [`DiffEngine`]: compares two equally-shaped pixel buffers and paints
//!   a highlight image of the pixels that differ
//! - [`DiffSearch`]: walks a frame source forwards or backwards from an
//!   anchor frame until the picture changes

pub mod engine;
pub mod search;

pub use engine::{DiffEngine, DiffResult, HIGHLIGHT_COLOR};
pub use search::{DiffSearch, Direction, ScanCancel, ScanStop, SearchHit};
