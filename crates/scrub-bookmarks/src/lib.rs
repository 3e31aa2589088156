//! FrameScrub Bookmarks - named markers at frame indices
//!
//! Bookmarks are kept in a registry sorted by frame, one bookmark per
//! frame. Each entry knows the frame distance to its predecessor, and at
//! most one entry can be renamed at a time.

pub mod registry;

pub use registry::{Bookmark, BookmarkRegistry, BookmarkRow, EditState, EditTrigger};
