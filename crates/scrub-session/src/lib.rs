//! FrameScrub Session - the player state owned by one open video
//!
//! A [`Player`] ties a frame source and a playback transport to the
//! difference search and the bookmark registry, and is driven by the
//! presentation layer's commands (seek, skip, find difference, bookmark).

pub mod config;
pub mod playback;
pub mod player;

pub use config::{PlayerConfig, CONFIG_VERSION};
pub use playback::ManualPlayback;
pub use player::{Player, SkipSpeed};
