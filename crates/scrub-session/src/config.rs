//! Player preferences and their JSON file.
//!
//! Current files look like
//!
//! ```json
//! { "version": 1, "written_by": "0.1.0", "config": { "auto_play": true } }
//! ```
//!
//! A file without a `version` key is the older unversioned layout: the
//! settings object sits at the top level. Settings missing from either
//! layout take their defaults.

use std::path::Path;

use scrub_core::{Result, ScrubError};
use scrub_diff::HIGHLIGHT_COLOR;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Newest file layout this build reads and the one it writes.
pub const CONFIG_VERSION: u32 = 1;

/// User-facing toggles and step sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Frames moved by a medium skip.
    pub medium_increment: u32,
    /// Frames moved by a large skip.
    pub large_increment: u32,
    /// Whether the difference highlight is shown.
    pub show_difference: bool,
    /// Whether bookmark rows show the distance to the previous bookmark.
    pub show_bookmark_times: bool,
    /// Start playing as soon as a video opens.
    pub auto_play: bool,
    /// RGB colour of the difference highlight; always drawn opaque.
    pub highlight_color: [u8; 3],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let [r, g, b, _] = HIGHLIGHT_COLOR;
        Self {
            medium_increment: 10,
            large_increment: 30,
            show_difference: true,
            show_bookmark_times: true,
            auto_play: false,
            highlight_color: [r, g, b],
        }
    }
}

#[derive(Serialize)]
struct Stored<'a> {
    version: u32,
    written_by: &'a str,
    config: &'a PlayerConfig,
}

impl PlayerConfig {
    /// Parse a config file in either layout.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let mut raw: Value = serde_json::from_slice(data)
            .map_err(|e| ScrubError::Serialization(format!("config is not JSON: {}", e)))?;

        let settings = match layout_version(&raw)? {
            None => raw,
            Some(version) => {
                debug!(version, "Reading versioned config");
                match raw.get_mut("config") {
                    Some(settings) => settings.take(),
                    None => Value::Object(Default::default()),
                }
            }
        };

        serde_json::from_value(settings)
            .map_err(|e| ScrubError::Serialization(format!("bad config settings: {}", e)))
    }

    /// Pretty JSON in the current layout.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let stored = Stored {
            version: CONFIG_VERSION,
            written_by: env!("CARGO_PKG_VERSION"),
            config: self,
        };
        serde_json::to_vec_pretty(&stored)
            .map_err(|e| ScrubError::Serialization(format!("cannot encode config: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read(path)?)
    }

    /// [`PlayerConfig::load`], or the defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// `None` for the unversioned layout. Versions this build cannot read,
/// including ones too large for `u32`, are errors.
fn layout_version(raw: &Value) -> Result<Option<u32>> {
    let Some(version) = raw.get("version") else {
        return Ok(None);
    };
    let number = version.as_u64().ok_or_else(|| {
        ScrubError::Serialization(format!("config version {} is not a whole number", version))
    })?;
    match u32::try_from(number) {
        Ok(version) if version <= CONFIG_VERSION => Ok(Some(version)),
        _ => Err(ScrubError::Serialization(format!(
            "config version {} is newer than this build reads ({})",
            number, CONFIG_VERSION
        ))),
    }
}
