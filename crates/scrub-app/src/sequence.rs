//! Frame source backed by a directory of still images.

use std::path::{Path, PathBuf};

use scrub_core::{FrameIndex, FrameSource, PixelBuffer, PixelFormat, Result, ScrubError};
use tracing::{info, warn};

const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// One image per frame, ordered by file name.
pub struct ImageSequenceSource {
    frames: Vec<PathBuf>,
}

impl ImageSequenceSource {
    /// Collect the image files in `dir`, sorted by name.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if is_image && path.is_file() {
                frames.push(path);
            }
        }
        frames.sort();
        info!(dir = %dir.display(), frames = frames.len(), "Opened image sequence");
        Ok(Self { frames })
    }

    pub fn path(&self, index: FrameIndex) -> Option<&Path> {
        self.frames.get(index as usize).map(PathBuf::as_path)
    }
}

/// Decode one file into a tightly packed RGBA8 buffer.
pub fn decode(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)
        .map_err(|e| ScrubError::Decoder(format!("{}: {}", path.display(), e)))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    PixelBuffer::new(
        width,
        height,
        width as usize * PixelFormat::Rgba8.bytes_per_pixel(),
        PixelFormat::Rgba8,
        image.into_raw(),
    )
}

impl FrameSource for ImageSequenceSource {
    fn frame_count(&self) -> FrameIndex {
        FrameIndex::try_from(self.frames.len()).unwrap_or(FrameIndex::MAX)
    }

    fn get_frame(&mut self, index: FrameIndex) -> Option<PixelBuffer> {
        let path = self.path(index)?;
        match decode(path) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                warn!(frame = index, "Failed to decode frame: {}", e);
                None
            }
        }
    }
}

/// Write an RGBA8 highlight to `path`; the format follows the extension.
pub fn save_highlight(buffer: &PixelBuffer, path: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(
        buffer.format() == PixelFormat::Rgba8,
        "highlight must be RGBA8, got {:?}",
        buffer.format()
    );
    let mut packed = Vec::with_capacity(buffer.width() as usize * buffer.height() as usize * 4);
    for y in 0..buffer.height() {
        packed.extend_from_slice(buffer.row(y));
    }
    let image = image::RgbaImage::from_raw(buffer.width(), buffer.height(), packed)
        .ok_or_else(|| anyhow::anyhow!("highlight buffer too small"))?;
    image.save(path)?;
    Ok(())
}
