//! Pixel-level comparison of two decoded frames.
//!
//! Only the three colour channels of each pixel take part; the alpha
//! channel of 4-byte layouts is ignored. Rows are walked through the
//! buffer stride, so row padding never influences the result.

use scrub_core::{PixelBuffer, PixelFormat, Result, ScrubError};

/// Marker painted into highlight images: opaque red.
pub const HIGHLIGHT_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Outcome of [`DiffEngine::compare`].
#[derive(Debug, Clone)]
pub struct DiffResult {
    pub differs: bool,
    /// RGBA8 image with the compared dimensions; present only when
    /// `differs` is true.
    pub highlight: Option<PixelBuffer>,
}

/// Comparator and highlight painter for equally-shaped buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEngine {
    marker: [u8; 4],
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self {
            marker: HIGHLIGHT_COLOR,
        }
    }
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint differing pixels in `rgb` instead of red. The marker is
    /// always fully opaque.
    pub fn with_marker(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        Self {
            marker: [r, g, b, 255],
        }
    }

    pub fn marker(&self) -> [u8; 4] {
        self.marker
    }

    /// Fails with [`ScrubError::ShapeMismatch`] unless both buffers share
    /// width, height, stride and channel layout.
    pub fn check_shape(a: &PixelBuffer, b: &PixelBuffer) -> Result<()> {
        let (left, right) = (a.shape(), b.shape());
        if left != right {
            return Err(ScrubError::ShapeMismatch { left, right });
        }
        Ok(())
    }

    /// Whether any pixel differs in a colour channel.
    ///
    /// Scans in row-major order and stops at the first mismatch.
    pub fn differs(&self, a: &PixelBuffer, b: &PixelBuffer) -> Result<bool> {
        Self::check_shape(a, b)?;
        let bpp = a.format().bytes_per_pixel();
        for y in 0..a.height() {
            let changed = a
                .row(y)
                .chunks_exact(bpp)
                .zip(b.row(y).chunks_exact(bpp))
                .any(|(pa, pb)| color_differs(pa, pb));
            if changed {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Paint the marker at every pixel whose colour differs between `a`
    /// and `b`; every other pixel is fully transparent.
    ///
    /// Always classifies every pixel.
    pub fn highlight(&self, a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer> {
        Self::check_shape(a, b)?;
        let bpp = a.format().bytes_per_pixel();
        let out_stride = a.width() as usize * PixelFormat::Rgba8.bytes_per_pixel();
        let mut out = vec![0u8; out_stride * a.height() as usize];

        for (y, out_row) in (0..a.height()).zip(out.chunks_exact_mut(out_stride.max(1))) {
            let pixels = a.row(y).chunks_exact(bpp).zip(b.row(y).chunks_exact(bpp));
            for ((pa, pb), dst) in pixels.zip(out_row.chunks_exact_mut(4)) {
                if color_differs(pa, pb) {
                    dst.copy_from_slice(&self.marker);
                }
            }
        }

        PixelBuffer::new(a.width(), a.height(), out_stride, PixelFormat::Rgba8, out)
    }

    /// [`DiffEngine::differs`], followed by [`DiffEngine::highlight`] when
    /// something changed.
    pub fn compare(&self, a: &PixelBuffer, b: &PixelBuffer) -> Result<DiffResult> {
        if !self.differs(a, b)? {
            return Ok(DiffResult {
                differs: false,
                highlight: None,
            });
        }
        Ok(DiffResult {
            differs: true,
            highlight: Some(self.highlight(a, b)?),
        })
    }
}

#[inline]
fn color_differs(a: &[u8], b: &[u8]) -> bool {
    a[..PixelFormat::COLOR_CHANNELS] != b[..PixelFormat::COLOR_CHANNELS]
}
