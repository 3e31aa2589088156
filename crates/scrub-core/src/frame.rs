//! Pixel buffers for decoded video frames in CPU memory.
//!
//! A [`PixelBuffer`] is an immutable, row-strided grid of 8-bit samples.
//! The first three channels of every pixel are colour; a fourth channel,
//! when the layout has one, is carried along but never compared.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, ScrubError};

/// Channel layout of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGB (24 bits per pixel)
    Rgb8,
    /// 8-bit BGR (24 bits per pixel, GDI / DirectShow order)
    Bgr8,
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 8-bit BGRA (32 bits per pixel)
    Bgra8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }

    /// Whether the layout carries a fourth (alpha) channel.
    pub fn has_alpha(self) -> bool {
        self.bytes_per_pixel() == 4
    }

    /// Number of leading channels that hold colour.
    pub const COLOR_CHANNELS: usize = 3;
}

/// Geometry and layout of a buffer; two buffers are comparable only when
/// their shapes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferShape {
    pub width: u32,
    pub height: u32,
    /// Bytes per row (may include padding)
    pub stride: usize,
    pub format: PixelFormat,
}

impl fmt::Display for BufferShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {:?} (stride {})",
            self.width, self.height, self.format, self.stride
        )
    }
}

/// A decoded frame: read-only samples plus row stride.
///
/// Sample storage is shared; cloning is cheap and the memory is released
/// when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Arc<[u8]>,
}

impl PixelBuffer {
    /// Wrap `data` as a `width`x`height` buffer with the given row stride.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        Self::from_shared(width, height, stride, format, data.into())
    }

    /// Like [`PixelBuffer::new`] but adopts storage that may already be shared.
    pub fn from_shared(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Arc<[u8]>,
    ) -> Result<Self> {
        let row_bytes = (width as usize)
            .checked_mul(format.bytes_per_pixel())
            .ok_or_else(|| ScrubError::InvalidBuffer(format!("width {} overflows", width)))?;
        if stride < row_bytes {
            return Err(ScrubError::InvalidBuffer(format!(
                "stride {} is narrower than a {}-byte row",
                stride, row_bytes
            )));
        }
        let required = stride
            .checked_mul(height as usize)
            .ok_or_else(|| ScrubError::InvalidBuffer(format!("height {} overflows", height)))?;
        if data.len() < required {
            return Err(ScrubError::InvalidBuffer(format!(
                "{} bytes supplied, {} required for {}x{} at stride {}",
                data.len(),
                required,
                width,
                height,
                stride
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Build a tightly packed buffer by evaluating `pixel(x, y)` for every
    /// position. Only the first `bytes_per_pixel` channels of each returned
    /// value are stored.
    pub fn from_fn(
        width: u32,
        height: u32,
        format: PixelFormat,
        mut pixel: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Self {
        let bpp = format.bytes_per_pixel();
        let stride = width as usize * bpp;
        let mut data = Vec::with_capacity(stride * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&pixel(x, y)[..bpp]);
            }
        }
        Self {
            width,
            height,
            stride,
            format,
            data: data.into(),
        }
    }

    /// A buffer with every pixel set to `color` (in the format's channel order).
    pub fn filled(width: u32, height: u32, format: PixelFormat, color: [u8; 4]) -> Self {
        Self::from_fn(width, height, format, |_, _| color)
    }

    /// A fully transparent RGBA8 buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::filled(width, height, PixelFormat::Rgba8, [0, 0, 0, 0])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn shape(&self) -> BufferShape {
        BufferShape {
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }

    /// Raw sample storage, including row padding.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read a single sample by byte offset.
    #[inline]
    pub fn sample(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Pixel bytes of row `y`, without padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.format.bytes_per_pixel();
        &self.data[start..end]
    }

    /// All channels of the pixel at (`x`, `y`).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let start = x as usize * bpp;
        &self.row(y)[start..start + bpp]
    }

    /// The colour channels of the pixel at (`x`, `y`), in storage order.
    #[inline]
    pub fn color(&self, x: u32, y: u32) -> [u8; 3] {
        let p = self.pixel(x, y);
        [p[0], p[1], p[2]]
    }

    /// Total memory usage of this buffer in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }
}
