//! Grayscale and quantized image buffers.
//!
//! [`GrayImage`] is the 8-bit input side of the pipeline, [`LevelImage`] the
//! quantized output side. Both are row-major and validated at construction
//! so downstream stages can index without re-checking shapes.

use crate::error::QuantError;

/// An 8-bit grayscale image, row-major.
///
/// This is the pipeline's input buffer: produced by a renderer or image
/// decoder, consumed (immutably) by the disperser and quantizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayImage {
    /// Create a grayscale image from row-major samples.
    ///
    /// Fails if either dimension is zero or the buffer length does not
    /// equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, QuantError> {
        if width == 0 || height == 0 {
            return Err(QuantError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(QuantError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major samples, one byte per pixel.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Sample at (x, y). Panics on out-of-bounds coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// A quantized image: one small level index per pixel, row-major.
///
/// `level_count` is 2 for monochrome output and 4 for grayscale output;
/// every stored value is in `0..level_count`. The frame codec checks this
/// count against its target format before packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelImage {
    width: u32,
    height: u32,
    level_count: u8,
    data: Vec<u8>,
}

impl LevelImage {
    /// Create a level image from row-major level indices.
    ///
    /// Fails on zero dimensions, a buffer length mismatch, or any value
    /// at or above `level_count`.
    pub fn new(
        width: u32,
        height: u32,
        level_count: u8,
        data: Vec<u8>,
    ) -> Result<Self, QuantError> {
        if width == 0 || height == 0 {
            return Err(QuantError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(QuantError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        if let Some(&level) = data.iter().find(|&&v| v >= level_count) {
            return Err(QuantError::LevelOutOfRange { level, level_count });
        }
        Ok(Self {
            width,
            height,
            level_count,
            data,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of quantization levels (2 or 4).
    #[inline]
    pub fn level_count(&self) -> u8 {
        self.level_count
    }

    /// Row-major level indices.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Level at (x, y). Panics on out-of-bounds coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize]
    }
}
