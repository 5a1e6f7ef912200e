//! Floyd-Steinberg error diffusion.
//!
//! Distributes quantization error to not-yet-visited neighbors so that flat
//! regions between threshold bands break into noise instead of banding.
//! Pixels are visited in row-major order; the accumulated error lives in an
//! `f32` sliding window so repeated clamping never distorts it.

use crate::error::QuantError;
use crate::image::{GrayImage, LevelImage};
use crate::quantizer::Quantizer;

/// An error diffusion kernel: `(dx, dy, weight)` entries over a divisor.
///
/// `dy` is always non-negative (errors only flow to unvisited pixels);
/// `max_dy` sizes the error buffer window.
#[derive(Debug, Clone, Copy)]
struct Kernel {
    entries: &'static [(i32, i32, u8)],
    divisor: u8,
    max_dy: usize,
}

/// The classic Floyd-Steinberg kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

/// Sliding window of accumulated diffusion error.
///
/// Stores only the rows the kernel can reach (`max_dy + 1`), rotating as
/// the scan advances. Out-of-bounds writes are silently dropped, which is
/// exactly the "partial coefficient set" behavior edge pixels need.
#[derive(Debug)]
struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, and so on.
    rows: Vec<Vec<f32>>,
    width: usize,
}

impl ErrorBuffer {
    fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![0.0; width]).collect(),
            width,
        }
    }

    /// Accumulated error for a pixel in the current row.
    #[inline]
    fn get_accumulated(&self, x: usize) -> f32 {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Ignores out-of-bounds targets.
    #[inline]
    fn add_error(&mut self, x: usize, row_offset: usize, error: f32) {
        if x < self.width && row_offset < self.rows.len() {
            self.rows[row_offset][x] += error;
        }
    }

    /// Rotate the window: drop the current row, zero a fresh last row.
    fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill(0.0);
        }
    }
}

/// Quantize an image with Floyd-Steinberg error diffusion.
///
/// `strength` scales the diffused error: `0.0` degenerates to pure
/// posterization (identical to [`Quantizer::quantize`]), `1.0` is full
/// diffusion. Values outside `0.0..=1.0` are rejected before any pixel is
/// touched.
///
/// The quantizer's `invert` flag is applied to the input samples before
/// diffusion starts, so error is measured and propagated in the same
/// (possibly flipped) space the bands operate in.
pub fn diffuse(
    image: &GrayImage,
    quantizer: &Quantizer,
    strength: f32,
) -> Result<LevelImage, QuantError> {
    if !(0.0..=1.0).contains(&strength) {
        return Err(QuantError::StrengthOutOfRange(strength));
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let kernel = &FLOYD_STEINBERG;
    let divisor = kernel.divisor as f32;

    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let sample = image.pixels()[idx];
            let sample = if quantizer.invert() { 255 - sample } else { sample };

            let value = sample as f32 + error_buf.get_accumulated(x);
            let level = quantizer.band(value);
            output[idx] = level;

            let error = (value - quantizer.reconstruction(level)) * strength;
            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                if nx >= 0 && (nx as usize) < width {
                    let ny = y + dy as usize;
                    if ny < height {
                        error_buf.add_error(nx as usize, dy as usize, error * weight as f32 / divisor);
                    }
                }
            }
        }
        error_buf.advance_row();
    }

    LevelImage::new(
        image.width(),
        image.height(),
        quantizer.level_count(),
        output,
    )
}
