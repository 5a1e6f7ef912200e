//! Error types for quantization and diffusion.

use std::fmt;

/// Error type for quantizer and disperser validation.
///
/// All variants are detected up front, before any pixel is processed.
/// Invalid parameters are never silently clamped or reordered.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantError {
    /// Width or height is zero
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Pixel buffer length does not match width * height
    BufferSizeMismatch {
        /// Expected number of samples
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },
    /// Grayscale thresholds are not monotonically non-decreasing
    NonMonotonicThresholds {
        /// The offending threshold triple
        thresholds: [u8; 3],
    },
    /// Diffusion strength outside 0.0..=1.0
    StrengthOutOfRange(f32),
    /// A level value exceeds the declared level count
    LevelOutOfRange {
        /// The offending level value
        level: u8,
        /// Declared number of levels
        level_count: u8,
    },
}

impl fmt::Display for QuantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantError::ZeroDimension { width, height } => {
                write!(f, "image dimensions must be positive (got {}x{})", width, height)
            }
            QuantError::BufferSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer length {} does not match expected {}",
                    actual, expected
                )
            }
            QuantError::NonMonotonicThresholds { thresholds } => {
                write!(
                    f,
                    "thresholds must be non-decreasing (got {}, {}, {})",
                    thresholds[0], thresholds[1], thresholds[2]
                )
            }
            QuantError::StrengthOutOfRange(s) => {
                write!(f, "dither strength {} outside 0.0..=1.0", s)
            }
            QuantError::LevelOutOfRange { level, level_count } => {
                write!(f, "level {} out of range for {} levels", level, level_count)
            }
        }
    }
}

impl std::error::Error for QuantError {}
