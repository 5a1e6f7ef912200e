//! Ordered-threshold quantization.
//!
//! Maps 8-bit samples to 2 or 4 discrete levels using validated threshold
//! sets. Threshold validation happens once, at construction, never per
//! pixel.

use crate::error::QuantError;
use crate::image::{GrayImage, LevelImage};

/// Threshold set selecting the quantization depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thresholds {
    /// Single threshold for 2-level (monochrome) output.
    ///
    /// Samples at or below the threshold map to level 0, the rest to 1.
    Mono(u8),

    /// Three ordered thresholds for 4-level (grayscale) output.
    ///
    /// `[t1, t2, t3]` partition the sample range into bands:
    /// `0..=t1` -> 0, `t1+1..=t2` -> 1, `t2+1..=t3` -> 2 (when `t3 < 255`),
    /// above `t3` -> 3. With `t3 == 255` the top boundary collapses band 2
    /// and everything above `t2` maps to 3.
    Gray([u8; 3]),
}

impl Thresholds {
    /// Validate threshold ordering.
    ///
    /// Grayscale thresholds must be monotonically non-decreasing; they are
    /// rejected, never reordered. A single monochrome threshold is always
    /// valid.
    pub fn validate(&self) -> Result<(), QuantError> {
        match *self {
            Thresholds::Mono(_) => Ok(()),
            Thresholds::Gray(t) => {
                if t[0] <= t[1] && t[1] <= t[2] {
                    Ok(())
                } else {
                    Err(QuantError::NonMonotonicThresholds { thresholds: t })
                }
            }
        }
    }

    /// Number of output levels (2 or 4).
    #[inline]
    pub fn level_count(&self) -> u8 {
        match self {
            Thresholds::Mono(_) => 2,
            Thresholds::Gray(_) => 4,
        }
    }
}

/// A validated quantizer: threshold set plus sample inversion flag.
///
/// The `invert` flag flips each sample (`255 - s`) before banding, so the
/// black/white sense of the output can be reversed without touching the
/// thresholds themselves.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    thresholds: Thresholds,
    invert: bool,
}

impl Quantizer {
    /// Create a quantizer, validating the thresholds once.
    pub fn new(thresholds: Thresholds, invert: bool) -> Result<Self, QuantError> {
        thresholds.validate()?;
        Ok(Self { thresholds, invert })
    }

    /// Number of output levels (2 or 4).
    #[inline]
    pub fn level_count(&self) -> u8 {
        self.thresholds.level_count()
    }

    /// Whether samples are inverted before banding.
    #[inline]
    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Quantize one 8-bit sample, applying inversion then banding.
    #[inline]
    pub fn level(&self, sample: u8) -> u8 {
        let s = if self.invert { 255 - sample } else { sample };
        self.band(s as f32)
    }

    /// Band an already-inverted working value.
    ///
    /// Takes `f32` so the disperser can band samples carrying accumulated
    /// diffusion error (which may leave 0..=255).
    #[inline]
    pub(crate) fn band(&self, value: f32) -> u8 {
        match self.thresholds {
            Thresholds::Mono(t) => {
                if value <= t as f32 {
                    0
                } else {
                    1
                }
            }
            Thresholds::Gray([t1, t2, t3]) => {
                if value <= t1 as f32 {
                    0
                } else if value <= t2 as f32 {
                    1
                } else if t3 < 255 && value <= t3 as f32 {
                    2
                } else {
                    // Above t3, or t3 sits on the 255 top boundary in which
                    // case the whole band above t2 maps to the darkest level.
                    3
                }
            }
        }
    }

    /// Nominal sample value a level reconstructs to.
    ///
    /// The disperser measures quantization error against these: 0/255 for
    /// monochrome, 0/85/170/255 for grayscale.
    #[inline]
    pub(crate) fn reconstruction(&self, level: u8) -> f32 {
        match self.thresholds {
            Thresholds::Mono(_) => level as f32 * 255.0,
            Thresholds::Gray(_) => level as f32 * 85.0,
        }
    }

    /// Quantize a whole image without diffusion (pure posterization).
    pub fn quantize(&self, image: &GrayImage) -> LevelImage {
        let data: Vec<u8> = image.pixels().iter().map(|&s| self.level(s)).collect();
        // Construction cannot fail: dimensions come from a valid GrayImage
        // and band() output is always below level_count.
        LevelImage::new(image.width(), image.height(), self.level_count(), data)
            .expect("quantizer output is always a valid level image")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_decreasing_thresholds() {
        let err = Thresholds::Gray([170, 85, 255]).validate().unwrap_err();
        assert_eq!(
            err,
            QuantError::NonMonotonicThresholds {
                thresholds: [170, 85, 255]
            }
        );
        assert!(Quantizer::new(Thresholds::Gray([170, 85, 255]), false).is_err());
    }

    #[test]
    fn test_validate_accepts_equal_thresholds() {
        assert!(Thresholds::Gray([128, 128, 128]).validate().is_ok());
    }

    #[test]
    fn test_mono_banding() {
        let q = Quantizer::new(Thresholds::Mono(128), false).unwrap();
        assert_eq!(q.level(0), 0);
        assert_eq!(q.level(128), 0);
        assert_eq!(q.level(129), 1);
        assert_eq!(q.level(255), 1);
    }

    #[test]
    fn test_mono_invert() {
        let q = Quantizer::new(Thresholds::Mono(128), true).unwrap();
        assert_eq!(q.level(0), 1);
        assert_eq!(q.level(255), 0);
    }

    #[test]
    fn test_gray_bands_with_interior_top_threshold() {
        let q = Quantizer::new(Thresholds::Gray([64, 128, 192]), false).unwrap();
        assert_eq!(q.level(0), 0);
        assert_eq!(q.level(64), 0);
        assert_eq!(q.level(65), 1);
        assert_eq!(q.level(128), 1);
        assert_eq!(q.level(129), 2);
        assert_eq!(q.level(192), 2);
        assert_eq!(q.level(193), 3);
        assert_eq!(q.level(255), 3);
    }

    #[test]
    fn test_gray_top_boundary_collapses_band_two() {
        // With t3 on the 255 boundary, everything above t2 is level 3.
        let q = Quantizer::new(Thresholds::Gray([85, 170, 255]), false).unwrap();
        assert_eq!(q.level(85), 0);
        assert_eq!(q.level(170), 1);
        assert_eq!(q.level(171), 3);
        assert_eq!(q.level(200), 3);
        assert_eq!(q.level(255), 3);
    }

    #[test]
    fn test_flat_200_quantizes_to_level_3() {
        // Default thresholds, no invert: a flat 200 buffer lands entirely in
        // the top band (200 > 170 and t3 = 255).
        let q = Quantizer::new(Thresholds::Gray([85, 170, 255]), false).unwrap();
        let image = GrayImage::new(4, 4, vec![200; 16]).unwrap();
        let levels = q.quantize(&image);
        assert!(levels.data().iter().all(|&v| v == 3));
    }

    #[test]
    fn test_reconstruction_values() {
        let gray = Quantizer::new(Thresholds::Gray([85, 170, 255]), false).unwrap();
        assert_eq!(gray.reconstruction(0), 0.0);
        assert_eq!(gray.reconstruction(1), 85.0);
        assert_eq!(gray.reconstruction(2), 170.0);
        assert_eq!(gray.reconstruction(3), 255.0);

        let mono = Quantizer::new(Thresholds::Mono(128), false).unwrap();
        assert_eq!(mono.reconstruction(0), 0.0);
        assert_eq!(mono.reconstruction(1), 255.0);
    }

    #[test]
    fn test_quantize_image_levels_count() {
        let q = Quantizer::new(Thresholds::Gray([64, 128, 192]), false).unwrap();
        let image = GrayImage::new(2, 2, vec![10, 100, 150, 220]).unwrap();
        let levels = q.quantize(&image);
        assert_eq!(levels.level_count(), 4);
        assert_eq!(levels.data(), &[0, 1, 2, 3]);
    }
}
