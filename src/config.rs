//! Conversion configuration loaded from config.yaml
//!
//! Every field has a default, so an empty (or absent) config file produces
//! a working 480x800 grayscale setup. Validation runs once, before any
//! page is processed; bad thresholds or strengths are rejected, never
//! clamped.

use std::path::Path;

use serde::Deserialize;

use eink_quant::{Quantizer, Thresholds};

use crate::error::ConvertError;
use crate::formats::container::ReadingDirection;
use crate::formats::FrameFormat;

/// Top-level conversion configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Output geometry, format and container metadata
    #[serde(default)]
    pub output: OutputConfig,

    /// 4-level grayscale quantization settings
    #[serde(default)]
    pub gray: GrayConfig,

    /// Monochrome quantization settings
    #[serde(default)]
    pub mono: MonoConfig,

    /// Structure extraction / chapter settings
    #[serde(default)]
    pub toc: TocConfig,
}

/// Output geometry, frame format, and container metadata strings.
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: u16,

    #[serde(default = "default_height")]
    pub height: u16,

    /// Frame format pages are encoded to (`gray` or `mono`)
    #[serde(default)]
    pub format: FrameFormat,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub publisher: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Page turn direction (`ltr`, `rtl`, or `ttb`)
    #[serde(default)]
    pub direction: ReadingDirection,
}

fn default_width() -> u16 {
    480
}

fn default_height() -> u16 {
    800
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: FrameFormat::default(),
            title: String::new(),
            author: String::new(),
            publisher: String::new(),
            language: default_language(),
            direction: ReadingDirection::default(),
        }
    }
}

/// Quantization settings for 4-level grayscale output.
#[derive(Debug, Deserialize, Clone)]
pub struct GrayConfig {
    /// Three ordered band thresholds
    #[serde(default = "default_gray_thresholds")]
    pub thresholds: [u8; 3],

    #[serde(default)]
    pub invert: bool,

    #[serde(default = "default_true")]
    pub dither: bool,

    /// Error diffusion strength, 0.0..=1.0
    #[serde(default = "default_strength")]
    pub dither_strength: f32,
}

fn default_gray_thresholds() -> [u8; 3] {
    [85, 170, 255]
}

impl Default for GrayConfig {
    fn default() -> Self {
        Self {
            thresholds: default_gray_thresholds(),
            invert: false,
            dither: true,
            dither_strength: default_strength(),
        }
    }
}

/// Quantization settings for monochrome output.
#[derive(Debug, Deserialize, Clone)]
pub struct MonoConfig {
    /// Binarization threshold
    #[serde(default = "default_mono_threshold")]
    pub threshold: u8,

    #[serde(default)]
    pub invert: bool,

    #[serde(default = "default_true")]
    pub dither: bool,

    /// Error diffusion strength, 0.0..=1.0
    #[serde(default = "default_strength")]
    pub dither_strength: f32,
}

fn default_mono_threshold() -> u8 {
    128
}

impl Default for MonoConfig {
    fn default() -> Self {
        Self {
            threshold: default_mono_threshold(),
            invert: false,
            dither: true,
            dither_strength: default_strength(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_strength() -> f32 {
    0.8
}

/// Structure extraction and chapter derivation settings.
#[derive(Debug, Deserialize, Clone)]
pub struct TocConfig {
    /// Whether to derive chapters from source structure
    #[serde(default = "default_true")]
    pub extract: bool,

    /// Heading level that opens a chapter (1 = top)
    #[serde(default = "default_chapter_level")]
    pub chapter_level: u32,
}

fn default_chapter_level() -> u32 {
    1
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            extract: true,
            chapter_level: default_chapter_level(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, or defaults when no path is
    /// given. Parse failures are errors, not silent fallbacks: a user who
    /// passed `-c` wants that file honored.
    pub fn load(path: Option<&Path>) -> Result<Self, ConvertError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Validate every value the pipeline will consume.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.output.width == 0 || self.output.height == 0 {
            return Err(ConvertError::InvalidDimensions {
                width: self.output.width as u32,
                height: self.output.height as u32,
            });
        }
        Thresholds::Gray(self.gray.thresholds).validate()?;
        for strength in [self.gray.dither_strength, self.mono.dither_strength] {
            if !(0.0..=1.0).contains(&strength) {
                return Err(eink_quant::QuantError::StrengthOutOfRange(strength).into());
            }
        }
        Ok(())
    }

    /// Build the quantizer for a frame format from the matching section.
    pub fn quantizer(&self, format: FrameFormat) -> Result<Quantizer, ConvertError> {
        let quantizer = match format {
            FrameFormat::Mono => {
                Quantizer::new(Thresholds::Mono(self.mono.threshold), self.mono.invert)?
            }
            FrameFormat::Gray => {
                Quantizer::new(Thresholds::Gray(self.gray.thresholds), self.gray.invert)?
            }
        };
        Ok(quantizer)
    }

    /// Dither settings (enabled, strength) for a frame format.
    pub fn dithering(&self, format: FrameFormat) -> (bool, f32) {
        match format {
            FrameFormat::Mono => (self.mono.dither, self.mono.dither_strength),
            FrameFormat::Gray => (self.gray.dither, self.gray.dither_strength),
        }
    }
}
