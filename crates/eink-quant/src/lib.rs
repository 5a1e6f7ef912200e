//! eink-quant: threshold quantization and error diffusion for e-paper frames
//!
//! This library turns 8-bit grayscale page images into the small discrete
//! level sets (2 or 4 levels) that e-paper frame formats pack, optionally
//! running Floyd-Steinberg error diffusion first to trade banding for noise.
//!
//! # Quick Start
//!
//! ```
//! use eink_quant::{diffuse, GrayImage, Quantizer, Thresholds};
//!
//! let image = GrayImage::new(2, 2, vec![0, 255, 255, 0]).unwrap();
//! let quantizer = Quantizer::new(Thresholds::Mono(128), false).unwrap();
//!
//! // Full-strength Floyd-Steinberg diffusion before quantization
//! let levels = diffuse(&image, &quantizer, 1.0).unwrap();
//! assert_eq!(levels.data(), &[0, 1, 1, 0]);
//! ```
//!
//! # Pipeline Position
//!
//! ```text
//! 8-bit grayscale page        (from renderer / image decoder)
//!     |
//!     v
//! [invert]                    (optional, flips sample sense)
//!     |
//!     v
//! error diffusion             (sequential within a page, strength 0..=1)
//!     |
//!     v
//! threshold banding           (ordered thresholds, validated once)
//!     |
//!     v
//! LevelImage                  (2 or 4 levels, handed to the frame codec)
//! ```
//!
//! # Determinism
//!
//! Both the quantizer and the disperser are pure functions of their inputs.
//! Error diffusion is inherently sequential within one image (each pixel's
//! decision depends on error diffused from earlier pixels), so callers
//! parallelize across images, never within one.

pub mod diffusion;
pub mod error;
pub mod image;
pub mod quantizer;

pub use diffusion::diffuse;
pub use error::QuantError;
pub use image::{GrayImage, LevelImage};
pub use quantizer::{Quantizer, Thresholds};
