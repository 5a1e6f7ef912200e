//! Common test infrastructure for inkpack integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use eink_quant::GrayImage;
use inkpack::chapters::TocEntry;
use inkpack::config::Config;
use inkpack::error::ConvertError;
use inkpack::pipeline::{PageRenderer, RenderedSource};

/// Test page dimensions, kept tiny so payloads are easy to reason about.
pub const WIDTH: u16 = 8;
pub const HEIGHT: u16 = 8;

/// A config sized for the tiny test pages, dithering off so outputs are
/// exactly predictable.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.output.width = WIDTH;
    config.output.height = HEIGHT;
    config.gray.dither = false;
    config.mono.dither = false;
    config
}

/// A flat page filled with one sample value.
pub fn flat_page(value: u8) -> GrayImage {
    GrayImage::new(
        WIDTH as u32,
        HEIGHT as u32,
        vec![value; WIDTH as usize * HEIGHT as usize],
    )
    .unwrap()
}

/// A horizontal gradient page, useful for exercising all bands.
pub fn gradient_page() -> GrayImage {
    let w = WIDTH as usize;
    let h = HEIGHT as usize;
    let pixels: Vec<u8> = (0..w * h)
        .map(|i| ((i % w) * 255 / (w - 1)) as u8)
        .collect();
    GrayImage::new(WIDTH as u32, HEIGHT as u32, pixels).unwrap()
}

/// Write a grayscale image as an 8-bit PNG file.
pub fn write_png(path: &Path, image: &GrayImage) {
    let file = File::create(path).unwrap();
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(image.pixels()).unwrap();
}

/// A canned renderer standing in for the external rasterizer: fixed pages
/// plus fixed structure entries.
pub struct StubRenderer {
    pub pages: Vec<GrayImage>,
    pub toc: Vec<TocEntry>,
}

impl StubRenderer {
    pub fn new(pages: Vec<GrayImage>, toc: Vec<TocEntry>) -> Self {
        Self { pages, toc }
    }
}

impl PageRenderer for StubRenderer {
    fn render_pages(&self, _config: &Config) -> Result<RenderedSource, ConvertError> {
        Ok(RenderedSource {
            pages: self.pages.clone(),
            toc: self.toc.clone(),
        })
    }
}
