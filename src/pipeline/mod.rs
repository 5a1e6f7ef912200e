//! Conversion pipeline orchestration.
//!
//! Each source walks `Raw -> Rendered -> Quantized -> Encoded`; the final
//! `Assembled` step concatenates every source's pages in order and writes
//! the requested output. Page work (`Rendered -> Encoded`) runs on the
//! rayon worker pool: pages are independent, and results come back in page
//! order because the container needs stable numbering. The one thing that
//! never parallelizes is error diffusion inside a single page.

pub mod output;
pub mod source;

use std::path::Path;

use rayon::prelude::*;

use eink_quant::GrayImage;

use crate::chapters::{derive_chapters, Chapter, TocEntry};
use crate::config::Config;
use crate::error::ConvertError;
use crate::formats::Frame;

pub use source::{PageRenderer, RenderedSource, Source};

use output::OutputMode;
use source::SourcePages;

/// One page's pipeline result: the encoded frame plus the structure
/// entries that rode along with it.
#[derive(Debug, Clone)]
pub struct EncodedPage {
    pub frame: Frame,
    pub toc: Vec<TocEntry>,
}

/// What a conversion run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub chapters: usize,
}

/// The conversion pipeline, validated once at construction.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration up front.
    pub fn new(config: Config) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full conversion: expand sources, encode every page, and
    /// assemble the output selected by the path's extension.
    pub fn run(&self, sources: &[Source], output_path: &Path) -> Result<RunSummary, ConvertError> {
        let mode = OutputMode::from_path(output_path)?;

        let pages = self.collect_pages(sources)?;
        if pages.is_empty() {
            return Err(ConvertError::NoFrames);
        }
        if pages.len() > u16::MAX as usize {
            return Err(ConvertError::TooManyPages {
                count: pages.len(),
                max: u16::MAX as usize,
            });
        }

        match mode {
            OutputMode::Container => {
                let chapters = self.derive_global_chapters(&pages);
                let summary = RunSummary {
                    pages: pages.len(),
                    chapters: chapters.len(),
                };
                output::write_container(output_path, &pages, chapters, &self.config)?;
                Ok(summary)
            }
            OutputMode::FrameFiles => {
                output::write_frame_files(output_path, &pages)?;
                Ok(RunSummary {
                    pages: pages.len(),
                    chapters: 0,
                })
            }
            OutputMode::DebugPng => {
                output::write_debug_png(output_path, &pages)?;
                Ok(RunSummary {
                    pages: pages.len(),
                    chapters: 0,
                })
            }
        }
    }

    /// Expand all sources and encode their pages, preserving source order
    /// and page order within each source.
    pub fn collect_pages(&self, sources: &[Source]) -> Result<Vec<EncodedPage>, ConvertError> {
        let mut all = Vec::new();
        for source in sources {
            tracing::debug!(source = %source.describe(), "processing source");
            match source::load(source, &self.config)? {
                SourcePages::Rendered(pages) => {
                    let encoded = pages
                        .into_par_iter()
                        .map(|page| {
                            self.encode_page(&page.image).map(|frame| EncodedPage {
                                frame,
                                toc: page.toc,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    all.extend(encoded);
                }
                SourcePages::Encoded(pages) => {
                    all.extend(pages.into_iter().map(|page| EncodedPage {
                        frame: page.frame,
                        toc: page.toc,
                    }));
                }
            }
        }
        tracing::info!(pages = all.len(), "collected pages");
        Ok(all)
    }

    /// One page's `Rendered -> Quantized -> Encoded` transition: dither
    /// (when enabled), band, pack. Pure per-page work, safe to fuse into a
    /// single worker task.
    pub fn encode_page(&self, image: &GrayImage) -> Result<Frame, ConvertError> {
        let out = &self.config.output;
        if image.width() != out.width as u32 || image.height() != out.height as u32 {
            return Err(ConvertError::PageSizeMismatch {
                found_width: image.width(),
                found_height: image.height(),
                width: out.width,
                height: out.height,
            });
        }

        let format = out.format;
        let quantizer = self.config.quantizer(format)?;
        let (dither, strength) = self.config.dithering(format);
        let levels = if dither {
            eink_quant::diffuse(image, &quantizer, strength)?
        } else {
            quantizer.quantize(image)
        };
        Frame::encode(&levels, format)
    }

    /// Re-page structure entries to their global positions and derive the
    /// chapter table. Page numbering is global across concatenated
    /// sources. Structural warnings are logged and processing continues.
    pub fn derive_global_chapters(&self, pages: &[EncodedPage]) -> Vec<Chapter> {
        if !self.config.toc.extract {
            return Vec::new();
        }

        let mut entries = Vec::new();
        for (i, page) in pages.iter().enumerate() {
            for entry in &page.toc {
                entries.push(TocEntry {
                    page: i as u32 + 1,
                    ..entry.clone()
                });
            }
        }
        if entries.is_empty() {
            return Vec::new();
        }

        let derived = derive_chapters(&entries, pages.len() as u16, self.config.toc.chapter_level);
        for warning in &derived.warnings {
            tracing::warn!(%warning, "chapter derivation");
        }
        derived.chapters
    }
}
