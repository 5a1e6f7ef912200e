//! Conversion sources.
//!
//! A source is anything that expands into pages: a PNG page image, a
//! pre-encoded frame file, an existing container being re-packed, or an
//! external renderer behind the [`PageRenderer`] seam. Rendered pages
//! enter the pipeline at the top (they still need quantizing); frame and
//! container sources enter already encoded.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use eink_quant::GrayImage;

use crate::chapters::{remap_into_selection, TocEntry};
use crate::config::Config;
use crate::error::ConvertError;
use crate::formats::container::ContainerReader;
use crate::formats::Frame;
use crate::pages::{parse_page_range, split_page_spec};

/// Narrow contract for the external rasterizer collaborator.
///
/// A renderer turns one document into grayscale page buffers, sized to the
/// configured output dimensions, plus any structure entries it extracted
/// (with 1-based page numbers local to this source). PDF, Typst or
/// markup rasterizers all plug in here; this crate itself only ships
/// image-file loading.
pub trait PageRenderer: Send + Sync {
    fn render_pages(&self, config: &Config) -> Result<RenderedSource, ConvertError>;
}

/// What a renderer (or image loader) produced for one source.
pub struct RenderedSource {
    /// One grayscale buffer per page, in page order.
    pub pages: Vec<GrayImage>,
    /// Structure entries, pages 1-based within `pages`.
    pub toc: Vec<TocEntry>,
}

/// One input to a conversion run, with an optional page selection.
pub struct Source {
    kind: SourceKind,
    pages: Option<String>,
}

enum SourceKind {
    Path(PathBuf),
    Renderer(Box<dyn PageRenderer>),
}

impl Source {
    /// Build a source from a CLI argument, splitting off a trailing page
    /// selection (`book.xtc:1-10`).
    pub fn from_arg(arg: &str) -> Self {
        let (path, spec) = split_page_spec(arg);
        Self {
            kind: SourceKind::Path(PathBuf::from(path)),
            pages: spec.map(str::to_string),
        }
    }

    /// Build a source from an external renderer.
    pub fn from_renderer(renderer: Box<dyn PageRenderer>) -> Self {
        Self {
            kind: SourceKind::Renderer(renderer),
            pages: None,
        }
    }

    /// Restrict this source to a page selection.
    pub fn with_pages(mut self, spec: impl Into<String>) -> Self {
        self.pages = Some(spec.into());
        self
    }

    /// Human-readable description for logging.
    pub fn describe(&self) -> String {
        match &self.kind {
            SourceKind::Path(path) => path.display().to_string(),
            SourceKind::Renderer(_) => "<renderer>".to_string(),
        }
    }
}

/// A rendered page with the structure entries anchored to it.
///
/// The entries ride alongside the image as an immutable side channel; the
/// orchestrator re-pages them once the final page order is known.
#[derive(Debug)]
pub(crate) struct RenderedPage {
    pub image: GrayImage,
    pub toc: Vec<TocEntry>,
}

/// An already-encoded page with the structure entries anchored to it.
/// Container sources re-emit their chapter table this way, so re-packing
/// books keeps their chapters.
#[derive(Debug)]
pub(crate) struct EncodedSourcePage {
    pub frame: Frame,
    pub toc: Vec<TocEntry>,
}

/// Pages produced by one source, at whichever pipeline stage they enter.
#[derive(Debug)]
pub(crate) enum SourcePages {
    Rendered(Vec<RenderedPage>),
    Encoded(Vec<EncodedSourcePage>),
}

/// Expand one source into pages, applying its page selection.
pub(crate) fn load(source: &Source, config: &Config) -> Result<SourcePages, ConvertError> {
    match &source.kind {
        SourceKind::Renderer(renderer) => {
            let rendered = renderer.render_pages(config)?;
            Ok(SourcePages::Rendered(select_and_attach(
                rendered,
                source.pages.as_deref(),
            )?))
        }
        SourceKind::Path(path) => load_path(path, source.pages.as_deref(), config),
    }
}

fn load_path(
    path: &Path,
    spec: Option<&str>,
    config: &Config,
) -> Result<SourcePages, ConvertError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => {
            let image = decode_png(path)?;
            tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "loaded PNG page");
            let rendered = RenderedSource {
                pages: vec![image],
                toc: Vec::new(),
            };
            Ok(SourcePages::Rendered(select_and_attach(rendered, spec)?))
        }
        Some("xtg") | Some("xth") => {
            let data = std::fs::read(path)?;
            let frame = Frame::from_bytes(&data)?;
            if let Some(spec) = spec {
                // A frame file is a one-page source; the selection can only
                // keep or drop it.
                parse_page_range(spec, 1)?;
            }
            Ok(SourcePages::Encoded(vec![EncodedSourcePage {
                frame,
                toc: Vec::new(),
            }]))
        }
        Some("xtc") => {
            let file = BufReader::new(File::open(path)?);
            let mut reader = ContainerReader::new(file)?;
            let total = reader.page_count() as u32;
            let selected: Vec<u32> = match spec {
                Some(spec) => parse_page_range(spec, total)?,
                None => (1..=total).collect(),
            };

            // Turn the chapter table back into structure entries at the
            // configured chapter level, anchored to each chapter's start
            // page, so re-packed books keep their chapters.
            let entries: Vec<TocEntry> = reader
                .chapters()
                .iter()
                .map(|ch| TocEntry {
                    title: ch.name.clone(),
                    level: config.toc.chapter_level,
                    page: ch.start_page as u32 + 1,
                })
                .collect();
            let entries = remap_into_selection(&entries, &selected);

            let mut pages: Vec<EncodedSourcePage> = Vec::with_capacity(selected.len());
            for page in &selected {
                pages.push(EncodedSourcePage {
                    frame: reader.frame((page - 1) as usize)?,
                    toc: Vec::new(),
                });
            }
            for entry in entries {
                if let Some(page) = pages.get_mut((entry.page - 1) as usize) {
                    page.toc.push(entry);
                }
            }
            tracing::debug!(path = %path.display(), pages = pages.len(), "extracted container pages");
            Ok(SourcePages::Encoded(pages))
        }
        _ => Err(ConvertError::UnsupportedSource(path.to_path_buf())),
    }
}

/// Apply a page selection to rendered pages and pin each surviving
/// structure entry to its page.
fn select_and_attach(
    rendered: RenderedSource,
    spec: Option<&str>,
) -> Result<Vec<RenderedPage>, ConvertError> {
    let total = rendered.pages.len() as u32;
    let (pages, toc) = match spec {
        Some(spec) => {
            let selected = parse_page_range(spec, total)?;
            let toc = remap_into_selection(&rendered.toc, &selected);
            let pages: Vec<GrayImage> = selected
                .iter()
                .map(|&p| rendered.pages[(p - 1) as usize].clone())
                .collect();
            (pages, toc)
        }
        None => (rendered.pages, rendered.toc),
    };

    let mut out: Vec<RenderedPage> = pages
        .into_iter()
        .map(|image| RenderedPage {
            image,
            toc: Vec::new(),
        })
        .collect();
    for entry in toc {
        match out.get_mut((entry.page.saturating_sub(1)) as usize) {
            Some(page) if entry.page >= 1 => page.toc.push(entry),
            _ => {
                tracing::debug!(title = %entry.title, page = entry.page, "structure entry outside rendered pages, dropped")
            }
        }
    }
    Ok(out)
}

fn decode_png(path: &Path) -> Result<GrayImage, ConvertError> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    // Expand palettes and strip 16-bit channels so every layout below is
    // 8-bit.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ConvertError::UnsupportedPng(format!(
            "bit depth {:?}",
            info.bit_depth
        )));
    }

    let gray: Vec<u8> = match info.color_type {
        png::ColorType::Grayscale => bytes.to_vec(),
        png::ColorType::GrayscaleAlpha => bytes.chunks_exact(2).map(|px| px[0]).collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect(),
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect(),
        other => {
            return Err(ConvertError::UnsupportedPng(format!(
                "color type {:?}",
                other
            )))
        }
    };

    Ok(GrayImage::new(info.width, info.height, gray)?)
}

/// ITU-R BT.601 luma, integer arithmetic.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}
