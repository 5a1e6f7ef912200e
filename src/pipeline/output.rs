//! Output assembly.
//!
//! The output path's extension picks the assembly mode: `.xtc` packs a
//! container, `.xth`/`.xtg` writes bare frame files (numbered when there
//! is more than one page), `.png` decodes frames back to grayscale images
//! for eyeballing the quantizer's work.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::chapters::Chapter;
use crate::config::Config;
use crate::error::ConvertError;
use crate::formats::container::{ContainerMetadata, ContainerWriter};
use crate::formats::Frame;

use super::EncodedPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Container,
    FrameFiles,
    DebugPng,
}

impl OutputMode {
    pub(crate) fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xtc") => Ok(OutputMode::Container),
            Some("xth") | Some("xtg") => Ok(OutputMode::FrameFiles),
            Some("png") => Ok(OutputMode::DebugPng),
            _ => Err(ConvertError::UnsupportedOutput(path.to_path_buf())),
        }
    }
}

/// Assemble and write the container.
///
/// The whole byte image is built in memory first, so the output file is
/// created only once the container is complete; a failed run leaves no
/// half-written book behind.
pub(crate) fn write_container(
    path: &Path,
    pages: &[EncodedPage],
    chapters: Vec<Chapter>,
    config: &Config,
) -> Result<(), ConvertError> {
    let frames: Vec<Frame> = pages.iter().map(|p| p.frame.clone()).collect();

    let metadata = ContainerMetadata {
        title: config.output.title.clone(),
        author: config.output.author.clone(),
        publisher: config.output.publisher.clone(),
        language: config.output.language.clone(),
        created: chrono::Utc::now().timestamp() as u32,
    };

    let chapter_count = chapters.len();
    let bytes = ContainerWriter::new(config.output.width, config.output.height)
        .direction(config.output.direction)
        .metadata(metadata)
        .chapters(chapters)
        .to_bytes(&frames)?;
    std::fs::write(path, bytes)?;

    tracing::info!(
        path = %path.display(),
        pages = pages.len(),
        chapters = chapter_count,
        "wrote container"
    );
    Ok(())
}

/// Write frames as bare frame files: the output path itself for a single
/// page, `stem_001.ext` style numbering otherwise.
pub(crate) fn write_frame_files(path: &Path, pages: &[EncodedPage]) -> Result<(), ConvertError> {
    if let [page] = pages {
        std::fs::write(path, page.frame.to_bytes())?;
        tracing::info!(path = %path.display(), "wrote frame");
        return Ok(());
    }

    for (i, page) in pages.iter().enumerate() {
        let out = numbered(path, i);
        std::fs::write(&out, page.frame.to_bytes())?;
        tracing::debug!(path = %out.display(), "wrote frame");
    }
    tracing::info!(count = pages.len(), "wrote numbered frames");
    Ok(())
}

/// Decode frames to grayscale PNGs via the display LUT.
pub(crate) fn write_debug_png(path: &Path, pages: &[EncodedPage]) -> Result<(), ConvertError> {
    if let [page] = pages {
        write_one_png(path, &page.frame)?;
        tracing::info!(path = %path.display(), "wrote decoded preview");
        return Ok(());
    }

    for (i, page) in pages.iter().enumerate() {
        write_one_png(&numbered(path, i), &page.frame)?;
    }
    tracing::info!(count = pages.len(), "wrote decoded previews");
    Ok(())
}

fn write_one_png(path: &Path, frame: &Frame) -> Result<(), ConvertError> {
    let intensities = frame.decode_intensity()?;

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        frame.width() as u32,
        frame.height() as u32,
    );
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&intensities)?;
    Ok(())
}

fn numbered(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    path.with_file_name(format!("{}_{:03}.{}", stem, index + 1, ext))
}
