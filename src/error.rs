use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the conversion pipeline.
///
/// Validation problems (bad parameters, shape mismatches) are caught before
/// any page is processed; decode-side problems surface as [`FormatError`].
/// Nothing is retried internally.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("quantization error: {0}")]
    Quant(#[from] eink_quant::QuantError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("page is {found_width}x{found_height}, output is configured as {width}x{height}")]
    PageSizeMismatch {
        found_width: u32,
        found_height: u32,
        width: u16,
        height: u16,
    },

    #[error("level image has {levels} levels, {format} frames hold {expected}")]
    LevelCountMismatch {
        levels: u8,
        format: &'static str,
        expected: u8,
    },

    #[error("no frames to write")]
    NoFrames,

    #[error("container holds at most {max} pages (got {count})")]
    TooManyPages { count: usize, max: usize },

    #[error("mixed frame formats in one container")]
    MixedFrameFormats,

    #[error("frame {page} is {found_width}x{found_height}, container declares {width}x{height}")]
    FrameSizeMismatch {
        page: usize,
        found_width: u16,
        found_height: u16,
        width: u16,
        height: u16,
    },

    #[error("chapter '{name}' range {start}..={end} outside 0..{pages}")]
    ChapterOutOfRange {
        name: String,
        start: u16,
        end: u16,
        pages: u16,
    },

    #[error("chapter name exceeds {max} bytes: '{name}'")]
    ChapterNameTooLong { name: String, max: usize },

    #[error("invalid page selection '{0}'")]
    InvalidPageSpec(String),

    #[error("page selection '{spec}' matches none of {pages} pages")]
    EmptyPageSelection { spec: String, pages: u32 },

    #[error("unsupported source type: {}", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("unsupported output type: {}", .0.display())]
    UnsupportedOutput(PathBuf),

    #[error("config error: {0}")]
    Config(String),

    #[error("unsupported PNG layout: {0}")]
    UnsupportedPng(String),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode-side error for frame and container parsing.
///
/// Raised immediately on the first malformed byte; no partial or
/// best-effort decode is offered.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("bad magic {found:#010x} (expected {expected:#010x})")]
    BadMagic { found: u32, expected: u32 },

    #[error("unrecognized frame magic {0:#010x}")]
    UnknownFrameMagic(u32),

    #[error("unsupported format version {0:#06x}")]
    UnsupportedVersion(u16),

    #[error("truncated {0}")]
    Truncated(&'static str),

    #[error("frame declares zero dimensions")]
    ZeroFrameDimensions,

    #[error("invalid reading direction {0}")]
    InvalidDirection(u8),

    #[error("payload is {actual} bytes, {width}x{height} {format} implies {expected}")]
    PayloadSize {
        format: &'static str,
        width: u16,
        height: u16,
        expected: usize,
        actual: usize,
    },

    #[error("declared data size {declared} does not match payload length {actual}")]
    DataSizeMismatch { declared: u32, actual: usize },

    #[error("page index entry {page}: offset {offset} + length {length} exceeds file size {file_len}")]
    IndexOutOfBounds {
        page: usize,
        offset: u64,
        length: u32,
        file_len: u64,
    },

    #[error("chapter '{name}' range {start}..={end} outside 0..{pages}")]
    ChapterOutOfRange {
        name: String,
        start: u16,
        end: u16,
        pages: u16,
    },

    #[error("page {page} out of range ({pages} pages)")]
    PageOutOfRange { page: usize, pages: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_bad_magic_display() {
        let err = FormatError::BadMagic {
            found: 0xdead_beef,
            expected: 0x0043_5458,
        };
        assert_eq!(
            err.to_string(),
            "bad magic 0xdeadbeef (expected 0x00435458)"
        );
    }

    #[test]
    fn test_format_error_wraps_into_convert_error() {
        let err: ConvertError = FormatError::Truncated("container header").into();
        assert_eq!(err.to_string(), "format error: truncated container header");
    }

    #[test]
    fn test_quant_error_wraps_into_convert_error() {
        let err: ConvertError = eink_quant::QuantError::StrengthOutOfRange(2.0).into();
        assert_eq!(
            err.to_string(),
            "quantization error: dither strength 2 outside 0.0..=1.0"
        );
    }

    #[test]
    fn test_index_out_of_bounds_display() {
        let err = FormatError::IndexOutOfBounds {
            page: 3,
            offset: 1000,
            length: 500,
            file_len: 1200,
        };
        assert_eq!(
            err.to_string(),
            "page index entry 3: offset 1000 + length 500 exceeds file size 1200"
        );
    }
}
