//! Binary formats for e-paper readers.
//!
//! Three wire formats share this module: XTG (monochrome 1-bpp frames),
//! XTH (4-level grayscale 2-bpp frames), and XTC (the multi-page container
//! that carries either). Frames are self-describing: a 24-byte header with
//! magic, version, dimensions and payload size, followed by the packed
//! pixel payload, so a frame sliced out of a container decodes on its own.

pub mod container;
mod gray;
mod mono;

use crate::error::{ConvertError, FormatError};
use eink_quant::LevelImage;

/// "XTG\0", little-endian.
pub const MONO_MAGIC: u32 = 0x0047_5458;
/// "XTH\0", little-endian.
pub const GRAY_MAGIC: u32 = 0x0048_5458;
/// Frame format version 1.0.
pub const FRAME_VERSION: u16 = 0x0100;

/// Frame header: magic(4) version(2) width(2) height(2) color_mode(1)
/// compression(1) data_size(4) checksum(8).
pub const FRAME_HEADER_SIZE: usize = 24;

/// Display intensity per 4-level frame value, fixed by the controller's
/// refresh LUT: 0 = white, 1 = dark gray, 2 = light gray, 3 = black.
pub const GRAY_LEVEL_INTENSITY: [u8; 4] = [255, 85, 170, 0];

/// Display intensity per 1-bit frame value: 0 = white, 1 = black.
pub const MONO_LEVEL_INTENSITY: [u8; 2] = [255, 0];

/// Target frame format: monochrome (1 bpp) or 4-level grayscale (2 bpp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// XTG: single row-major bitmap, MSB-first, rows padded to byte
    /// boundary.
    Mono,
    /// XTH: two column-major bitplanes scanned right-to-left, 8 rows per
    /// byte.
    #[default]
    Gray,
}

impl FrameFormat {
    /// Wire magic for this format.
    #[inline]
    pub fn magic(self) -> u32 {
        match self {
            FrameFormat::Mono => MONO_MAGIC,
            FrameFormat::Gray => GRAY_MAGIC,
        }
    }

    /// Resolve a wire magic back to a format.
    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            MONO_MAGIC => Some(FrameFormat::Mono),
            GRAY_MAGIC => Some(FrameFormat::Gray),
            _ => None,
        }
    }

    /// Quantization levels this format stores (2 or 4).
    #[inline]
    pub fn level_count(self) -> u8 {
        match self {
            FrameFormat::Mono => 2,
            FrameFormat::Gray => 4,
        }
    }

    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            FrameFormat::Mono => "mono",
            FrameFormat::Gray => "gray",
        }
    }

    /// Exact payload size implied by the packing rule for these dimensions.
    pub fn payload_len(self, width: u16, height: u16) -> usize {
        let w = width as usize;
        let h = height as usize;
        match self {
            // Row-major, 8 horizontal pixels per byte, row-padded.
            FrameFormat::Mono => h * ((w + 7) / 8),
            // Two planes, column-major, 8 vertical pixels per byte.
            FrameFormat::Gray => 2 * w * ((h + 7) / 8),
        }
    }

    /// Display intensity for a frame-level value (hardware LUT).
    pub fn intensity(self, level: u8) -> u8 {
        match self {
            FrameFormat::Mono => MONO_LEVEL_INTENSITY[level as usize],
            FrameFormat::Gray => GRAY_LEVEL_INTENSITY[level as usize],
        }
    }
}

/// One encoded page: format, dimensions, and the bit-packed payload.
///
/// Invariant: `payload.len() == format.payload_len(width, height)`; both
/// constructors enforce it, so serialization never re-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    format: FrameFormat,
    width: u16,
    height: u16,
    payload: Vec<u8>,
}

impl Frame {
    /// Encode a quantized image into a frame.
    ///
    /// Fails if the image's level count does not match the target format.
    /// Dimensions are already positive (LevelImage guarantees it) but must
    /// fit the 16-bit header fields.
    pub fn encode(levels: &LevelImage, format: FrameFormat) -> Result<Frame, ConvertError> {
        if levels.level_count() != format.level_count() {
            return Err(ConvertError::LevelCountMismatch {
                levels: levels.level_count(),
                format: format.name(),
                expected: format.level_count(),
            });
        }
        let width = u16::try_from(levels.width()).map_err(|_| ConvertError::InvalidDimensions {
            width: levels.width(),
            height: levels.height(),
        })?;
        let height = u16::try_from(levels.height()).map_err(|_| ConvertError::InvalidDimensions {
            width: levels.width(),
            height: levels.height(),
        })?;

        let payload = match format {
            FrameFormat::Mono => mono::pack(levels),
            FrameFormat::Gray => gray::pack(levels),
        };
        debug_assert_eq!(payload.len(), format.payload_len(width, height));

        Ok(Frame {
            format,
            width,
            height,
            payload,
        })
    }

    /// Parse a serialized frame (header + payload).
    pub fn from_bytes(data: &[u8]) -> Result<Frame, ConvertError> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(FormatError::Truncated("frame header").into());
        }
        let magic = u32::from_le_bytes(data[0..4].try_into().unwrap());
        let format =
            FrameFormat::from_magic(magic).ok_or(FormatError::UnknownFrameMagic(magic))?;
        let version = u16::from_le_bytes(data[4..6].try_into().unwrap());
        if version != FRAME_VERSION {
            return Err(FormatError::UnsupportedVersion(version).into());
        }
        let width = u16::from_le_bytes(data[6..8].try_into().unwrap());
        let height = u16::from_le_bytes(data[8..10].try_into().unwrap());
        if width == 0 || height == 0 {
            return Err(FormatError::ZeroFrameDimensions.into());
        }
        // color_mode (data[10]) and compression (data[11]) are reserved; the
        // only defined value for both is 0, but readers skip them like the
        // device firmware does.
        let data_size = u32::from_le_bytes(data[12..16].try_into().unwrap());
        let payload = &data[FRAME_HEADER_SIZE..];
        if data_size as usize != payload.len() {
            return Err(FormatError::DataSizeMismatch {
                declared: data_size,
                actual: payload.len(),
            }
            .into());
        }
        let expected = format.payload_len(width, height);
        if payload.len() != expected {
            return Err(FormatError::PayloadSize {
                format: format.name(),
                width,
                height,
                expected,
                actual: payload.len(),
            }
            .into());
        }

        Ok(Frame {
            format,
            width,
            height,
            payload: payload.to_vec(),
        })
    }

    /// Serialize header + payload into a standalone frame file image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let checksum: u64 = self
            .payload
            .iter()
            .fold(0u64, |acc, &b| acc.wrapping_add(b as u64));

        let mut out = Vec::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.format.magic().to_le_bytes());
        out.extend_from_slice(&FRAME_VERSION.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.push(0); // color mode
        out.push(0); // compression: none
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&checksum.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Unpack the payload back into level indices.
    pub fn decode(&self) -> Result<LevelImage, ConvertError> {
        let levels = match self.format {
            FrameFormat::Mono => mono::unpack(&self.payload, self.width, self.height),
            FrameFormat::Gray => gray::unpack(&self.payload, self.width, self.height),
        };
        Ok(LevelImage::new(
            self.width as u32,
            self.height as u32,
            self.format.level_count(),
            levels,
        )?)
    }

    /// Decode to display intensities (one byte per pixel, row-major),
    /// applying the hardware LUT. Used for preview output.
    pub fn decode_intensity(&self) -> Result<Vec<u8>, ConvertError> {
        let levels = self.decode()?;
        Ok(levels
            .data()
            .iter()
            .map(|&v| self.format.intensity(v))
            .collect())
    }

    #[inline]
    pub fn format(&self) -> FrameFormat {
        self.format
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The bit-packed payload, without the header.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eink_quant::LevelImage;
    use pretty_assertions::assert_eq;

    fn gray_levels() -> LevelImage {
        // 4x3, all four levels present
        LevelImage::new(4, 3, 4, vec![0, 1, 2, 3, 3, 2, 1, 0, 0, 0, 3, 3]).unwrap()
    }

    #[test]
    fn test_payload_len_mono_row_padding() {
        assert_eq!(FrameFormat::Mono.payload_len(8, 2), 2);
        assert_eq!(FrameFormat::Mono.payload_len(9, 2), 4);
        assert_eq!(FrameFormat::Mono.payload_len(2, 2), 2);
    }

    #[test]
    fn test_payload_len_gray_column_padding() {
        assert_eq!(FrameFormat::Gray.payload_len(2, 8), 4);
        assert_eq!(FrameFormat::Gray.payload_len(2, 9), 8);
        assert_eq!(FrameFormat::Gray.payload_len(3, 2), 6);
    }

    #[test]
    fn test_encode_rejects_level_count_mismatch() {
        let mono_levels = LevelImage::new(2, 2, 2, vec![0, 1, 1, 0]).unwrap();
        let err = Frame::encode(&mono_levels, FrameFormat::Gray).unwrap_err();
        assert!(matches!(err, ConvertError::LevelCountMismatch { .. }));

        let err = Frame::encode(&gray_levels(), FrameFormat::Mono).unwrap_err();
        assert!(matches!(err, ConvertError::LevelCountMismatch { .. }));
    }

    #[test]
    fn test_round_trip_gray() {
        let levels = gray_levels();
        let frame = Frame::encode(&levels, FrameFormat::Gray).unwrap();
        assert_eq!(frame.decode().unwrap(), levels);
    }

    #[test]
    fn test_round_trip_mono() {
        let levels = LevelImage::new(10, 3, 2, vec![1; 30]).unwrap();
        let frame = Frame::encode(&levels, FrameFormat::Mono).unwrap();
        assert_eq!(frame.decode().unwrap(), levels);
    }

    #[test]
    fn test_serialized_round_trip() {
        let frame = Frame::encode(&gray_levels(), FrameFormat::Gray).unwrap();
        let bytes = frame.to_bytes();
        let parsed = Frame::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_encode_is_idempotent() {
        let levels = gray_levels();
        let a = Frame::encode(&levels, FrameFormat::Gray).unwrap().to_bytes();
        let b = Frame::encode(&levels, FrameFormat::Gray).unwrap().to_bytes();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_bytes_rejects_bad_magic() {
        let mut bytes = Frame::encode(&gray_levels(), FrameFormat::Gray)
            .unwrap()
            .to_bytes();
        bytes[0] = 0xFF;
        let err = Frame::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::UnknownFrameMagic(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_bad_version() {
        let mut bytes = Frame::encode(&gray_levels(), FrameFormat::Gray)
            .unwrap()
            .to_bytes();
        bytes[4] = 0x02;
        let err = Frame::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_truncated_payload() {
        let mut bytes = Frame::encode(&gray_levels(), FrameFormat::Gray)
            .unwrap()
            .to_bytes();
        bytes.truncate(bytes.len() - 1);
        let err = Frame::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::DataSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_bytes_rejects_short_header() {
        let err = Frame::from_bytes(&[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::Truncated("frame header"))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_zero_dimensions() {
        let mut bytes = Frame::encode(&gray_levels(), FrameFormat::Gray)
            .unwrap()
            .to_bytes();
        bytes[6] = 0;
        bytes[7] = 0;
        let err = Frame::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::ZeroFrameDimensions)
        ));
    }

    #[test]
    fn test_gray_lut_is_fixed() {
        assert_eq!(FrameFormat::Gray.intensity(0), 255); // white
        assert_eq!(FrameFormat::Gray.intensity(1), 85); // dark gray
        assert_eq!(FrameFormat::Gray.intensity(2), 170); // light gray
        assert_eq!(FrameFormat::Gray.intensity(3), 0); // black
        assert_eq!(FrameFormat::Mono.intensity(0), 255);
        assert_eq!(FrameFormat::Mono.intensity(1), 0);
    }
}
