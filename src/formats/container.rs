//! XTC container codec.
//!
//! A container holds an ordered run of frames, descriptive metadata, an
//! optional chapter table, and a page index mapping each page to the byte
//! range of its frame. The index is recomputed from actual encoded frame
//! sizes on every write and is the only way pages are located on read, so
//! opening a book at page 300 never scans pages 1..299.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! header    magic u32, version u16, page_count u16, width u16,
//!           height u16, direction u8
//! metadata  title, author, publisher, language (each u16 len + UTF-8),
//!           created u32
//! chapters  count u16, then per chapter: u16 len + name, start u16, end u16
//! index     per page: offset u64 (absolute), length u32
//! data      concatenated frame images (each self-describing)
//! ```

use std::io::{Read, Seek, SeekFrom, Write};

use serde::Deserialize;

use super::{Frame, FrameFormat};
use crate::chapters::{Chapter, MAX_CHAPTER_NAME_BYTES};
use crate::error::{ConvertError, FormatError};

/// "XTC\0", little-endian.
pub const CONTAINER_MAGIC: u32 = 0x0043_5458;
/// Container format version 1.0.
pub const CONTAINER_VERSION: u16 = 0x0100;

const HEADER_SIZE: usize = 13;
const INDEX_ENTRY_SIZE: usize = 12;

/// Page turn direction for the reader UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReadingDirection {
    #[default]
    #[serde(rename = "ltr")]
    LeftToRight,
    #[serde(rename = "rtl")]
    RightToLeft,
    #[serde(rename = "ttb")]
    TopToBottom,
}

impl ReadingDirection {
    /// Wire encoding.
    pub fn as_u8(self) -> u8 {
        match self {
            ReadingDirection::LeftToRight => 0,
            ReadingDirection::RightToLeft => 1,
            ReadingDirection::TopToBottom => 2,
        }
    }

    /// Decode the wire byte.
    pub fn from_u8(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(ReadingDirection::LeftToRight),
            1 => Ok(ReadingDirection::RightToLeft),
            2 => Ok(ReadingDirection::TopToBottom),
            other => Err(FormatError::InvalidDirection(other)),
        }
    }
}

/// Descriptive container metadata. No invariants beyond the direction enum,
/// which lives in the header rather than here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerMetadata {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub language: String,
    /// Creation time, unix seconds.
    pub created: u32,
}

impl Default for ContainerMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            publisher: String::new(),
            language: "en-US".to_string(),
            created: 0,
        }
    }
}

/// One page index entry: absolute byte offset and length of a frame image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIndexEntry {
    pub offset: u64,
    pub length: u32,
}

/// Builder-style writer for XTC containers.
///
/// Containers are write-once: the full byte image is assembled in memory
/// (frames are already encoded, so sizes are known) and streamed out in a
/// single pass. A partially written file is never observable.
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    width: u16,
    height: u16,
    direction: ReadingDirection,
    metadata: ContainerMetadata,
    chapters: Vec<Chapter>,
}

impl ContainerWriter {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            direction: ReadingDirection::default(),
            metadata: ContainerMetadata::default(),
            chapters: Vec::new(),
        }
    }

    pub fn direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn metadata(mut self, metadata: ContainerMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }

    /// Assemble the complete container image.
    ///
    /// Validates everything up front: at least one frame, a uniform frame
    /// format, frame dimensions matching the declared page size, chapter
    /// ranges inside the page run, and chapter names within the name cap.
    pub fn to_bytes(&self, frames: &[Frame]) -> Result<Vec<u8>, ConvertError> {
        if frames.is_empty() {
            return Err(ConvertError::NoFrames);
        }
        if frames.len() > u16::MAX as usize {
            return Err(ConvertError::TooManyPages {
                count: frames.len(),
                max: u16::MAX as usize,
            });
        }
        let page_count = frames.len() as u16;

        let format = frames[0].format();
        for (page, frame) in frames.iter().enumerate() {
            if frame.format() != format {
                return Err(ConvertError::MixedFrameFormats);
            }
            if frame.width() != self.width || frame.height() != self.height {
                return Err(ConvertError::FrameSizeMismatch {
                    page,
                    found_width: frame.width(),
                    found_height: frame.height(),
                    width: self.width,
                    height: self.height,
                });
            }
        }

        for chapter in &self.chapters {
            if chapter.name.len() > MAX_CHAPTER_NAME_BYTES {
                return Err(ConvertError::ChapterNameTooLong {
                    name: chapter.name.clone(),
                    max: MAX_CHAPTER_NAME_BYTES,
                });
            }
            if chapter.start_page > chapter.end_page || chapter.end_page >= page_count {
                return Err(ConvertError::ChapterOutOfRange {
                    name: chapter.name.clone(),
                    start: chapter.start_page,
                    end: chapter.end_page,
                    pages: page_count,
                });
            }
        }

        let frame_images: Vec<Vec<u8>> = frames.iter().map(Frame::to_bytes).collect();

        let metadata_size = str_field_size(&self.metadata.title)?
            + str_field_size(&self.metadata.author)?
            + str_field_size(&self.metadata.publisher)?
            + str_field_size(&self.metadata.language)?
            + 4;
        let chapters_size: usize = 2 + self
            .chapters
            .iter()
            .map(|c| 2 + c.name.len() + 4)
            .sum::<usize>();
        let index_size = frames.len() * INDEX_ENTRY_SIZE;
        let data_start = HEADER_SIZE + metadata_size + chapters_size + index_size;
        let total_size = data_start + frame_images.iter().map(Vec::len).sum::<usize>();

        let mut out = Vec::with_capacity(total_size);

        // Header
        out.extend_from_slice(&CONTAINER_MAGIC.to_le_bytes());
        out.extend_from_slice(&CONTAINER_VERSION.to_le_bytes());
        out.extend_from_slice(&page_count.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.push(self.direction.as_u8());

        // Metadata
        put_string(&mut out, &self.metadata.title);
        put_string(&mut out, &self.metadata.author);
        put_string(&mut out, &self.metadata.publisher);
        put_string(&mut out, &self.metadata.language);
        out.extend_from_slice(&self.metadata.created.to_le_bytes());

        // Chapter table
        out.extend_from_slice(&(self.chapters.len() as u16).to_le_bytes());
        for chapter in &self.chapters {
            put_string(&mut out, &chapter.name);
            out.extend_from_slice(&chapter.start_page.to_le_bytes());
            out.extend_from_slice(&chapter.end_page.to_le_bytes());
        }

        // Page index, from actual encoded sizes
        let mut offset = data_start as u64;
        for image in &frame_images {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(image.len() as u32).to_le_bytes());
            offset += image.len() as u64;
        }

        // Frame data
        for image in &frame_images {
            out.extend_from_slice(image);
        }

        debug_assert_eq!(out.len(), total_size);
        Ok(out)
    }

    /// Assemble and stream the container to a writer.
    pub fn write_to<W: Write>(&self, out: &mut W, frames: &[Frame]) -> Result<(), ConvertError> {
        let bytes = self.to_bytes(frames)?;
        out.write_all(&bytes)?;
        Ok(())
    }
}

fn str_field_size(s: &str) -> Result<usize, ConvertError> {
    if s.len() > u16::MAX as usize {
        return Err(ConvertError::Config(format!(
            "metadata field exceeds {} bytes",
            u16::MAX
        )));
    }
    Ok(2 + s.len())
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u16).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// Random-access container reader.
///
/// Header, metadata, chapter table and page index are parsed eagerly at
/// construction; frames are read and decoded lazily, one index lookup and
/// one seek per request.
#[derive(Debug)]
pub struct ContainerReader<R> {
    src: R,
    page_count: u16,
    width: u16,
    height: u16,
    direction: ReadingDirection,
    metadata: ContainerMetadata,
    chapters: Vec<Chapter>,
    index: Vec<PageIndexEntry>,
}

impl<R: Read + Seek> ContainerReader<R> {
    /// Open a container, parsing and validating everything but the frames.
    pub fn new(mut src: R) -> Result<Self, ConvertError> {
        let file_len = src.seek(SeekFrom::End(0))?;
        src.seek(SeekFrom::Start(0))?;

        let mut header = [0u8; HEADER_SIZE];
        read_exact_or(&mut src, &mut header, "container header")?;

        let magic = u32::from_le_bytes(header[0..4].try_into().unwrap());
        if magic != CONTAINER_MAGIC {
            return Err(FormatError::BadMagic {
                found: magic,
                expected: CONTAINER_MAGIC,
            }
            .into());
        }
        let version = u16::from_le_bytes(header[4..6].try_into().unwrap());
        if version != CONTAINER_VERSION {
            return Err(FormatError::UnsupportedVersion(version).into());
        }
        let page_count = u16::from_le_bytes(header[6..8].try_into().unwrap());
        let width = u16::from_le_bytes(header[8..10].try_into().unwrap());
        let height = u16::from_le_bytes(header[10..12].try_into().unwrap());
        let direction = ReadingDirection::from_u8(header[12])?;

        let metadata = ContainerMetadata {
            title: read_string(&mut src, "metadata block")?,
            author: read_string(&mut src, "metadata block")?,
            publisher: read_string(&mut src, "metadata block")?,
            language: read_string(&mut src, "metadata block")?,
            created: read_u32(&mut src, "metadata block")?,
        };

        let chapter_count = read_u16(&mut src, "chapter table")?;
        let mut chapters = Vec::with_capacity(chapter_count as usize);
        for _ in 0..chapter_count {
            let name = read_string(&mut src, "chapter table")?;
            let start_page = read_u16(&mut src, "chapter table")?;
            let end_page = read_u16(&mut src, "chapter table")?;
            if start_page > end_page || end_page >= page_count {
                return Err(FormatError::ChapterOutOfRange {
                    name,
                    start: start_page,
                    end: end_page,
                    pages: page_count,
                }
                .into());
            }
            chapters.push(Chapter {
                name,
                start_page,
                end_page,
            });
        }

        // Read the whole index before bounds-checking it, so a file cut
        // short inside the index reports the truncation, not a bogus range.
        let mut index = Vec::with_capacity(page_count as usize);
        for _ in 0..page_count {
            let offset = read_u64(&mut src, "page index")?;
            let length = read_u32(&mut src, "page index")?;
            index.push(PageIndexEntry { offset, length });
        }
        for (page, entry) in index.iter().enumerate() {
            if entry.offset + entry.length as u64 > file_len {
                return Err(FormatError::IndexOutOfBounds {
                    page,
                    offset: entry.offset,
                    length: entry.length,
                    file_len,
                }
                .into());
            }
        }

        Ok(Self {
            src,
            page_count,
            width,
            height,
            direction,
            metadata,
            chapters,
            index,
        })
    }

    #[inline]
    pub fn page_count(&self) -> u16 {
        self.page_count
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn direction(&self) -> ReadingDirection {
        self.direction
    }

    #[inline]
    pub fn metadata(&self) -> &ContainerMetadata {
        &self.metadata
    }

    #[inline]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[inline]
    pub fn index(&self) -> &[PageIndexEntry] {
        &self.index
    }

    /// Frame format of the container's pages, sniffed from the first
    /// frame's magic without decoding its payload.
    pub fn frame_format(&mut self) -> Result<FrameFormat, ConvertError> {
        let entry = *self
            .index
            .first()
            .ok_or(FormatError::PageOutOfRange { page: 0, pages: 0 })?;
        self.src.seek(SeekFrom::Start(entry.offset))?;
        let mut magic = [0u8; 4];
        read_exact_or(&mut self.src, &mut magic, "frame header")?;
        let magic = u32::from_le_bytes(magic);
        FrameFormat::from_magic(magic)
            .ok_or_else(|| FormatError::UnknownFrameMagic(magic).into())
    }

    /// Read one page's raw frame image (header + payload).
    pub fn frame_bytes(&mut self, page: usize) -> Result<Vec<u8>, ConvertError> {
        let entry = *self
            .index
            .get(page)
            .ok_or(FormatError::PageOutOfRange {
                page,
                pages: self.page_count as usize,
            })?;
        self.src.seek(SeekFrom::Start(entry.offset))?;
        let mut buf = vec![0u8; entry.length as usize];
        read_exact_or(&mut self.src, &mut buf, "frame data")?;
        Ok(buf)
    }

    /// Read and parse one page's frame.
    pub fn frame(&mut self, page: usize) -> Result<Frame, ConvertError> {
        Frame::from_bytes(&self.frame_bytes(page)?)
    }
}

fn read_exact_or<R: Read>(
    src: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), ConvertError> {
    src.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            FormatError::Truncated(what).into()
        } else {
            ConvertError::Io(e)
        }
    })
}

fn read_u16<R: Read>(src: &mut R, what: &'static str) -> Result<u16, ConvertError> {
    let mut buf = [0u8; 2];
    read_exact_or(src, &mut buf, what)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(src: &mut R, what: &'static str) -> Result<u32, ConvertError> {
    let mut buf = [0u8; 4];
    read_exact_or(src, &mut buf, what)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(src: &mut R, what: &'static str) -> Result<u64, ConvertError> {
    let mut buf = [0u8; 8];
    read_exact_or(src, &mut buf, what)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_string<R: Read>(src: &mut R, what: &'static str) -> Result<String, ConvertError> {
    let len = read_u16(src, what)?;
    let mut buf = vec![0u8; len as usize];
    read_exact_or(src, &mut buf, what)?;
    // Lossy: metadata is descriptive, a mangled byte should not brick the
    // whole book.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eink_quant::LevelImage;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn test_frame(seed: u8) -> Frame {
        let data: Vec<u8> = (0..4 * 6).map(|i| ((i + seed as usize) % 4) as u8).collect();
        let levels = LevelImage::new(4, 6, 4, data).unwrap();
        Frame::encode(&levels, FrameFormat::Gray).unwrap()
    }

    fn test_writer() -> ContainerWriter {
        ContainerWriter::new(4, 6)
            .direction(ReadingDirection::RightToLeft)
            .metadata(ContainerMetadata {
                title: "Test Book".to_string(),
                author: "A. Author".to_string(),
                publisher: "Pub".to_string(),
                language: "ja-JP".to_string(),
                created: 1_700_000_000,
            })
            .chapters(vec![
                Chapter {
                    name: "One".to_string(),
                    start_page: 0,
                    end_page: 0,
                },
                Chapter {
                    name: "Two".to_string(),
                    start_page: 1,
                    end_page: 2,
                },
            ])
    }

    fn test_container() -> Vec<u8> {
        let frames = vec![test_frame(0), test_frame(1), test_frame(2)];
        test_writer().to_bytes(&frames).unwrap()
    }

    #[test]
    fn test_round_trip_sections() {
        let bytes = test_container();
        let mut reader = ContainerReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.page_count(), 3);
        assert_eq!(reader.width(), 4);
        assert_eq!(reader.height(), 6);
        assert_eq!(reader.direction(), ReadingDirection::RightToLeft);
        assert_eq!(reader.metadata().title, "Test Book");
        assert_eq!(reader.metadata().author, "A. Author");
        assert_eq!(reader.metadata().publisher, "Pub");
        assert_eq!(reader.metadata().language, "ja-JP");
        assert_eq!(reader.metadata().created, 1_700_000_000);
        assert_eq!(reader.chapters().len(), 2);
        assert_eq!(reader.chapters()[1].name, "Two");
        assert_eq!(reader.chapters()[1].start_page, 1);
        assert_eq!(reader.chapters()[1].end_page, 2);
        assert_eq!(reader.frame_format().unwrap(), FrameFormat::Gray);

        for page in 0..3 {
            let frame = reader.frame(page).unwrap();
            assert_eq!(frame, test_frame(page as u8));
        }
    }

    #[test]
    fn test_random_access_out_of_order() {
        let bytes = test_container();
        let mut reader = ContainerReader::new(Cursor::new(bytes)).unwrap();
        // Last page first; the index is the only lookup.
        assert_eq!(reader.frame(2).unwrap(), test_frame(2));
        assert_eq!(reader.frame(0).unwrap(), test_frame(0));
    }

    #[test]
    fn test_write_is_deterministic() {
        assert_eq!(test_container(), test_container());
    }

    #[test]
    fn test_write_rejects_empty_frame_list() {
        let err = test_writer().to_bytes(&[]).unwrap_err();
        assert!(matches!(err, ConvertError::NoFrames));
    }

    #[test]
    fn test_write_rejects_mixed_formats() {
        let mono_levels = LevelImage::new(4, 6, 2, vec![0; 24]).unwrap();
        let mono = Frame::encode(&mono_levels, FrameFormat::Mono).unwrap();
        let err = test_writer().to_bytes(&[test_frame(0), mono]).unwrap_err();
        assert!(matches!(err, ConvertError::MixedFrameFormats));
    }

    #[test]
    fn test_write_rejects_frame_size_mismatch() {
        let other = LevelImage::new(2, 2, 4, vec![0; 4]).unwrap();
        let small = Frame::encode(&other, FrameFormat::Gray).unwrap();
        let err = test_writer().to_bytes(&[small]).unwrap_err();
        assert!(matches!(err, ConvertError::FrameSizeMismatch { page: 0, .. }));
    }

    #[test]
    fn test_write_rejects_chapter_beyond_page_run() {
        let writer = ContainerWriter::new(4, 6).chapters(vec![Chapter {
            name: "Late".to_string(),
            start_page: 1,
            end_page: 5,
        }]);
        let err = writer.to_bytes(&[test_frame(0), test_frame(1)]).unwrap_err();
        assert!(matches!(err, ConvertError::ChapterOutOfRange { .. }));
    }

    #[test]
    fn test_write_rejects_inverted_chapter_range() {
        let writer = ContainerWriter::new(4, 6).chapters(vec![Chapter {
            name: "Backwards".to_string(),
            start_page: 1,
            end_page: 0,
        }]);
        let err = writer.to_bytes(&[test_frame(0), test_frame(1)]).unwrap_err();
        assert!(matches!(err, ConvertError::ChapterOutOfRange { .. }));
    }

    #[test]
    fn test_write_rejects_over_long_chapter_name() {
        let writer = ContainerWriter::new(4, 6).chapters(vec![Chapter {
            name: "x".repeat(80),
            start_page: 0,
            end_page: 0,
        }]);
        let err = writer.to_bytes(&[test_frame(0)]).unwrap_err();
        assert!(matches!(err, ConvertError::ChapterNameTooLong { .. }));
    }

    #[test]
    fn test_read_rejects_bad_magic() {
        let mut bytes = test_container();
        bytes[0] ^= 0xFF;
        let err = ContainerReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_read_rejects_unknown_version() {
        let mut bytes = test_container();
        bytes[4] = 0x99;
        let err = ContainerReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_read_rejects_invalid_direction() {
        let mut bytes = test_container();
        bytes[12] = 7;
        let err = ContainerReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::InvalidDirection(7))
        ));
    }

    #[test]
    fn test_read_rejects_truncated_header() {
        let bytes = test_container();
        let err = ContainerReader::new(Cursor::new(&bytes[..8])).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::Truncated("container header"))
        ));
    }

    #[test]
    fn test_read_rejects_truncated_index() {
        // Cut the file inside the page index: declared page count then
        // disagrees with the entries actually present.
        let frames = vec![test_frame(0), test_frame(1)];
        let bytes = test_writer()
            .chapters(Vec::new())
            .to_bytes(&frames)
            .unwrap();
        let index_start = bytes.len()
            - frames.iter().map(|f| f.to_bytes().len()).sum::<usize>()
            - 2 * INDEX_ENTRY_SIZE;
        let err = ContainerReader::new(Cursor::new(&bytes[..index_start + INDEX_ENTRY_SIZE]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::Truncated("page index"))
        ));
    }

    #[test]
    fn test_read_rejects_index_entry_beyond_file() {
        let frames = vec![test_frame(0)];
        let mut bytes = ContainerWriter::new(4, 6).to_bytes(&frames).unwrap();
        // Single page: its index entry sits right before the frame data.
        let frame_len = frames[0].to_bytes().len();
        let entry_start = bytes.len() - frame_len - INDEX_ENTRY_SIZE;
        // Inflate the declared length so offset + length passes EOF.
        let length_pos = entry_start + 8;
        bytes[length_pos..length_pos + 4]
            .copy_from_slice(&((frame_len as u32) + 1000).to_le_bytes());

        let err = ContainerReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::IndexOutOfBounds { page: 0, .. })
        ));
    }

    #[test]
    fn test_read_rejects_chapter_range_beyond_pages() {
        let frames = vec![test_frame(0)];
        let writer = ContainerWriter::new(4, 6).chapters(vec![Chapter {
            name: "A".to_string(),
            start_page: 0,
            end_page: 0,
        }]);
        let mut bytes = writer.to_bytes(&frames).unwrap();
        // Chapter section: header(13) + default metadata (three empty
        // fields, "en-US", created: 3*2 + 7 + 4 = 17) + count(2) +
        // name_len(2) + "A"(1) + start(2), then end(2).
        let end_pos = HEADER_SIZE + 17 + 2 + 2 + 1 + 2;
        bytes[end_pos..end_pos + 2].copy_from_slice(&5u16.to_le_bytes());

        let err = ContainerReader::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::ChapterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_frame_request_out_of_range() {
        let bytes = test_container();
        let mut reader = ContainerReader::new(Cursor::new(bytes)).unwrap();
        let err = reader.frame(3).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::PageOutOfRange { page: 3, pages: 3 })
        ));
    }

    #[test]
    fn test_empty_metadata_and_chapters() {
        let frames = vec![test_frame(0)];
        let bytes = ContainerWriter::new(4, 6).to_bytes(&frames).unwrap();
        let reader = ContainerReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.metadata().title, "");
        assert_eq!(reader.metadata().language, "en-US");
        assert!(reader.chapters().is_empty());
    }
}
