//! Chapter derivation from document structure.
//!
//! Heading entries extracted by the renderer become the container's chapter
//! table: entries at the configured heading level open a chapter, and each
//! chapter runs until the page before the next same-level entry (or the end
//! of the book). Malformed structure degrades to warnings, never failures:
//! chapters are optional container content.

use std::fmt;

/// Chapter names are capped at 79 UTF-8 bytes by the reader firmware's
/// fixed-width chapter records.
pub const MAX_CHAPTER_NAME_BYTES: usize = 79;

/// One heading from the source document's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// Heading depth, 1 = top level.
    pub level: u32,
    /// 1-based page the heading appears on.
    pub page: u32,
}

impl TocEntry {
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            level,
            page,
        }
    }
}

/// A derived chapter: name plus an inclusive 0-based page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub name: String,
    pub start_page: u16,
    pub end_page: u16,
}

/// Non-fatal structural problems found while deriving chapters.
///
/// Recorded and logged, but processing always continues with the
/// best-effort chapter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralWarning {
    /// The source provided no structure entries at all.
    EmptyToc,
    /// Entries exist, but none match the configured chapter level.
    NoMatchingLevel { chapter_level: u32 },
    /// An entry's page number precedes its predecessor's. Source order is
    /// authoritative, so entries are kept in place rather than re-sorted.
    NonMonotonicPages { title: String, page: u32 },
    /// An entry points outside the page run and was dropped.
    PageOutOfRange { title: String, page: u32 },
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralWarning::EmptyToc => write!(f, "source has no structure entries"),
            StructuralWarning::NoMatchingLevel { chapter_level } => {
                write!(f, "no structure entries at chapter level {}", chapter_level)
            }
            StructuralWarning::NonMonotonicPages { title, page } => {
                write!(
                    f,
                    "entry '{}' (page {}) is out of page order; keeping source order",
                    title, page
                )
            }
            StructuralWarning::PageOutOfRange { title, page } => {
                write!(f, "entry '{}' points at missing page {}", title, page)
            }
        }
    }
}

/// Chapter list plus whatever structural warnings derivation raised.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DerivedChapters {
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<StructuralWarning>,
}

/// Derive the chapter table from structure entries.
///
/// Entries whose `level` equals `chapter_level` each open a chapter at
/// their page; the chapter ends on the page before the next same-level
/// entry, or on the last page. Two entries on the same page produce a
/// single-page chapter (`start_page == end_page`) with the next chapter
/// starting on that same page.
pub fn derive_chapters(
    entries: &[TocEntry],
    total_pages: u16,
    chapter_level: u32,
) -> DerivedChapters {
    let mut warnings = Vec::new();

    if entries.is_empty() {
        warnings.push(StructuralWarning::EmptyToc);
        return DerivedChapters {
            chapters: Vec::new(),
            warnings,
        };
    }

    let matching: Vec<&TocEntry> = entries
        .iter()
        .filter(|e| e.level == chapter_level)
        .collect();
    if matching.is_empty() {
        warnings.push(StructuralWarning::NoMatchingLevel { chapter_level });
        return DerivedChapters {
            chapters: Vec::new(),
            warnings,
        };
    }

    let mut filtered = Vec::with_capacity(matching.len());
    for entry in matching {
        if entry.page < 1 || entry.page > total_pages as u32 {
            warnings.push(StructuralWarning::PageOutOfRange {
                title: entry.title.clone(),
                page: entry.page,
            });
            continue;
        }
        filtered.push(entry);
    }

    for pair in filtered.windows(2) {
        if pair[1].page < pair[0].page {
            warnings.push(StructuralWarning::NonMonotonicPages {
                title: pair[1].title.clone(),
                page: pair[1].page,
            });
        }
    }

    let mut chapters = Vec::with_capacity(filtered.len());
    for (i, entry) in filtered.iter().enumerate() {
        let start = (entry.page - 1) as u16;
        let end = match filtered.get(i + 1) {
            // Runs until the page before the next chapter opens; clamped up
            // so a same-page (or out-of-order) successor still leaves a
            // single-page chapter.
            Some(next) => ((next.page as i64 - 2).max(start as i64)) as u16,
            None => total_pages - 1,
        };
        chapters.push(Chapter {
            name: truncate_name(&entry.title),
            start_page: start,
            end_page: end,
        });
    }

    DerivedChapters { chapters, warnings }
}

/// Remap structure entries into a page selection.
///
/// `selected` holds the kept 1-based source pages, in presentation order.
/// Each entry's page becomes its position within the selection; entries on
/// pages outside the selection are dropped. Boundary pages are part of the
/// selection, so entries on them survive.
pub fn remap_into_selection(entries: &[TocEntry], selected: &[u32]) -> Vec<TocEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            selected
                .iter()
                .position(|&p| p == entry.page)
                .map(|i| TocEntry {
                    page: i as u32 + 1,
                    ..entry.clone()
                })
        })
        .collect()
}

/// Truncate a chapter name to at most 79 UTF-8 bytes without splitting a
/// code point.
pub fn truncate_name(title: &str) -> String {
    if title.len() <= MAX_CHAPTER_NAME_BYTES {
        return title.to_string();
    }
    let mut end = MAX_CHAPTER_NAME_BYTES;
    while !title.is_char_boundary(end) {
        end -= 1;
    }
    title[..end].to_string()
}
