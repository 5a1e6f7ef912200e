//! Page selection parsing for multi-page sources.
//!
//! Sources accept a trailing page selection, `book.xtc:1-4,7,10-`. The
//! grammar: `N` (single page), `N-M` (inclusive range), `N-` (to the end),
//! `-N` (first N pages), comma-joined. Duplicates and out-of-range pages
//! are dropped; selection order is output order.

use crate::error::ConvertError;

/// Split a source argument into path and optional page selection.
///
/// The split is on the last colon, and only when what follows looks like a
/// page selection (contains a digit), so Windows drive paths like
/// `C:\book.pdf` pass through untouched.
pub fn split_page_spec(source: &str) -> (&str, Option<&str>) {
    if let Some(pos) = source.rfind(':') {
        let spec = &source[pos + 1..];
        if !spec.is_empty() && spec.chars().any(|c| c.is_ascii_digit()) {
            return (&source[..pos], Some(spec));
        }
    }
    (source, None)
}

/// Expand a page selection into an ordered list of 1-based page numbers.
///
/// Out-of-range pages and duplicates are dropped silently (the selection is
/// a filter, not an assertion); a selection that matches nothing at all is
/// an error, as is any unparsable number.
pub fn parse_page_range(spec: &str, total_pages: u32) -> Result<Vec<u32>, ConvertError> {
    let parse = |s: &str| -> Result<u32, ConvertError> {
        s.parse::<u32>()
            .map_err(|_| ConvertError::InvalidPageSpec(spec.to_string()))
    };

    let mut pages = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(ConvertError::InvalidPageSpec(spec.to_string()));
        }

        if let Some(rest) = part.strip_prefix('-') {
            // "-N": the first N pages
            let end = parse(rest)?;
            pages.extend(1..=end);
        } else if let Some(dash) = part.find('-') {
            // "N-M" or "N-"
            let start = parse(&part[..dash])?;
            let rest = &part[dash + 1..];
            let end = if rest.is_empty() {
                total_pages
            } else {
                parse(rest)?
            };
            pages.extend(start..=end);
        } else {
            pages.push(parse(part)?);
        }
    }

    // Drop duplicates and out-of-range pages, preserving order.
    let mut seen = vec![false; total_pages as usize + 1];
    let mut selected = Vec::new();
    for page in pages {
        if page >= 1 && page <= total_pages && !seen[page as usize] {
            seen[page as usize] = true;
            selected.push(page);
        }
    }

    if selected.is_empty() {
        return Err(ConvertError::EmptyPageSelection {
            spec: spec.to_string(),
            pages: total_pages,
        });
    }
    Ok(selected)
}
