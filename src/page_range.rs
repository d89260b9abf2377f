use crate::error::PdfError;
use std::fmt;
use std::ops::RangeInclusive;

/// An inclusive span of 1-based page numbers, already checked against the
/// page count of the document it was parsed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parse a comma-separated list of ranges like "1-3,5,8-10" for a document
/// with `total_pages` pages.
///
/// Ranges come back in the order they were written, without sorting or
/// deduplication, so each token maps to exactly one output. The first token
/// that fails to parse or validate aborts the whole expression.
pub fn parse_ranges(expr: &str, total_pages: u32) -> Result<Vec<PageRange>, PdfError> {
    if expr.trim().is_empty() {
        return Err(PdfError::EmptyRanges);
    }

    expr.split(',')
        .map(|token| parse_token(token.trim(), total_pages))
        .collect()
}

fn parse_token(token: &str, total_pages: u32) -> Result<PageRange, PdfError> {
    if token.matches('-').count() > 1 {
        return Err(PdfError::MalformedToken {
            token: token.to_string(),
        });
    }

    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (
            parse_page(start, token, total_pages)?,
            parse_page(end, token, total_pages)?,
        ),
        None => {
            let page = parse_page(token, token, total_pages)?;
            (page, page)
        }
    };

    if start < 1 || end > i64::from(total_pages) || start > end {
        return Err(PdfError::InvalidRange {
            token: token.to_string(),
            total_pages,
        });
    }

    // Bounds checked above, so both sides fit in u32.
    Ok(PageRange {
        start: start as u32,
        end: end as u32,
    })
}

fn parse_page(s: &str, token: &str, total_pages: u32) -> Result<i64, PdfError> {
    let s = s.trim();
    s.parse::<i64>().map_err(|_| {
        // Well-formed but too large for i64 is still just out of bounds.
        let digits = s.strip_prefix('+').unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            PdfError::InvalidRange {
                token: token.to_string(),
                total_pages,
            }
        } else {
            PdfError::MalformedToken {
                token: token.to_string(),
            }
        }
    })
}
