//! Page selection and validation.
//!
//! A [`PageSelection`] is the list of pages a user picked from a document,
//! in the order they picked them. Extract uses it positively (pages to keep,
//! in selection order) and delete negatively (pages to drop, original order
//! preserved).
//!
//! Selections can be written as text:
//! - "3" - single page
//! - "4,1" - pages 4 then 1
//! - "2-5" - pages 2 through 5 (inclusive)
//! - "6-8,1" - combination of ranges and single pages

use std::collections::HashSet;
use std::ops::RangeInclusive;

use anyhow::{Context, bail};

use crate::error::{PdfSmithError, Result};

/// Highest page number accepted in a selection string.
pub const MAX_PAGE_NUMBER: u32 = 100_000;

/// Ordered set of 1-based page numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    pages: Vec<u32>,
}

impl PageSelection {
    /// Build a selection, keeping the first occurrence of each page.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfsmith::selection::PageSelection;
    ///
    /// let selection = PageSelection::new([4, 1, 4]);
    /// assert_eq!(selection.pages(), &[4, 1]);
    /// ```
    pub fn new(pages: impl IntoIterator<Item = u32>) -> Self {
        let mut seen = HashSet::new();
        let pages = pages.into_iter().filter(|&page| seen.insert(page)).collect();
        Self { pages }
    }

    /// An empty selection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a page selection string.
    ///
    /// Blank input yields an empty selection; the operation receiving it
    /// reports that no pages were chosen.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::InvalidSelection`] for zero, non-numeric or
    /// descending entries, and for page numbers above [`MAX_PAGE_NUMBER`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfsmith::selection::PageSelection;
    ///
    /// let selection = PageSelection::parse("6-8,1").unwrap();
    /// assert_eq!(selection.pages(), &[6, 7, 8, 1]);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        parse_pages(s)
            .map(Self::new)
            .map_err(|e| PdfSmithError::invalid_selection(s, e.to_string()))
    }

    /// Selected pages in selection order.
    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check if a page number is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    /// Validate the selection against a document with `total` pages.
    ///
    /// # Errors
    ///
    /// - [`PdfSmithError::NoPagesChosen`] if the selection is empty
    /// - [`PdfSmithError::PageOutOfRange`] if any page is outside `1..=total`
    pub fn resolve(&self, total: u32) -> Result<&[u32]> {
        if self.pages.is_empty() {
            return Err(PdfSmithError::NoPagesChosen);
        }

        if let Some(&page) = self.pages.iter().find(|&&p| p == 0 || p > total) {
            return Err(PdfSmithError::PageOutOfRange { page, total });
        }

        Ok(&self.pages)
    }

    /// The pages a selector offers for a document with `total` pages.
    pub fn choices(total: u32) -> RangeInclusive<u32> {
        1..=total
    }
}

impl FromIterator<u32> for PageSelection {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn parse_pages(s: &str) -> anyhow::Result<Vec<u32>> {
    let mut pages = Vec::new();

    if s.trim().is_empty() {
        return Ok(pages);
    }

    for part in s.split(',') {
        let part = part.trim();

        if part.is_empty() {
            bail!("Empty entry between commas");
        }

        if part.contains('-') {
            let bounds: Vec<&str> = part.split('-').collect();
            if bounds.len() != 2 {
                bail!("Invalid range format: {part}. Expected format like '1-5'");
            }

            let start: u32 = bounds[0]
                .trim()
                .parse()
                .with_context(|| format!("Invalid page number: {}", bounds[0]))?;
            let end: u32 = bounds[1]
                .trim()
                .parse()
                .with_context(|| format!("Invalid page number: {}", bounds[1]))?;

            if start == 0 || end == 0 {
                bail!("Page numbers must be positive (1-indexed)");
            }

            if end > MAX_PAGE_NUMBER {
                bail!("Page {end} exceeds the limit of {MAX_PAGE_NUMBER}");
            }

            if start > end {
                bail!("Invalid range {start}-{end}: start page must not exceed end page");
            }

            pages.extend(start..=end);
        } else {
            let page: u32 = part
                .parse()
                .with_context(|| format!("Invalid page number: {part}"))?;

            if page == 0 {
                bail!("Page numbers must be positive (1-indexed)");
            }

            if page > MAX_PAGE_NUMBER {
                bail!("Page {page} exceeds the limit of {MAX_PAGE_NUMBER}");
            }

            pages.push(page);
        }
    }

    Ok(pages)
}
