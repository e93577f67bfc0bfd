//! Slicing a tall raster into fixed-size pages.
//!
//! The content image is scaled to the page width, then drawn once per page,
//! shifted further up each time so the next uncovered band shows through the
//! page. Each [`PageSlice`] records that upward shift.

use thiserror::Error;
use tracing::debug;

/// Width and height in a common unit (pixels for rasters, points for pages).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    /// ISO A4 portrait in points.
    pub const A4: Size = Size::new(595.28, 841.89);
    /// US Letter portrait in points.
    pub const LETTER: Size = Size::new(612.0, 792.0);
}

/// One output page of a paginated image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    /// Zero-based page number.
    pub index: usize,
    /// Vertical offset of the scaled image's top edge relative to the page
    /// top, in page units. Zero on the first page, negative afterwards.
    pub offset: f64,
}

/// Result of [`paginate`]: the scaled image size and one slice per page.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub scaled: Size,
    pub slices: Vec<PageSlice>,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.slices.len()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PaginateError {
    #[error("{what} must be a positive finite number, got {value}")]
    InvalidDimension { what: &'static str, value: f64 },
    #[error("content needs {pages} pages, more than the limit of {MAX_PAGES}")]
    TooManyPages { pages: f64 },
}

/// Upper bound on the pages a single export may produce.
pub const MAX_PAGES: usize = 10_000;

/// Relative slack when dividing scaled height by page height, so float
/// noise on an exact fit does not add a page.
const FIT_TOLERANCE: f64 = 1e-9;

/// Split `content` into pages of `page` size.
///
/// Always yields at least one slice. The page count is
/// `ceil(scaled_height / page.height)`; a content that fits exactly on `n`
/// pages produces `n` slices, never a trailing blank page. Slice `i` is
/// shifted up by `i` page heights.
pub fn paginate(content: Size, page: Size) -> Result<Pagination, PaginateError> {
    positive("content width", content.width)?;
    positive("page width", page.width)?;
    positive("page height", page.height)?;
    if !content.height.is_finite() || content.height < 0.0 {
        return Err(PaginateError::InvalidDimension {
            what: "content height",
            value: content.height,
        });
    }

    let scaled_height = content.height * page.width / content.width;
    let pages = (scaled_height / page.height - FIT_TOLERANCE).ceil().max(1.0);
    if !pages.is_finite() || pages > MAX_PAGES as f64 {
        return Err(PaginateError::TooManyPages { pages });
    }

    let slices: Vec<PageSlice> = (0..pages as usize)
        .map(|index| PageSlice {
            index,
            offset: -(index as f64) * page.height,
        })
        .collect();

    debug!(
        scaled_height,
        page_height = page.height,
        pages = slices.len(),
        "paginated content image"
    );

    Ok(Pagination {
        scaled: Size::new(page.width, scaled_height),
        slices,
    })
}

fn positive(what: &'static str, value: f64) -> Result<(), PaginateError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PaginateError::InvalidDimension { what, value })
    }
}
