//! Collaborator interfaces.
//!
//! The engine consumes fully materialized page content from an external
//! text/graphics extractor. Implementations of these traits are the only
//! blocking boundary in the system; everything downstream is pure
//! computation scoped to one page-processing call.

use crate::error::Result;
use crate::geometry::BBox;
use crate::table::Char;

/// Source of extracted page content.
///
/// Page indices are 0-based. An out-of-range index is an
/// [`LayoutError::InvalidPage`](crate::LayoutError::InvalidPage) error; a
/// page that exists but cannot be extracted reports
/// [`LayoutError::Extraction`](crate::LayoutError::Extraction) (or
/// [`LayoutError::EmptyPage`](crate::LayoutError::EmptyPage) when the
/// source can tell the page is unreadable), which batch processing
/// degrades to an empty result for that page only.
pub trait PageSource {
    /// Number of pages available from this source.
    fn page_count(&self) -> usize;

    /// Bounding box of one page in top-left coordinates.
    fn page_bbox(&self, page: usize) -> Result<BBox>;

    /// Ordered characters (reading order) for one page.
    fn page_chars(&self, page: usize) -> Result<Vec<Char>>;

    /// Axis-aligned vector-path rectangles recorded on one page, if any.
    ///
    /// Used as the edge source for the `lines` strategy. Sources without
    /// path geometry keep the default and the finder falls back to
    /// text-derived edges.
    fn vector_paths(&self, _page: usize) -> Result<Vec<BBox>> {
        Ok(Vec::new())
    }
}

/// Callback used by the exporter to fetch the text under a rectangle.
///
/// The crate ships [`CharTextProvider`](crate::table::CharTextProvider),
/// which resolves text from a page's own characters; hosts with richer
/// extraction (style runs, ligature handling) can substitute their own.
pub trait TextProvider {
    fn text_under_rect(&self, bbox: &BBox) -> String;
}
