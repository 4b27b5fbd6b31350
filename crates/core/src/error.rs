//! Error types for the pagegrid layout inference library.

use thiserror::Error;

/// Primary error type for layout inference operations.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid page index: {0}")]
    InvalidPage(usize),

    #[error("page {0} has no extractable content")]
    EmptyPage(usize),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("working buffer overflow: {count} {what} exceeds limit {limit}")]
    BufferLimit {
        what: &'static str,
        count: usize,
        limit: usize,
    },
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
