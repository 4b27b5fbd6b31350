//! pagegrid - layout and table structure inference for extracted page text.
//!
//! This crate infers logical page structure (multi-column layout and table
//! grids) from the geometric output of a document text/graphics extractor.
//! It never opens or renders documents itself; a collaborator hands it
//! ordered characters with bounding boxes (plus, optionally, vector-path
//! rectangles) and the crate derives tables, columns and table regions
//! from that geometry alone.
//!
//! Two independent pipelines share the same geometric primitives:
//!
//! - the table finder ([`table`]): word assembly, edge synthesis, edge
//!   snapping/joining, intersection lattice, cell construction and
//!   table/row/header assembly, with grid and markdown export;
//! - the column detector ([`columns`]): vertical-projection column
//!   segmentation, text-vs-table block classification, adaptive multi-line
//!   merging and table-region clustering.

pub mod columns;
pub mod error;
pub mod geometry;
pub mod page;
pub mod table;

pub use error::{LayoutError, Result};
