#![forbid(unsafe_code)]

//! Intrinsic dimensions and ink/logical geometry of SVG documents.
//!
//! ```text
//! identifier → node → root-to-node transform → subtree boxes → document pixels
//! ```
//!
//! All queries borrow the [`Document`] immutably and keep their working state local, so a
//! document can be measured from several threads at once.

pub mod accumulate;
pub mod geometry;
pub mod measurer;
pub mod options;
pub mod sizing;

pub use accumulate::accumulate;
pub use geometry::BoundingBox;
pub use measurer::{Geometry, Measurer, Position};
pub use options::{MeasureOptions, PercentSizing, ViewBoxSizing};
pub use sizing::{Dimensions, DocumentSize, SizeSource};
pub use svgmetrics_core;

use svgmetrics_core::Document;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("no element with id `{id}`")]
    UnknownElement { id: String },
    #[error("`{id}` is not a valid element id")]
    InvalidId { id: String },
    #[error("more than {limit} referenced elements; the document is too complex")]
    LimitExceeded { limit: usize },
    #[error("elements nested more than {limit} deep")]
    TooDeep { limit: usize },
    #[error(transparent)]
    Core(#[from] svgmetrics_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Intrinsic size before rounding, with default options.
pub fn document_size(document: &Document) -> Result<DocumentSize> {
    Measurer::new(document).document_size()
}

pub fn resolve_document_size(document: &Document, options: &MeasureOptions) -> Result<DocumentSize> {
    Measurer::new(document).with_options(*options).document_size()
}

pub fn document_dimensions(document: &Document) -> Result<Dimensions> {
    Measurer::new(document).document_dimensions()
}

pub fn has_element(document: &Document, id: &str) -> bool {
    Measurer::new(document).has_element(id)
}

pub fn element_position(document: &Document, id: &str) -> Result<Position> {
    Measurer::new(document).element_position(id)
}

pub fn element_dimensions(document: &Document, id: &str) -> Result<Dimensions> {
    Measurer::new(document).element_dimensions(id)
}

pub fn geometry(document: &Document, id: Option<&str>) -> Result<Geometry> {
    Measurer::new(document).geometry(id)
}
