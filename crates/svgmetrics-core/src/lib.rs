#![forbid(unsafe_code)]

//! Immutable SVG element tree plus the primitives needed to measure it.
//!
//! Design goals:
//! - build once, query many times (the identifier index is complete before a `Document` exists)
//! - references between elements are identifier strings, never pointers
//! - no global state; every conversion takes its context explicitly

pub mod document;
pub mod error;
pub mod geom;
pub mod length;
pub mod node;
pub mod path;
pub mod shape;
pub mod style;
pub mod viewport;

pub use document::{Document, DocumentBuilder, NodeId};
pub use error::{Diagnostic, Error, Result};
pub use geom::{Bounds, Point, Rect, Size, Transform, union_rects};
pub use length::{Direction, Dpi, Length, LengthContext, LengthUnit};
pub use node::{
    CoordUnits, Filter, Marker, MarkerOrient, MarkerUnits, Node, NodeKind, Text, TextAnchor,
    TextMetrics, Use, ViewportElement,
};
pub use path::{PathCommand, PathData};
pub use shape::Shape;
pub use style::{LineCap, LineJoin, Paint, Style, Visibility};
pub use viewport::{Align1D, AspectRatio, FitMode, ViewBox};
