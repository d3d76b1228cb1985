#![forbid(unsafe_code)]

//! SVG markup → [`svgmetrics_core::Document`].
//!
//! Parsing uses `roxmltree`; attribute micro-syntaxes (lengths, transforms, path data, ...)
//! use `svgtypes`. Style resolution covers presentation attributes, inline `style` and
//! inheritance; stylesheets and selectors are not supported.

mod loader;
pub mod style;
pub mod text;
mod values;

pub use text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};

use std::sync::Arc;
use svgmetrics_core::{Document, Dpi};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Deepest element nesting accepted by [`load_str`], the root counting as 1.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("root element is `{found}`, expected an SVG `svg` element")]
    NotSvg { found: String },
    #[error("elements nested more than {limit} deep")]
    TooDeep { limit: usize },
    #[error(transparent)]
    Core(#[from] svgmetrics_core::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Clone)]
pub struct LoadOptions {
    /// Converts absolute font sizes (`pt`, `mm`, ...) to user units.
    pub dpi: Dpi,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            dpi: Dpi::default(),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOptions")
            .field("dpi", &self.dpi)
            .finish_non_exhaustive()
    }
}

impl LoadOptions {
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.text_measurer = measurer;
        self
    }

    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Parses an SVG document. Malformed attribute values are logged and ignored; only broken XML
/// or a non-SVG root element fail.
pub fn load_str(text: &str, options: &LoadOptions) -> Result<Document> {
    let mut parsing = roxmltree::ParsingOptions::default();
    parsing.allow_dtd = true;
    let xml = roxmltree::Document::parse_with_options(text, parsing)?;
    loader::load(&xml, options)
}
