use svgmetrics_core::geom::{Size, size};
use svgmetrics_core::length::Dpi;

/// How a root `width`/`height` percentage is resolved when there is no viewBox to refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentSizing {
    /// Use the size of the painted content.
    #[default]
    ContentInk,
    /// Take the percentage of [`MeasureOptions::default_viewport`].
    DefaultViewport,
}

/// How a root that only declares a viewBox is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewBoxSizing {
    /// One user unit per pixel.
    #[default]
    ViewBox,
    /// Use [`MeasureOptions::default_viewport`] and fit the viewBox into it.
    DefaultViewport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureOptions {
    pub dpi: Dpi,
    /// Viewport assumed when the document does not establish one (CSS replaced-element default).
    pub default_viewport: Size,
    pub percent_sizing: PercentSizing,
    pub view_box_sizing: ViewBoxSizing,
    /// Upper bound on `use` resolutions per query.
    pub max_referenced_elements: usize,
    /// Upper bound on elements being measured inside one another, `use` targets included.
    pub max_depth: usize,
}

impl MeasureOptions {
    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            dpi: Dpi::default(),
            default_viewport: size(300.0, 150.0),
            percent_sizing: PercentSizing::default(),
            view_box_sizing: ViewBoxSizing::default(),
            max_referenced_elements: 500_000,
            max_depth: 256,
        }
    }
}
