//! Resolved presentation properties.
//!
//! Values arrive already cascaded from the collaborator that built the document; nothing in
//! this module performs inheritance.

use crate::length::Length;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    None,
    /// Any color, including `currentColor`.
    Solid,
    /// `url(#id)` paint server. Counts as painted for extents.
    Server(String),
}

impl Paint {
    pub fn is_painted(&self) -> bool {
        !matches!(self, Paint::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: Length,
    pub stroke_line_join: LineJoin,
    pub stroke_line_cap: LineCap,
    pub stroke_miter_limit: f64,
    /// Computed font size in user units, when known.
    pub font_size: Option<f64>,
    /// `display: none`.
    pub display_none: bool,
    pub visibility: Visibility,
    pub marker_start: Option<String>,
    pub marker_mid: Option<String>,
    pub marker_end: Option<String>,
    pub filter: Option<String>,
}

impl Style {
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn has_markers(&self) -> bool {
        self.marker_start.is_some() || self.marker_mid.is_some() || self.marker_end.is_some()
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Paint::Solid,
            stroke: Paint::None,
            stroke_width: Length::px(1.0),
            stroke_line_join: LineJoin::default(),
            stroke_line_cap: LineCap::default(),
            stroke_miter_limit: 4.0,
            font_size: None,
            display_none: false,
            visibility: Visibility::default(),
            marker_start: None,
            marker_mid: None,
            marker_end: None,
            filter: None,
        }
    }
}
