use crate::document::NodeId;
use crate::geom::Transform;
use crate::length::Length;
use crate::shape::Shape;
use crate::style::Style;
use crate::viewport::{AspectRatio, ViewBox};
use serde::{Deserialize, Serialize};

/// Attributes shared by elements that establish a new viewport (`svg`).
///
/// `None` width/height mean the attribute was not specified; the resolver decides how to
/// fill them in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportElement {
    pub x: Length,
    pub y: Length,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub view_box: Option<ViewBox>,
    pub aspect: AspectRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Layout extents of a run of text, produced by whatever measured it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMetrics {
    pub advance: f64,
    pub ascent: f64,
    pub descent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Text {
    pub x: Length,
    pub y: Length,
    pub anchor: TextAnchor,
    pub content: String,
    pub metrics: TextMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Use {
    /// Identifier of the referenced element, without the leading `#`.
    pub href: String,
    pub x: Length,
    pub y: Length,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarkerOrient {
    Auto,
    AutoStartReverse,
    /// Fixed angle in degrees.
    Angle(f64),
}

impl Default for MarkerOrient {
    fn default() -> Self {
        MarkerOrient::Angle(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerUnits {
    #[default]
    StrokeWidth,
    UserSpaceOnUse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub ref_x: Length,
    pub ref_y: Length,
    pub width: Length,
    pub height: Length,
    pub view_box: Option<ViewBox>,
    pub aspect: AspectRatio,
    pub orient: MarkerOrient,
    pub units: MarkerUnits,
    /// Clip content to the marker viewport (`overflow` other than `visible`).
    pub clip: bool,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            ref_x: Length::zero(),
            ref_y: Length::zero(),
            width: Length::px(3.0),
            height: Length::px(3.0),
            view_box: None,
            aspect: AspectRatio::default(),
            orient: MarkerOrient::default(),
            units: MarkerUnits::default(),
            clip: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordUnits {
    #[default]
    ObjectBoundingBox,
    UserSpaceOnUse,
}

/// Filter region. Under `ObjectBoundingBox`, plain numbers and percentages are fractions of
/// the filtered element's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub units: CoordUnits,
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            units: CoordUnits::ObjectBoundingBox,
            x: Length::percent(-10.0),
            y: Length::percent(-10.0),
            width: Length::percent(120.0),
            height: Length::percent(120.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Svg(ViewportElement),
    Group,
    Shape(Shape),
    Text(Text),
    Image {
        x: Length,
        y: Length,
        width: Length,
        height: Length,
    },
    Use(Use),
    Symbol {
        view_box: Option<ViewBox>,
        aspect: AspectRatio,
    },
    Marker(Marker),
    Filter(Filter),
    /// `defs`, clip paths, masks, gradients and anything unrecognized.
    Resource,
}

impl NodeKind {
    /// Elements that are only drawn when something references them.
    pub fn is_non_rendering(&self) -> bool {
        matches!(
            self,
            NodeKind::Symbol { .. } | NodeKind::Marker(_) | NodeKind::Filter(_) | NodeKind::Resource
        )
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            NodeKind::Svg(_) => "svg",
            NodeKind::Group => "g",
            NodeKind::Shape(shape) => shape.tag_name(),
            NodeKind::Text(_) => "text",
            NodeKind::Image { .. } => "image",
            NodeKind::Use(_) => "use",
            NodeKind::Symbol { .. } => "symbol",
            NodeKind::Marker(_) => "marker",
            NodeKind::Filter(_) => "filter",
            NodeKind::Resource => "resource",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Option<String>,
    pub kind: NodeKind,
    pub transform: Transform,
    pub style: Style,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: None,
            kind,
            transform: Transform::identity(),
            style: Style::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// `tag#id` or just `tag`, for log messages and diagnostics.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{}#{id}", self.kind.tag_name()),
            None => self.kind.tag_name().to_string(),
        }
    }
}
