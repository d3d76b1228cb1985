use crate::style::{self, Computed, Inherited};
use crate::text::{DeterministicTextMeasurer, TextStyle};
use crate::values;
use crate::{LoadError, LoadOptions, MAX_DEPTH, Result, SVG_NS, XLINK_NS};
use svgmetrics_core::geom::Transform;
use svgmetrics_core::length::{Length, LengthContext};
use svgmetrics_core::node::{
    CoordUnits, Filter, Marker, MarkerOrient, MarkerUnits, NodeKind, Text, Use, ViewportElement,
};
use svgmetrics_core::shape::Shape;
use svgmetrics_core::viewport::{AspectRatio, ViewBox};
use svgmetrics_core::{Document, DocumentBuilder, Node, NodeId};

type XmlNode<'a, 'input> = roxmltree::Node<'a, 'input>;

pub(crate) fn load(xml: &roxmltree::Document<'_>, options: &LoadOptions) -> Result<Document> {
    let root = xml.root_element();
    if root.tag_name().namespace() != Some(SVG_NS) || root.tag_name().name() != "svg" {
        return Err(LoadError::NotSvg {
            found: root.tag_name().name().to_string(),
        });
    }

    let loader = Loader { options };
    let computed = loader.compute(root, &Inherited::default());
    let (node, _) = loader.element(root, &computed);
    let mut builder = DocumentBuilder::new(node);
    let parent = builder.root();
    loader.descendants(&mut builder, parent, root, computed.inherited)?;

    let document = builder.build();
    tracing::debug!(nodes = document.len(), "loaded svg document");
    Ok(document)
}

struct Loader<'o> {
    options: &'o LoadOptions,
}

struct Frame<'a, 'input> {
    parent: NodeId,
    inherited: Inherited,
    children: roxmltree::Children<'a, 'input>,
}

impl Loader<'_> {
    fn compute(&self, node: XmlNode<'_, '_>, parent: &Inherited) -> Computed {
        let declarations = style::declarations(node);
        let ctx = LengthContext::new(self.options.dpi);
        style::compute(parent, &declarations, &ctx, node.tag_name().name())
    }

    /// Appends the element subtree below `xml` in document order. The stack holds one frame
    /// per open element, so its length is the nesting depth.
    fn descendants(
        &self,
        builder: &mut DocumentBuilder,
        parent: NodeId,
        xml: XmlNode<'_, '_>,
        inherited: Inherited,
    ) -> Result<()> {
        let mut stack = vec![Frame {
            parent,
            inherited,
            children: xml.children(),
        }];
        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };
            if !child.is_element() {
                continue;
            }
            let computed = self.compute(child, &frame.inherited);
            let (node, descend) = self.element(child, &computed);
            let id = builder.append(frame.parent, node)?;
            if stack.len() >= MAX_DEPTH {
                return Err(LoadError::TooDeep { limit: MAX_DEPTH });
            }
            if descend {
                stack.push(Frame {
                    parent: id,
                    inherited: computed.inherited,
                    children: child.children(),
                });
            }
        }
        Ok(())
    }

    /// Builds the node for one element. The flag says whether its children are part of the
    /// tree; text content is folded into the `text` node instead.
    fn element(&self, xml: XmlNode<'_, '_>, computed: &Computed) -> (Node, bool) {
        let tag = xml.tag_name();
        let name = if tag.namespace() == Some(SVG_NS) {
            tag.name()
        } else {
            ""
        };

        let a = Attrs { xml };
        let mut descend = true;
        let kind = match name {
            "svg" => NodeKind::Svg(ViewportElement {
                x: a.length("x").unwrap_or_default(),
                y: a.length("y").unwrap_or_default(),
                width: a.size("width"),
                height: a.size("height"),
                view_box: a.view_box(),
                aspect: a.aspect(),
            }),
            "g" | "a" | "switch" => NodeKind::Group,
            "rect" => NodeKind::Shape(Shape::Rect {
                x: a.length("x").unwrap_or_default(),
                y: a.length("y").unwrap_or_default(),
                width: a.size("width").unwrap_or_default(),
                height: a.size("height").unwrap_or_default(),
                rx: a.length("rx"),
                ry: a.length("ry"),
            }),
            "circle" => NodeKind::Shape(Shape::Circle {
                cx: a.length("cx").unwrap_or_default(),
                cy: a.length("cy").unwrap_or_default(),
                r: a.size("r").unwrap_or_default(),
            }),
            "ellipse" => NodeKind::Shape(Shape::Ellipse {
                cx: a.length("cx").unwrap_or_default(),
                cy: a.length("cy").unwrap_or_default(),
                rx: a.length("rx"),
                ry: a.length("ry"),
            }),
            "line" => NodeKind::Shape(Shape::Line {
                x1: a.length("x1").unwrap_or_default(),
                y1: a.length("y1").unwrap_or_default(),
                x2: a.length("x2").unwrap_or_default(),
                y2: a.length("y2").unwrap_or_default(),
            }),
            "polyline" => NodeKind::Shape(Shape::Polyline(a.points())),
            "polygon" => NodeKind::Shape(Shape::Polygon(a.points())),
            "path" => NodeKind::Shape(Shape::Path(a.path())),
            "text" => {
                descend = false;
                NodeKind::Text(self.text(xml, &a, computed))
            }
            "image" => NodeKind::Image {
                x: a.length("x").unwrap_or_default(),
                y: a.length("y").unwrap_or_default(),
                width: a.size("width").unwrap_or_default(),
                height: a.size("height").unwrap_or_default(),
            },
            "use" => match a.href() {
                Some(href) => NodeKind::Use(Use {
                    href,
                    x: a.length("x").unwrap_or_default(),
                    y: a.length("y").unwrap_or_default(),
                    width: a.size("width"),
                    height: a.size("height"),
                }),
                None => {
                    tracing::warn!(element = %a.label(), "`use` without a local reference");
                    NodeKind::Resource
                }
            },
            "symbol" => NodeKind::Symbol {
                view_box: a.view_box(),
                aspect: a.aspect(),
            },
            "marker" => NodeKind::Marker(Marker {
                ref_x: a.length("refX").unwrap_or_default(),
                ref_y: a.length("refY").unwrap_or_default(),
                width: a.length("markerWidth").unwrap_or(Length::px(3.0)),
                height: a.length("markerHeight").unwrap_or(Length::px(3.0)),
                view_box: a.view_box(),
                aspect: a.aspect(),
                orient: a.orient(),
                units: match a.get("markerUnits") {
                    Some("userSpaceOnUse") => MarkerUnits::UserSpaceOnUse,
                    _ => MarkerUnits::StrokeWidth,
                },
                clip: !computed.overflow_visible,
            }),
            "filter" => {
                let defaults = Filter::default();
                NodeKind::Filter(Filter {
                    units: match a.get("filterUnits") {
                        Some("userSpaceOnUse") => CoordUnits::UserSpaceOnUse,
                        _ => CoordUnits::ObjectBoundingBox,
                    },
                    x: a.length("x").unwrap_or(defaults.x),
                    y: a.length("y").unwrap_or(defaults.y),
                    width: a.length("width").unwrap_or(defaults.width),
                    height: a.length("height").unwrap_or(defaults.height),
                })
            }
            _ => NodeKind::Resource,
        };

        let mut node = Node::new(kind)
            .with_transform(a.transform())
            .with_style(computed.to_style());
        if let Some(id) = a.get("id").filter(|id| !id.is_empty()) {
            node = node.with_id(id);
        }
        (node, descend)
    }

    fn text(&self, xml: XmlNode<'_, '_>, a: &Attrs<'_, '_>, computed: &Computed) -> Text {
        let raw: String = xml
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        let content = DeterministicTextMeasurer::normalized_text(&raw);

        let i = &computed.inherited;
        let style = TextStyle {
            font_family: i.font_family.clone(),
            font_size: i.font_size,
            font_weight: i.font_weight.clone(),
            letter_spacing: i.letter_spacing,
        };
        let metrics = self.options.text_measurer.measure(&content, &style);

        Text {
            x: a.first_length("x"),
            y: a.first_length("y"),
            anchor: i.text_anchor,
            content,
            metrics,
        }
    }
}

/// Attribute access that logs values it has to ignore.
struct Attrs<'a, 'input> {
    xml: XmlNode<'a, 'input>,
}

impl<'a> Attrs<'a, '_> {
    fn get(&self, name: &str) -> Option<&'a str> {
        self.xml.attribute(name)
    }

    fn label(&self) -> String {
        match self.get("id") {
            Some(id) => format!("{}#{id}", self.xml.tag_name().name()),
            None => self.xml.tag_name().name().to_string(),
        }
    }

    fn parse<T>(&self, name: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let value = self.get(name)?;
        let parsed = parse(value);
        if parsed.is_none() {
            tracing::warn!(
                element = %self.label(),
                attribute = name,
                value,
                "ignoring malformed attribute"
            );
        }
        parsed
    }

    fn length(&self, name: &str) -> Option<Length> {
        self.parse(name, values::length)
    }

    /// A length that must not be negative (`width`, `height`, `r`).
    fn size(&self, name: &str) -> Option<Length> {
        self.parse(name, |v| values::length(v).filter(|l| l.value >= 0.0))
    }

    /// First entry of a coordinate list such as text `x="10 20 30"`.
    fn first_length(&self, name: &str) -> Length {
        self.parse(name, |v| {
            let first = v.split(|c: char| c == ',' || c.is_whitespace()).find(|s| !s.is_empty())?;
            values::length(first)
        })
        .unwrap_or_default()
    }

    fn view_box(&self) -> Option<ViewBox> {
        self.parse("viewBox", values::view_box)
    }

    fn aspect(&self) -> AspectRatio {
        self.parse("preserveAspectRatio", values::aspect_ratio)
            .unwrap_or_default()
    }

    fn transform(&self) -> Transform {
        self.parse("transform", values::transform)
            .unwrap_or_else(Transform::identity)
    }

    fn points(&self) -> Vec<svgmetrics_core::Point> {
        self.get("points").map(values::points).unwrap_or_default()
    }

    fn path(&self) -> svgmetrics_core::PathData {
        let Some(d) = self.get("d") else {
            return Default::default();
        };
        let (data, complete) = values::path(d);
        if !complete {
            tracing::warn!(element = %self.label(), "path data truncated at first error");
        }
        data
    }

    fn orient(&self) -> MarkerOrient {
        match self.get("orient") {
            None => MarkerOrient::default(),
            Some("auto") => MarkerOrient::Auto,
            Some("auto-start-reverse") => MarkerOrient::AutoStartReverse,
            Some(_) => self
                .parse("orient", values::angle)
                .map(MarkerOrient::Angle)
                .unwrap_or_default(),
        }
    }

    /// `href` wins over the deprecated `xlink:href`.
    fn href(&self) -> Option<String> {
        self.get("href")
            .or_else(|| self.xml.attribute((XLINK_NS, "href")))
            .and_then(values::fragment)
    }
}
