//! Ink and logical bounding boxes.
//!
//! Every element is measured in its own user space and the result is mapped through its
//! `transform` into the parent's user space, so the walk never needs the absolute transform.

mod markers;
mod path_bounds;
mod stroke;

use crate::accumulate::establish;
use crate::options::MeasureOptions;
use crate::{Error, Result};
use path_bounds::path_extents;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use stroke::{StrokeStyle, stroke_extents};
use svgmetrics_core::geom::{Rect, Size, Transform, size, union_rects};
use svgmetrics_core::length::{Direction, Length, LengthContext};
use svgmetrics_core::node::{CoordUnits, Node, NodeKind, Text, TextAnchor, Use};
use svgmetrics_core::shape::Shape;
use svgmetrics_core::{Diagnostic, Document, NodeId};

/// The two extents of a subtree. `None` means "no extent", which is distinct from a
/// zero-sized rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Union of everything painted: fills, strokes, markers and filter regions.
    pub ink: Option<Rect>,
    /// Union of the un-stroked geometry.
    pub logical: Option<Rect>,
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        ink: None,
        logical: None,
    };

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            ink: Some(rect),
            logical: Some(rect),
        }
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            ink: union_rects(self.ink, other.ink),
            logical: union_rects(self.logical, other.logical),
        }
    }

    pub fn transform(&self, transform: &Transform) -> BoundingBox {
        BoundingBox {
            ink: self.ink.map(|r| r.transform(transform)),
            logical: self.logical.map(|r| r.transform(transform)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ink.is_none() && self.logical.is_none()
    }
}

/// Per-query measuring state.
///
/// `active` holds every element currently being measured, so a reference chain that comes back
/// to one of them is cut instead of recursing forever.
pub(crate) struct Walker<'a> {
    document: &'a Document,
    options: &'a MeasureOptions,
    active: FxHashSet<NodeId>,
    references: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(document: &'a Document, options: &'a MeasureOptions) -> Self {
        Self {
            document,
            options,
            active: FxHashSet::default(),
            references: 0,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn length_context(&self, node: &Node) -> LengthContext {
        LengthContext::new(self.options.dpi).with_font_size(node.style.font_size)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.contains(&diagnostic) {
            return;
        }
        tracing::warn!(%diagnostic, "element skipped while measuring");
        self.diagnostics.push(diagnostic);
    }

    /// Runs `f` with `id` marked active; re-entering an active element yields no extent.
    fn enter(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Self) -> Result<BoundingBox>,
    ) -> Result<BoundingBox> {
        if self.active.len() >= self.options.max_depth {
            return Err(Error::TooDeep {
                limit: self.options.max_depth,
            });
        }
        if !self.active.insert(id) {
            let node = self.document.node(id)?;
            self.report(Diagnostic::CyclicReference {
                id: node.id.clone().unwrap_or_else(|| node.label()),
            });
            return Ok(BoundingBox::EMPTY);
        }
        let result = f(self);
        self.active.remove(&id);
        result
    }

    /// Box of `id` in its parent's user space.
    pub(crate) fn measure(&mut self, id: NodeId, viewport: Size) -> Result<BoundingBox> {
        let node = self.document.node(id)?;
        if node.style.display_none || node.kind.is_non_rendering() {
            return Ok(BoundingBox::EMPTY);
        }
        self.enter(id, |walker| walker.measure_element(id, viewport))
    }

    /// Union of the children of `id`, in the user space of `id`.
    pub(crate) fn children(&mut self, id: NodeId, viewport: Size) -> Result<BoundingBox> {
        let document = self.document;
        let mut acc = BoundingBox::EMPTY;
        for &child in document.children(id)? {
            acc = acc.union(&self.measure(child, viewport)?);
        }
        Ok(acc)
    }

    fn measure_element(&mut self, id: NodeId, viewport: Size) -> Result<BoundingBox> {
        let document = self.document;
        let node = document.node(id)?;
        let ctx = self.length_context(node);

        let local = match &node.kind {
            NodeKind::Svg(element) => {
                let nested = establish(element, viewport, &ctx)?;
                if nested.is_disabled() {
                    BoundingBox::EMPTY
                } else {
                    self.children(id, nested.size)?.transform(&nested.transform)
                }
            }
            NodeKind::Group => self.children(id, viewport)?,
            NodeKind::Shape(shape) => self.shape(node, shape, viewport, &ctx)?,
            NodeKind::Text(text) => text_box(node, text, viewport, &ctx)?,
            NodeKind::Image {
                x,
                y,
                width,
                height,
            } => {
                let w = width.resolve_in(viewport, Direction::Horizontal, &ctx)?;
                let h = height.resolve_in(viewport, Direction::Vertical, &ctx)?;
                if !(w > 0.0 && h > 0.0) {
                    BoundingBox::EMPTY
                } else {
                    let rect = Rect::new(
                        x.resolve_in(viewport, Direction::Horizontal, &ctx)?,
                        y.resolve_in(viewport, Direction::Vertical, &ctx)?,
                        w,
                        h,
                    );
                    BoundingBox {
                        ink: node.style.is_visible().then_some(rect),
                        logical: Some(rect),
                    }
                }
            }
            NodeKind::Use(reference) => self.use_element(node, reference, viewport, &ctx)?,
            NodeKind::Symbol { .. } | NodeKind::Marker(_) | NodeKind::Filter(_) | NodeKind::Resource => {
                BoundingBox::EMPTY
            }
        };

        let local = self.apply_filter(node, local, viewport, &ctx)?;
        Ok(local.transform(&node.transform))
    }

    fn shape(
        &mut self,
        node: &Node,
        shape: &Shape,
        viewport: Size,
        ctx: &LengthContext,
    ) -> Result<BoundingBox> {
        let Some(path) = shape.to_path(viewport, ctx)? else {
            return Ok(BoundingBox::EMPTY);
        };
        let logical = path_extents(&path);
        let style = &node.style;
        if !style.is_visible() {
            return Ok(BoundingBox { ink: None, logical });
        }

        let mut ink = None;
        if style.fill.is_painted() && shape.encloses_area() {
            ink = logical.filter(|r| !r.is_empty());
        }
        let stroke_width = style
            .stroke_width
            .resolve_in(viewport, Direction::Both, ctx)?;
        if style.stroke.is_painted() && stroke_width > 0.0 {
            let stroke = StrokeStyle {
                half_width: stroke_width / 2.0,
                join: style.stroke_line_join,
                cap: style.stroke_line_cap,
                miter_limit: style.stroke_miter_limit,
            };
            ink = union_rects(ink, stroke_extents(&path, &stroke));
        }
        if shape.allows_markers() && style.has_markers() {
            ink = union_rects(ink, self.markers(node, &path, stroke_width, viewport)?);
        }
        Ok(BoundingBox { ink, logical })
    }

    fn use_element(
        &mut self,
        node: &Node,
        reference: &Use,
        viewport: Size,
        ctx: &LengthContext,
    ) -> Result<BoundingBox> {
        self.references += 1;
        if self.references > self.options.max_referenced_elements {
            return Err(Error::LimitExceeded {
                limit: self.options.max_referenced_elements,
            });
        }

        let document = self.document;
        let Some(target) = document.find(&reference.href) else {
            self.report(Diagnostic::DanglingReference {
                from: node.label(),
                target: reference.href.clone(),
            });
            return Ok(BoundingBox::EMPTY);
        };
        let target_node = document.node(target)?;
        let x = reference.x.resolve_in(viewport, Direction::Horizontal, ctx)?;
        let y = reference.y.resolve_in(viewport, Direction::Vertical, ctx)?;

        let content = match &target_node.kind {
            _ if target_node.style.display_none => BoundingBox::EMPTY,
            NodeKind::Symbol { view_box, aspect } => {
                let full = Length::percent(100.0);
                let w = reference
                    .width
                    .unwrap_or(full)
                    .resolve_in(viewport, Direction::Horizontal, ctx)?;
                let h = reference
                    .height
                    .unwrap_or(full)
                    .resolve_in(viewport, Direction::Vertical, ctx)?;
                if !(w > 0.0 && h > 0.0) {
                    return Ok(BoundingBox::EMPTY);
                }
                let (to_use, inner) = match view_box {
                    Some(vb) => (aspect.view_box_transform(vb, &Rect::from_size(w, h)), vb.size()),
                    None => (Transform::identity(), size(w, h)),
                };
                self.enter(target, |walker| {
                    Ok(walker.children(target, inner)?.transform(&to_use))
                })?
                .transform(&target_node.transform)
            }
            NodeKind::Svg(element) => {
                let mut element = element.clone();
                element.width = reference.width.or(element.width);
                element.height = reference.height.or(element.height);
                let target_ctx = self.length_context(target_node);
                let nested = establish(&element, viewport, &target_ctx)?;
                if nested.is_disabled() {
                    BoundingBox::EMPTY
                } else {
                    self.enter(target, |walker| {
                        Ok(walker
                            .children(target, nested.size)?
                            .transform(&nested.transform))
                    })?
                    .transform(&target_node.transform)
                }
            }
            _ => self.measure(target, viewport)?,
        };
        Ok(content.transform(&Transform::translation(x, y)))
    }

    /// Replaces the ink with the filter region when `filter` names a filter element.
    fn apply_filter(
        &mut self,
        node: &Node,
        bbox: BoundingBox,
        viewport: Size,
        ctx: &LengthContext,
    ) -> Result<BoundingBox> {
        let Some(href) = node.style.filter.as_deref() else {
            return Ok(bbox);
        };
        let document = self.document;
        let filter = document
            .find(href)
            .and_then(|id| document.get(id))
            .and_then(|n| match &n.kind {
                NodeKind::Filter(filter) => Some(filter),
                _ => None,
            });
        let Some(filter) = filter else {
            self.report(Diagnostic::DanglingReference {
                from: node.label(),
                target: href.to_string(),
            });
            return Ok(bbox);
        };

        let (x, y, w, h) = match filter.units {
            CoordUnits::ObjectBoundingBox => {
                let Some(b) = bbox.logical else {
                    return Ok(BoundingBox { ink: None, ..bbox });
                };
                let fraction = |l: &Length| {
                    if l.is_percent() {
                        l.value / 100.0
                    } else {
                        l.value
                    }
                };
                (
                    b.x + fraction(&filter.x) * b.width,
                    b.y + fraction(&filter.y) * b.height,
                    fraction(&filter.width) * b.width,
                    fraction(&filter.height) * b.height,
                )
            }
            CoordUnits::UserSpaceOnUse => (
                filter.x.resolve_in(viewport, Direction::Horizontal, ctx)?,
                filter.y.resolve_in(viewport, Direction::Vertical, ctx)?,
                filter.width.resolve_in(viewport, Direction::Horizontal, ctx)?,
                filter.height.resolve_in(viewport, Direction::Vertical, ctx)?,
            ),
        };
        let ink = (w > 0.0 && h > 0.0).then(|| Rect::new(x, y, w, h));
        Ok(BoundingBox {
            ink,
            logical: bbox.logical,
        })
    }
}

fn text_box(
    node: &Node,
    text: &Text,
    viewport: Size,
    ctx: &LengthContext,
) -> Result<BoundingBox> {
    if text.content.is_empty() {
        return Ok(BoundingBox::EMPTY);
    }
    let x = text.x.resolve_in(viewport, Direction::Horizontal, ctx)?;
    let y = text.y.resolve_in(viewport, Direction::Vertical, ctx)?;
    let m = text.metrics;
    let shift = match text.anchor {
        TextAnchor::Start => 0.0,
        TextAnchor::Middle => m.advance / 2.0,
        TextAnchor::End => m.advance,
    };
    let logical = Rect::new(x - shift, y - m.ascent, m.advance, m.ascent + m.descent);

    let style = &node.style;
    if !style.is_visible() {
        return Ok(BoundingBox {
            ink: None,
            logical: Some(logical),
        });
    }
    let mut ink = style.fill.is_painted().then_some(logical);
    let stroke_width = style
        .stroke_width
        .resolve_in(viewport, Direction::Both, ctx)?;
    if style.stroke.is_painted() && stroke_width > 0.0 {
        let half = stroke_width / 2.0;
        ink = union_rects(ink, Some(logical.inflate(half, half)));
    }
    Ok(BoundingBox {
        ink,
        logical: Some(logical),
    })
}
