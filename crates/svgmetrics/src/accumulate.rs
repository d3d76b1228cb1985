//! Composition of viewport mappings and `transform` attributes from the root down to a node.

use crate::Result;
use crate::options::MeasureOptions;
use crate::sizing;
use svgmetrics_core::geom::{Rect, Size, Transform, size};
use svgmetrics_core::length::{Direction, Length, LengthContext};
use svgmetrics_core::node::{NodeKind, ViewportElement};
use svgmetrics_core::{Document, NodeId};

/// A viewport established by a nested `svg` element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NestedViewport {
    /// Viewport rectangle in the parent's user space.
    pub rect: Rect,
    /// Maps the element's content user space into the parent's user space.
    pub transform: Transform,
    /// Size of the content user space, the base for percentages inside the element.
    pub size: Size,
}

impl NestedViewport {
    /// A zero-sized viewport disables rendering of the element.
    pub(crate) fn is_disabled(&self) -> bool {
        self.rect.is_empty()
    }
}

pub(crate) fn establish(
    element: &ViewportElement,
    parent: Size,
    ctx: &LengthContext,
) -> Result<NestedViewport> {
    let full = Length::percent(100.0);
    let x = element.x.resolve_in(parent, Direction::Horizontal, ctx)?;
    let y = element.y.resolve_in(parent, Direction::Vertical, ctx)?;
    let width = element
        .width
        .unwrap_or(full)
        .resolve_in(parent, Direction::Horizontal, ctx)?;
    let height = element
        .height
        .unwrap_or(full)
        .resolve_in(parent, Direction::Vertical, ctx)?;

    let rect = Rect {
        x,
        y,
        width: width.max(0.0),
        height: height.max(0.0),
    };
    let (transform, size) = match &element.view_box {
        Some(vb) if !rect.is_empty() => (element.aspect.view_box_transform(vb, &rect), vb.size()),
        _ => (Transform::translation(x, y), size(rect.width, rect.height)),
    };
    Ok(NestedViewport {
        rect,
        transform,
        size,
    })
}

/// Net transform from the user space of `target`'s children to the document's user space.
///
/// The root's own viewBox-to-pixel mapping is not included; nested `svg` viewports and every
/// `transform` attribute below the root are.
pub fn accumulate(document: &Document, target: NodeId, options: &MeasureOptions) -> Result<Transform> {
    let root_viewport = sizing::user_viewport(document, options)?;
    Ok(walk_to(document, target, options, root_viewport)?.0)
}

/// Like [`accumulate`], also returning the viewport size in effect for `target`'s children.
pub(crate) fn walk_to(
    document: &Document,
    target: NodeId,
    options: &MeasureOptions,
    root_viewport: Size,
) -> Result<(Transform, Size)> {
    let path = document.path_from_root(target)?;
    let mut total = Transform::identity();
    let mut viewport = root_viewport;

    for &id in path.iter().skip(1) {
        let node = document.node(id)?;
        let local = match &node.kind {
            NodeKind::Svg(element) => {
                let ctx = LengthContext::new(options.dpi).with_font_size(node.style.font_size);
                let nested = establish(element, viewport, &ctx)?;
                viewport = nested.size;
                nested.transform.then(&node.transform)
            }
            _ => node.transform,
        };
        total = local.then(&total);
    }

    tracing::debug!(node = %target, depth = path.len(), "accumulated transform");
    Ok((total, viewport))
}
