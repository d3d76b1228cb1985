//! Marker placement along path vertices.

use super::Walker;
use super::path_bounds::subpaths;
use crate::Result;
use std::f64::consts::{PI, TAU};
use svgmetrics_core::geom::{Point, Rect, Size, Transform, Vector, point, size, union_rects};
use svgmetrics_core::length::Direction;
use svgmetrics_core::node::{Marker, MarkerOrient, MarkerUnits, Node, NodeKind};
use svgmetrics_core::path::PathData;
use svgmetrics_core::{Diagnostic, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerSlot {
    Start,
    Mid,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MarkerVertex {
    pub point: Point,
    pub incoming: Option<Vector>,
    pub outgoing: Option<Vector>,
}

impl MarkerVertex {
    /// Marker rotation in radians.
    pub(crate) fn angle(&self, orient: MarkerOrient, slot: MarkerSlot) -> f64 {
        match orient {
            MarkerOrient::Angle(deg) => deg.to_radians(),
            MarkerOrient::Auto => self.auto_angle(),
            MarkerOrient::AutoStartReverse if slot == MarkerSlot::Start => self.auto_angle() + PI,
            MarkerOrient::AutoStartReverse => self.auto_angle(),
        }
    }

    fn auto_angle(&self) -> f64 {
        let angle = |v: Vector| v.y.atan2(v.x);
        match (self.incoming, self.outgoing) {
            (Some(i), Some(o)) => bisect(angle(i), angle(o)),
            (Some(d), None) | (None, Some(d)) => angle(d),
            (None, None) => 0.0,
        }
    }
}

fn bisect(a: f64, b: f64) -> f64 {
    let mut delta = b - a;
    while delta > PI {
        delta -= TAU;
    }
    while delta < -PI {
        delta += TAU;
    }
    a + delta / 2.0
}

/// Every vertex of the path in order, with the directions of the adjacent segments.
pub(crate) fn marker_vertices(path: &PathData) -> Vec<MarkerVertex> {
    let mut out = Vec::new();
    for sub in subpaths(path) {
        let segs = &sub.segments;
        let closing_in = if sub.closed {
            segs.last().and_then(|s| s.end_tangent())
        } else {
            None
        };
        out.push(MarkerVertex {
            point: sub.start,
            incoming: closing_in,
            outgoing: segs.first().and_then(|s| s.start_tangent()),
        });
        for (i, seg) in segs.iter().enumerate() {
            let next = match segs.get(i + 1) {
                Some(next) => next.start_tangent(),
                None if sub.closed => segs.first().and_then(|s| s.start_tangent()),
                None => None,
            };
            out.push(MarkerVertex {
                point: seg.end(),
                incoming: seg.end_tangent(),
                outgoing: next,
            });
        }
    }
    out
}

fn slot_applies(slot: MarkerSlot, index: usize, last: usize) -> bool {
    match slot {
        MarkerSlot::Start => index == 0,
        MarkerSlot::End => index == last,
        MarkerSlot::Mid => index != 0 && index != last,
    }
}

/// Marker content ink in marker viewport units plus the reference point in the same units.
struct MarkerContent {
    ink: Rect,
    ref_point: Point,
}

impl<'a> Walker<'a> {
    /// Ink of all markers drawn on `path`, in the shape's user space.
    pub(super) fn markers(
        &mut self,
        node: &Node,
        path: &PathData,
        stroke_width: f64,
        viewport: Size,
    ) -> Result<Option<Rect>> {
        let vertices = marker_vertices(path);
        let Some(last) = vertices.len().checked_sub(1) else {
            return Ok(None);
        };

        let style = &node.style;
        let slots = [
            (MarkerSlot::Start, style.marker_start.as_deref()),
            (MarkerSlot::Mid, style.marker_mid.as_deref()),
            (MarkerSlot::End, style.marker_end.as_deref()),
        ];

        let mut ink = None;
        for (slot, href) in slots {
            let Some(href) = href else {
                continue;
            };
            let Some((marker_id, marker)) = self.resolve_marker(node, href) else {
                continue;
            };
            let Some(content) = self.marker_content(marker_id, marker, viewport)? else {
                continue;
            };
            let scale = match marker.units {
                MarkerUnits::StrokeWidth => stroke_width,
                MarkerUnits::UserSpaceOnUse => 1.0,
            };

            for (i, v) in vertices.iter().enumerate() {
                if !slot_applies(slot, i, last) {
                    continue;
                }
                let placement = Transform::translation(-content.ref_point.x, -content.ref_point.y)
                    .then_scale(scale, scale)
                    .then_rotate(euclid::Angle::radians(v.angle(marker.orient, slot)))
                    .then_translate(v.point.to_vector());
                ink = union_rects(ink, Some(content.ink.transform(&placement)));
            }
        }
        Ok(ink)
    }

    fn resolve_marker(&mut self, node: &Node, href: &str) -> Option<(NodeId, &'a Marker)> {
        let document = self.document;
        let found = document.find(href).and_then(|id| match &document.get(id)?.kind {
            NodeKind::Marker(marker) => Some((id, marker)),
            _ => None,
        });
        if found.is_none() {
            self.report(Diagnostic::DanglingReference {
                from: node.label(),
                target: href.to_string(),
            });
        }
        found
    }

    fn marker_content(
        &mut self,
        id: NodeId,
        marker: &Marker,
        viewport: Size,
    ) -> Result<Option<MarkerContent>> {
        let document = self.document;
        let node = document.node(id)?;
        let ctx = self.length_context(node);

        let width = marker.width.resolve_in(viewport, Direction::Horizontal, &ctx)?;
        let height = marker.height.resolve_in(viewport, Direction::Vertical, &ctx)?;
        if !(width > 0.0 && height > 0.0) {
            return Ok(None);
        }

        let (to_viewport, content_viewport) = match &marker.view_box {
            Some(vb) => (
                marker
                    .aspect
                    .view_box_transform(vb, &Rect::from_size(width, height)),
                vb.size(),
            ),
            None => (Transform::identity(), size(width, height)),
        };
        let ref_x = marker
            .ref_x
            .resolve_in(content_viewport, Direction::Horizontal, &ctx)?;
        let ref_y = marker
            .ref_y
            .resolve_in(content_viewport, Direction::Vertical, &ctx)?;
        let ref_point = to_viewport.transform_point(point(ref_x, ref_y));

        let bbox = self.enter(id, |walker| walker.children(id, content_viewport))?;
        let Some(mut ink) = bbox.ink.map(|r| r.transform(&to_viewport)) else {
            return Ok(None);
        };
        if marker.clip {
            match ink.intersection(&Rect::from_size(width, height)) {
                Some(clipped) => ink = clipped,
                None => return Ok(None),
            }
        }
        Ok(Some(MarkerContent { ink, ref_point }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(v: f64) -> f64 {
        v.to_degrees()
    }

    #[test]
    fn open_polyline_vertices() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0);
        let v = marker_vertices(&p);
        assert_eq!(v.len(), 3);
        assert_eq!(deg(v[0].angle(MarkerOrient::Auto, MarkerSlot::Start)), 0.0);
        assert!((deg(v[1].angle(MarkerOrient::Auto, MarkerSlot::Mid)) - 45.0).abs() < 1e-9);
        assert!((deg(v[2].angle(MarkerOrient::Auto, MarkerSlot::End)) - 90.0).abs() < 1e-9);
        assert!(
            (deg(v[0].angle(MarkerOrient::AutoStartReverse, MarkerSlot::Start)) - 180.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn closed_subpath_bisects_at_the_start() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close();
        let v = marker_vertices(&p);
        // Start, three corners, then the closing vertex back at the start.
        assert_eq!(v.len(), 5);
        assert_eq!(v[4].point, point(0.0, 0.0));
        // Incoming from (0,10)->(0,0) points up (-90°), outgoing points right (0°).
        assert!((deg(v[0].angle(MarkerOrient::Auto, MarkerSlot::Start)) + 45.0).abs() < 1e-9);
    }

    #[test]
    fn slots_cover_single_vertex_paths() {
        assert!(slot_applies(MarkerSlot::Start, 0, 0));
        assert!(slot_applies(MarkerSlot::End, 0, 0));
        assert!(!slot_applies(MarkerSlot::Mid, 0, 0));
        assert!(slot_applies(MarkerSlot::Mid, 1, 2));
    }

    #[test]
    fn bisect_wraps_around() {
        let a = 170f64.to_radians();
        let b = (-170f64).to_radians();
        assert!((bisect(a, b).to_degrees() - 180.0).abs() < 1e-9);
    }
}
