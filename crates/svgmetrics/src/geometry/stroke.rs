//! Stroke extents: the area covered by stroking a path, including joins and caps.
//!
//! Straight segments are exact. Curves are exact wherever the offset curve is smooth: its
//! extrema sit at the parameters where the base curve's tangent is axis-aligned, and those
//! parameters are included explicitly on top of a uniform sampling.

use super::path_bounds::{
    Segment, Subpath, cubic_derivative, cubic_extrema, cubic_point, subpaths, unit,
};
use svgmetrics_core::geom::{Bounds, Point, Rect, Vector, include_point, vector};
use svgmetrics_core::path::PathData;
use svgmetrics_core::style::{LineCap, LineJoin};

const CURVE_SAMPLES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StrokeStyle {
    pub half_width: f64,
    pub join: LineJoin,
    pub cap: LineCap,
    pub miter_limit: f64,
}

pub(crate) fn stroke_extents(path: &PathData, stroke: &StrokeStyle) -> Option<Rect> {
    if !(stroke.half_width > 0.0) {
        return None;
    }
    let mut bounds = None;
    for sub in subpaths(path) {
        stroke_subpath(&sub, stroke, &mut bounds);
    }
    bounds.map(|b| b.to_rect())
}

fn stroke_subpath(sub: &Subpath, stroke: &StrokeStyle, bounds: &mut Option<Bounds>) {
    let hw = stroke.half_width;
    let segments: Vec<&Segment> = sub.segments.iter().filter(|s| !s.is_degenerate()).collect();

    if segments.is_empty() {
        // A zero-length subpath only paints its caps. Lone move-tos paint nothing.
        if sub.segments.is_empty() && !sub.closed {
            return;
        }
        match stroke.cap {
            LineCap::Butt => {}
            LineCap::Round => include_disc(bounds, sub.start, hw),
            LineCap::Square => {
                include_point(bounds, sub.start + vector(-hw, -hw));
                include_point(bounds, sub.start + vector(hw, hw));
            }
        }
        return;
    }

    for seg in &segments {
        include_segment(bounds, seg, hw);
    }

    for pair in segments.windows(2) {
        include_join(bounds, pair[0], pair[1], stroke);
    }

    if sub.closed {
        let (Some(last), Some(first)) = (segments.last(), segments.first()) else {
            return;
        };
        include_join(bounds, last, first, stroke);
    } else {
        if let (Some(first), Some(dir)) = (segments.first(), segments[0].start_tangent()) {
            include_cap(bounds, first.start(), -dir, stroke);
        }
        if let Some(last) = segments.last() {
            if let Some(dir) = last.end_tangent() {
                include_cap(bounds, last.end(), dir, stroke);
            }
        }
    }
}

fn normal(dir: Vector) -> Vector {
    vector(-dir.y, dir.x)
}

fn include_offset(bounds: &mut Option<Bounds>, p: Point, dir: Vector, hw: f64) {
    let n = normal(dir) * hw;
    include_point(bounds, p + n);
    include_point(bounds, p - n);
}

fn include_disc(bounds: &mut Option<Bounds>, center: Point, r: f64) {
    include_point(bounds, center + vector(-r, -r));
    include_point(bounds, center + vector(r, r));
}

fn include_segment(bounds: &mut Option<Bounds>, seg: &Segment, hw: f64) {
    match *seg {
        Segment::Line(a, b) => {
            if let Some(dir) = unit(b - a) {
                include_offset(bounds, a, dir, hw);
                include_offset(bounds, b, dir, hw);
            }
        }
        Segment::Cubic(p0, c1, c2, p3) => {
            let mut params: Vec<f64> = (0..=CURVE_SAMPLES)
                .map(|i| i as f64 / CURVE_SAMPLES as f64)
                .collect();
            params.extend(cubic_extrema(p0, c1, c2, p3).into_iter().flatten());
            for t in params {
                let p = cubic_point(p0, c1, c2, p3, t);
                let tangent = unit(cubic_derivative(p0, c1, c2, p3, t)).or_else(|| {
                    if t < 0.5 {
                        seg.start_tangent()
                    } else {
                        seg.end_tangent()
                    }
                });
                match tangent {
                    Some(dir) => include_offset(bounds, p, dir, hw),
                    None => include_disc(bounds, p, hw),
                }
            }
        }
    }
}

fn include_join(
    bounds: &mut Option<Bounds>,
    incoming: &Segment,
    outgoing: &Segment,
    stroke: &StrokeStyle,
) {
    let (Some(d_in), Some(d_out)) = (incoming.end_tangent(), outgoing.start_tangent()) else {
        return;
    };
    let vertex = incoming.end();
    let hw = stroke.half_width;
    let cross = d_in.x * d_out.y - d_in.y * d_out.x;
    let dot = d_in.dot(d_out);
    if cross.abs() < 1e-12 && dot > 0.0 {
        // Collinear continuation; the segment offsets already meet.
        return;
    }

    match stroke.join {
        LineJoin::Bevel => {}
        LineJoin::Round => include_disc(bounds, vertex, hw),
        LineJoin::Miter => {
            // Miter length over stroke width is 1 / sin(θ/2) = sqrt(2 / (1 + cos φ)), where φ is
            // the angle between the two directions.
            let denom = 1.0 + dot;
            if denom <= 1e-12 {
                return;
            }
            let ratio = (2.0 / denom).sqrt();
            if ratio > stroke.miter_limit {
                return;
            }
            let n_in = normal(d_in);
            let n_out = normal(d_out);
            let mut tip = (n_in + n_out) * (hw / (1.0 + n_in.dot(n_out)));
            // The miter is on the outside of the turn.
            if tip.dot(d_out - d_in) > 0.0 {
                tip = -tip;
            }
            include_point(bounds, vertex + tip);
        }
    }
}

fn include_cap(bounds: &mut Option<Bounds>, at: Point, outward: Vector, stroke: &StrokeStyle) {
    let hw = stroke.half_width;
    match stroke.cap {
        LineCap::Butt => {}
        LineCap::Round => include_disc(bounds, at, hw),
        LineCap::Square => {
            let ext = at + outward * hw;
            include_offset(bounds, ext, outward, hw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(width: f64, join: LineJoin, cap: LineCap) -> StrokeStyle {
        StrokeStyle {
            half_width: width / 2.0,
            join,
            cap,
            miter_limit: 4.0,
        }
    }

    fn square() -> PathData {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close();
        p
    }

    #[test]
    fn miter_corners_of_a_square_reach_the_offset_corners() {
        let r = stroke_extents(&square(), &style(2.0, LineJoin::Miter, LineCap::Butt)).unwrap();
        assert_eq!(r, Rect::new(-1.0, -1.0, 12.0, 12.0));
    }

    #[test]
    fn bevel_corners_still_cover_the_offset_edges() {
        let r = stroke_extents(&square(), &style(2.0, LineJoin::Bevel, LineCap::Butt)).unwrap();
        assert_eq!(r, Rect::new(-1.0, -1.0, 12.0, 12.0));
    }

    #[test]
    fn sharp_miter_is_limited() {
        // A spike turning back at a very small angle.
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).line_to(100.0, 1.0).line_to(0.0, 2.0);
        let limited = stroke_extents(&p, &style(2.0, LineJoin::Miter, LineCap::Butt)).unwrap();
        assert!(limited.right() < 102.0);

        let mut unlimited = style(2.0, LineJoin::Miter, LineCap::Butt);
        unlimited.miter_limit = 1000.0;
        let spiky = stroke_extents(&p, &unlimited).unwrap();
        assert!(spiky.right() > 150.0);
    }

    #[test]
    fn caps_extend_open_lines() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).line_to(10.0, 0.0);
        let butt = stroke_extents(&p, &style(4.0, LineJoin::Miter, LineCap::Butt)).unwrap();
        assert_eq!(butt, Rect::new(0.0, -2.0, 10.0, 4.0));
        let square = stroke_extents(&p, &style(4.0, LineJoin::Miter, LineCap::Square)).unwrap();
        assert_eq!(square, Rect::new(-2.0, -2.0, 14.0, 4.0));
        let round = stroke_extents(&p, &style(4.0, LineJoin::Miter, LineCap::Round)).unwrap();
        assert_eq!(round, Rect::new(-2.0, -2.0, 14.0, 4.0));
    }

    #[test]
    fn zero_length_subpath_paints_only_with_caps() {
        let mut p = PathData::new();
        p.move_to(5.0, 5.0).line_to(5.0, 5.0);
        assert_eq!(
            stroke_extents(&p, &style(2.0, LineJoin::Miter, LineCap::Butt)),
            None
        );
        assert_eq!(
            stroke_extents(&p, &style(2.0, LineJoin::Miter, LineCap::Round)),
            Some(Rect::new(4.0, 4.0, 2.0, 2.0))
        );
    }

    #[test]
    fn curve_stroke_follows_the_offset_curve() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).curve_to(0.0, 10.0, 10.0, 10.0, 10.0, 0.0);
        let r = stroke_extents(&p, &style(2.0, LineJoin::Miter, LineCap::Butt)).unwrap();
        // Apex at y = 7.5 with a horizontal tangent.
        assert!((r.bottom() - 8.5).abs() < 1e-9);
        // Butt ends at the vertical start/end tangents.
        assert!((r.x + 1.0).abs() < 1e-9);
        assert!((r.right() - 11.0).abs() < 1e-9);
    }
}
