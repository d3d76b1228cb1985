//! Path decomposition and exact (control-point free) path extents.

use svgmetrics_core::geom::{Bounds, Point, Rect, Vector, include_point};
use svgmetrics_core::path::{PathCommand, PathData};

const EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Segment {
    Line(Point, Point),
    Cubic(Point, Point, Point, Point),
}

impl Segment {
    pub(crate) fn start(&self) -> Point {
        match *self {
            Segment::Line(p, _) | Segment::Cubic(p, ..) => p,
        }
    }

    pub(crate) fn end(&self) -> Point {
        match *self {
            Segment::Line(_, p) | Segment::Cubic(_, _, _, p) => p,
        }
    }

    /// Unit direction leaving the start point, if the segment has any extent.
    pub(crate) fn start_tangent(&self) -> Option<Vector> {
        match *self {
            Segment::Line(a, b) => unit(b - a),
            Segment::Cubic(p0, c1, c2, p3) => unit(c1 - p0)
                .or_else(|| unit(c2 - p0))
                .or_else(|| unit(p3 - p0)),
        }
    }

    /// Unit direction arriving at the end point.
    pub(crate) fn end_tangent(&self) -> Option<Vector> {
        match *self {
            Segment::Line(a, b) => unit(b - a),
            Segment::Cubic(p0, c1, c2, p3) => unit(p3 - c2)
                .or_else(|| unit(p3 - c1))
                .or_else(|| unit(p3 - p0)),
        }
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        match *self {
            Segment::Line(a, b) => a == b,
            Segment::Cubic(p0, c1, c2, p3) => p0 == c1 && p0 == c2 && p0 == p3,
        }
    }

    pub(crate) fn include_extents(&self, bounds: &mut Option<Bounds>) {
        match *self {
            Segment::Line(a, b) => {
                include_point(bounds, a);
                include_point(bounds, b);
            }
            Segment::Cubic(p0, c1, c2, p3) => {
                include_point(bounds, p0);
                include_point(bounds, p3);
                for t in cubic_extrema(p0, c1, c2, p3).into_iter().flatten() {
                    include_point(bounds, cubic_point(p0, c1, c2, p3, t));
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Subpath {
    pub start: Point,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Subpath {
    fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    pub(crate) fn end(&self) -> Point {
        self.segments.last().map(Segment::end).unwrap_or(self.start)
    }
}

/// Splits path data into subpaths. A subpath consisting of a lone move-to has no segments.
pub(crate) fn subpaths(path: &PathData) -> Vec<Subpath> {
    let mut out = Vec::new();
    let mut current: Option<Subpath> = None;
    // Start point of the last closed subpath; drawing after `Z` continues from there.
    let mut reopen_at: Option<Point> = None;

    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo(p) => {
                out.extend(current.take());
                reopen_at = None;
                current = Some(Subpath::new(p));
            }
            PathCommand::LineTo(p) => {
                let sub = current.get_or_insert_with(|| Subpath::new(reopen_at.unwrap_or(p)));
                let from = sub.end();
                sub.segments.push(Segment::Line(from, p));
            }
            PathCommand::CurveTo(c1, c2, p) => {
                let sub = current.get_or_insert_with(|| Subpath::new(reopen_at.unwrap_or(c1)));
                let from = sub.end();
                sub.segments.push(Segment::Cubic(from, c1, c2, p));
            }
            PathCommand::ClosePath => {
                if let Some(mut sub) = current.take() {
                    let end = sub.end();
                    if end != sub.start {
                        sub.segments.push(Segment::Line(end, sub.start));
                    }
                    sub.closed = true;
                    reopen_at = Some(sub.start);
                    out.push(sub);
                }
            }
        }
    }
    out.extend(current);
    out
}

/// Geometric extents of the path, including curve extrema but not control points.
///
/// Lone move-tos draw nothing and do not contribute.
pub(crate) fn path_extents(path: &PathData) -> Option<Rect> {
    let mut bounds = None;
    for sub in subpaths(path) {
        for seg in &sub.segments {
            seg.include_extents(&mut bounds);
        }
    }
    bounds.map(|b| b.to_rect())
}

pub(crate) fn unit(v: Vector) -> Option<Vector> {
    let len = v.length();
    if len > EPS && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

pub(crate) fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    svgmetrics_core::geom::point(
        cubic_eval(p0.x, c1.x, c2.x, p3.x, t),
        cubic_eval(p0.y, c1.y, c2.y, p3.y, t),
    )
}

/// First derivative of the cubic at `t`.
pub(crate) fn cubic_derivative(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Vector {
    let mt = 1.0 - t;
    let a = (c1 - p0) * (3.0 * mt * mt);
    let b = (c2 - c1) * (6.0 * mt * t);
    let c = (p3 - c2) * (3.0 * t * t);
    a + b + c
}

fn cubic_eval(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let c = -3.0 * p0 + 3.0 * p1;
    ((a * t + b) * t + c) * t + p0
}

/// Parameters in (0, 1) where the curve has a horizontal or vertical tangent.
pub(crate) fn cubic_extrema(p0: Point, c1: Point, c2: Point, p3: Point) -> [Option<f64>; 4] {
    let [x0, x1] = axis_extrema(p0.x, c1.x, c2.x, p3.x);
    let [y0, y1] = axis_extrema(p0.y, c1.y, c2.y, p3.y);
    [x0, x1, y0, y1]
}

fn axis_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> [Option<f64>; 2] {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let c = -3.0 * p0 + 3.0 * p1;
    // d/dt = 3a t² + 2b t + c
    let (qa, qb, qc) = (3.0 * a, 2.0 * b, c);

    let inside = |t: f64| (t > 0.0 && t < 1.0).then_some(t);
    if qa.abs() <= EPS {
        if qb.abs() > EPS {
            return [inside(-qc / qb), None];
        }
        return [None, None];
    }
    let disc = qb * qb - 4.0 * qa * qc;
    let tol = 1e-12 * (qb * qb + (4.0 * qa * qc).abs() + 1.0);
    if disc < -tol {
        return [None, None];
    }
    let s = disc.max(0.0).sqrt();
    [
        inside((-qb + s) / (2.0 * qa)),
        inside((-qb - s) / (2.0 * qa)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgmetrics_core::geom::point;

    #[test]
    fn curve_extents_exclude_control_points() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).curve_to(0.0, 10.0, 10.0, 10.0, 10.0, 0.0);
        let r = path_extents(&p).unwrap();
        assert_eq!((r.x, r.y, r.width), (0.0, 0.0, 10.0));
        // Peak of the symmetric arch is at t = 0.5: 0.75 * 10.
        assert!((r.height - 7.5).abs() < 1e-9);
    }

    #[test]
    fn close_adds_the_closing_segment() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 5.0).close();
        let subs = subpaths(&p);
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
        assert_eq!(
            subs[0].segments.last(),
            Some(&Segment::Line(point(10.0, 5.0), point(0.0, 0.0)))
        );
    }

    #[test]
    fn drawing_after_close_restarts_at_subpath_start() {
        let mut p = PathData::new();
        p.move_to(5.0, 5.0).line_to(6.0, 5.0).close().line_to(5.0, 9.0);
        let subs = subpaths(&p);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].start, point(5.0, 5.0));
    }

    #[test]
    fn lone_move_to_has_no_extent() {
        let mut p = PathData::new();
        p.move_to(3.0, 3.0);
        assert_eq!(path_extents(&p), None);
    }
}
