//! Basic shapes and their conversion to path data.

use crate::error::Result;
use crate::geom::{Point, Size};
use crate::length::{Direction, Length, LengthContext};
use crate::path::PathData;
use serde::{Deserialize, Serialize};

/// Control-point distance for a quarter ellipse approximated by one cubic.
const KAPPA: f64 = 0.552_284_749_830_793_4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: Length,
        y: Length,
        width: Length,
        height: Length,
        rx: Option<Length>,
        ry: Option<Length>,
    },
    Circle {
        cx: Length,
        cy: Length,
        r: Length,
    },
    Ellipse {
        cx: Length,
        cy: Length,
        rx: Option<Length>,
        ry: Option<Length>,
    },
    Line {
        x1: Length,
        y1: Length,
        x2: Length,
        y2: Length,
    },
    Polyline(Vec<Point>),
    Polygon(Vec<Point>),
    Path(PathData),
}

impl Shape {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::Rect {
            x: Length::px(x),
            y: Length::px(y),
            width: Length::px(width),
            height: Length::px(height),
            rx: None,
            ry: None,
        }
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Line { .. } => "line",
            Shape::Polyline(_) => "polyline",
            Shape::Polygon(_) => "polygon",
            Shape::Path(_) => "path",
        }
    }

    /// Markers only apply to path-like shapes.
    pub fn allows_markers(&self) -> bool {
        matches!(
            self,
            Shape::Line { .. } | Shape::Polyline(_) | Shape::Polygon(_) | Shape::Path(_)
        )
    }

    /// Lines have no interior, so their fill never paints.
    pub fn encloses_area(&self) -> bool {
        !matches!(self, Shape::Line { .. })
    }

    /// Converts the shape to path data in its own user space.
    ///
    /// Returns `Ok(None)` for shapes that disable rendering (non-positive sizes, too few
    /// points, empty path data).
    pub fn to_path(&self, viewport: Size, ctx: &LengthContext) -> Result<Option<PathData>> {
        let h = |l: &Length| l.resolve_in(viewport, Direction::Horizontal, ctx);
        let v = |l: &Length| l.resolve_in(viewport, Direction::Vertical, ctx);

        let path = match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                let (x, y, w, hh) = (h(x)?, v(y)?, h(width)?, v(height)?);
                if !(w > 0.0 && hh > 0.0) {
                    return Ok(None);
                }
                let rx = rx.as_ref().map(h).transpose()?.filter(|r| *r >= 0.0);
                let ry = ry.as_ref().map(v).transpose()?.filter(|r| *r >= 0.0);
                let (rx, ry) = match (rx, ry) {
                    (None, None) => (0.0, 0.0),
                    (Some(r), None) | (None, Some(r)) => (r, r),
                    (Some(rx), Some(ry)) => (rx, ry),
                };
                rect_path(x, y, w, hh, rx.min(w / 2.0), ry.min(hh / 2.0))
            }
            Shape::Circle { cx, cy, r } => {
                let r = r.resolve_in(viewport, Direction::Both, ctx)?;
                if !(r > 0.0) {
                    return Ok(None);
                }
                ellipse_path(h(cx)?, v(cy)?, r, r)
            }
            Shape::Ellipse { cx, cy, rx, ry } => {
                let rx = rx.as_ref().map(h).transpose()?;
                let ry = ry.as_ref().map(v).transpose()?;
                let (rx, ry) = match (rx, ry) {
                    (None, None) => return Ok(None),
                    (Some(r), None) | (None, Some(r)) => (r, r),
                    (Some(rx), Some(ry)) => (rx, ry),
                };
                if !(rx > 0.0 && ry > 0.0) {
                    return Ok(None);
                }
                ellipse_path(h(cx)?, v(cy)?, rx, ry)
            }
            Shape::Line { x1, y1, x2, y2 } => {
                let mut p = PathData::new();
                p.move_to(h(x1)?, v(y1)?).line_to(h(x2)?, v(y2)?);
                p
            }
            Shape::Polyline(points) | Shape::Polygon(points) => {
                if points.len() < 2 {
                    return Ok(None);
                }
                let mut p = PathData::new();
                p.move_to(points[0].x, points[0].y);
                for pt in &points[1..] {
                    p.line_to(pt.x, pt.y);
                }
                if matches!(self, Shape::Polygon(_)) {
                    p.close();
                }
                p
            }
            Shape::Path(data) => {
                if data.is_empty() {
                    return Ok(None);
                }
                data.clone()
            }
        };
        Ok(Some(path))
    }
}

fn rect_path(x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64) -> PathData {
    let mut p = PathData::new();
    if rx <= 0.0 || ry <= 0.0 {
        p.move_to(x, y)
            .line_to(x + w, y)
            .line_to(x + w, y + h)
            .line_to(x, y + h)
            .close();
        return p;
    }

    let (kx, ky) = (KAPPA * rx, KAPPA * ry);
    let (r, b) = (x + w, y + h);
    p.move_to(x + rx, y)
        .line_to(r - rx, y)
        .curve_to(r - rx + kx, y, r, y + ry - ky, r, y + ry)
        .line_to(r, b - ry)
        .curve_to(r, b - ry + ky, r - rx + kx, b, r - rx, b)
        .line_to(x + rx, b)
        .curve_to(x + rx - kx, b, x, b - ry + ky, x, b - ry)
        .line_to(x, y + ry)
        .curve_to(x, y + ry - ky, x + rx - kx, y, x + rx, y)
        .close();
    p
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> PathData {
    let (kx, ky) = (KAPPA * rx, KAPPA * ry);
    let mut p = PathData::new();
    p.move_to(cx + rx, cy)
        .curve_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
        .curve_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
        .curve_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
        .curve_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
        .close();
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point, size};
    use crate::length::Dpi;
    use crate::path::PathCommand;

    fn ctx() -> LengthContext {
        LengthContext::new(Dpi::default())
    }

    #[test]
    fn zero_sized_rect_disables_rendering() {
        let s = Shape::rect(0.0, 0.0, 0.0, 10.0);
        assert_eq!(s.to_path(size(100.0, 100.0), &ctx()).unwrap(), None);
    }

    #[test]
    fn percentage_rect_uses_viewport() {
        let s = Shape::Rect {
            x: Length::percent(10.0),
            y: Length::zero(),
            width: Length::percent(50.0),
            height: Length::percent(50.0),
            rx: None,
            ry: None,
        };
        let p = s.to_path(size(200.0, 100.0), &ctx()).unwrap().unwrap();
        assert_eq!(p.commands()[0], PathCommand::MoveTo(point(20.0, 0.0)));
        assert_eq!(p.commands()[2], PathCommand::LineTo(point(120.0, 50.0)));
    }

    #[test]
    fn corner_radius_is_clamped_and_mirrored() {
        let s = Shape::Rect {
            x: Length::zero(),
            y: Length::zero(),
            width: Length::px(10.0),
            height: Length::px(20.0),
            rx: Some(Length::px(8.0)),
            ry: None,
        };
        let p = s.to_path(size(0.0, 0.0), &ctx()).unwrap().unwrap();
        // rx clamps to 5; ry mirrors the unclamped 8.
        assert_eq!(p.commands()[0], PathCommand::MoveTo(point(5.0, 0.0)));
        assert_eq!(p.commands()[3], PathCommand::LineTo(point(10.0, 12.0)));
    }

    #[test]
    fn ellipse_with_one_radius_is_circular() {
        let s = Shape::Ellipse {
            cx: Length::zero(),
            cy: Length::zero(),
            rx: Some(Length::px(4.0)),
            ry: None,
        };
        let p = s.to_path(size(0.0, 0.0), &ctx()).unwrap().unwrap();
        assert_eq!(p.commands().len(), 6);
        let PathCommand::CurveTo(_, _, end) = p.commands()[1] else {
            panic!("expected a cubic");
        };
        assert_eq!(end, point(0.0, 4.0));
    }

    #[test]
    fn single_point_polyline_is_not_rendered() {
        let s = Shape::Polyline(vec![point(1.0, 1.0)]);
        assert_eq!(s.to_path(size(0.0, 0.0), &ctx()).unwrap(), None);
        assert!(s.allows_markers());
        assert!(!Shape::rect(0.0, 0.0, 1.0, 1.0).allows_markers());
    }
}
