//! Attribute value parsing on top of `svgtypes`.
//!
//! Every parser returns `None` for malformed input; the caller decides whether that is worth a
//! warning.

use std::str::FromStr;
use svgmetrics_core::geom::{Point, Transform, matrix, point};
use svgmetrics_core::length::{Length, LengthUnit};
use svgmetrics_core::path::PathData;
use svgmetrics_core::style::Paint;
use svgmetrics_core::viewport::{Align1D, AspectRatio, FitMode, ViewBox};

pub(crate) fn length(value: &str) -> Option<Length> {
    let parsed = svgtypes::Length::from_str(value).ok()?;
    let unit = match parsed.unit {
        svgtypes::LengthUnit::None | svgtypes::LengthUnit::Px => LengthUnit::Px,
        svgtypes::LengthUnit::Em => LengthUnit::Em,
        svgtypes::LengthUnit::Ex => LengthUnit::Ex,
        svgtypes::LengthUnit::In => LengthUnit::In,
        svgtypes::LengthUnit::Cm => LengthUnit::Cm,
        svgtypes::LengthUnit::Mm => LengthUnit::Mm,
        svgtypes::LengthUnit::Pt => LengthUnit::Pt,
        svgtypes::LengthUnit::Pc => LengthUnit::Pc,
        svgtypes::LengthUnit::Percent => LengthUnit::Percent,
    };
    parsed
        .number
        .is_finite()
        .then(|| Length::new(parsed.number, unit))
}

pub(crate) fn number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `None` also for a viewBox with a non-positive size, which disables it.
pub(crate) fn view_box(value: &str) -> Option<ViewBox> {
    let vb = svgtypes::ViewBox::from_str(value).ok()?;
    ViewBox::new(vb.x, vb.y, vb.w, vb.h)
}

pub(crate) fn aspect_ratio(value: &str) -> Option<AspectRatio> {
    let parsed = svgtypes::AspectRatio::from_str(value).ok()?;
    use svgtypes::Align;
    let align = match parsed.align {
        Align::None => return Some(AspectRatio::STRETCH),
        Align::XMinYMin => (Align1D::Min, Align1D::Min),
        Align::XMidYMin => (Align1D::Mid, Align1D::Min),
        Align::XMaxYMin => (Align1D::Max, Align1D::Min),
        Align::XMinYMid => (Align1D::Min, Align1D::Mid),
        Align::XMidYMid => (Align1D::Mid, Align1D::Mid),
        Align::XMaxYMid => (Align1D::Max, Align1D::Mid),
        Align::XMinYMax => (Align1D::Min, Align1D::Max),
        Align::XMidYMax => (Align1D::Mid, Align1D::Max),
        Align::XMaxYMax => (Align1D::Max, Align1D::Max),
    };
    let fit = if parsed.slice {
        FitMode::Slice
    } else {
        FitMode::Meet
    };
    Some(AspectRatio::new(align.0, align.1, fit))
}

pub(crate) fn transform(value: &str) -> Option<Transform> {
    let t = svgtypes::Transform::from_str(value).ok()?;
    let m = matrix(t.a, t.b, t.c, t.d, t.e, t.f);
    [t.a, t.b, t.c, t.d, t.e, t.f]
        .iter()
        .all(|v| v.is_finite())
        .then_some(m)
}

pub(crate) fn paint(value: &str) -> Option<Paint> {
    let paint = svgtypes::Paint::from_str(value).ok()?;
    Some(match paint {
        svgtypes::Paint::None => Paint::None,
        svgtypes::Paint::FuncIRI(id, _) => Paint::Server(id.to_string()),
        _ => Paint::Solid,
    })
}

/// `url(#id)` → `id`. `none` and anything else yield `None`.
pub(crate) fn func_iri(value: &str) -> Option<String> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?.trim();
    let inner = inner.trim_matches(|c| c == '"' || c == '\'');
    fragment(inner)
}

/// `#id` → `id`; references into other documents are not followed.
pub(crate) fn fragment(value: &str) -> Option<String> {
    let id = value.trim().strip_prefix('#')?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Angle in degrees.
pub(crate) fn angle(value: &str) -> Option<f64> {
    let angle = svgtypes::Angle::from_str(value).ok()?;
    let degrees = angle.to_degrees();
    degrees.is_finite().then_some(degrees)
}

pub(crate) fn points(value: &str) -> Vec<Point> {
    svgtypes::PointsParser::from(value)
        .map(|(x, y)| point(x, y))
        .collect()
}

/// Path data with arcs and shorthand segments already converted. Parsing stops at the first
/// error and keeps what came before it, as renderers do.
pub(crate) fn path(value: &str) -> (PathData, bool) {
    use svgtypes::SimplePathSegment as Seg;

    let mut data = PathData::new();
    let mut complete = true;
    for segment in svgtypes::SimplifyingPathParser::from(value) {
        let Ok(segment) = segment else {
            complete = false;
            break;
        };
        match segment {
            Seg::MoveTo { x, y } => data.move_to(x, y),
            Seg::LineTo { x, y } => data.line_to(x, y),
            Seg::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => data.curve_to(x1, y1, x2, y2, x, y),
            Seg::Quadratic { x1, y1, x, y } => data.quad_to(x1, y1, x, y),
            Seg::ClosePath => data.close(),
        };
    }
    (data, complete)
}
