//! Presentation attributes, inline `style` declarations and property inheritance.

use crate::values;
use svgmetrics_core::length::{Direction, Length, LengthContext, LengthUnit};
use svgmetrics_core::node::TextAnchor;
use svgmetrics_core::style::{LineCap, LineJoin, Paint, Style, Visibility};

/// `medium`, in user units at 96 DPI (12pt).
pub const MEDIUM_FONT_SIZE: f64 = 16.0;

const FONT_SCALE: f64 = 1.2;

const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "display",
    "fill",
    "filter",
    "font-family",
    "font-size",
    "font-weight",
    "letter-spacing",
    "marker-end",
    "marker-mid",
    "marker-start",
    "overflow",
    "stroke",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-width",
    "text-anchor",
    "visibility",
];

/// Properties that flow from parent to child.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Inherited {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: Length,
    pub stroke_line_join: LineJoin,
    pub stroke_line_cap: LineCap,
    pub stroke_miter_limit: f64,
    pub font_size: f64,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    /// User units, resolved against the font size of the declaring element.
    pub letter_spacing: f64,
    pub visibility: Visibility,
    pub marker_start: Option<String>,
    pub marker_mid: Option<String>,
    pub marker_end: Option<String>,
    pub text_anchor: TextAnchor,
}

impl Default for Inherited {
    fn default() -> Self {
        let initial = Style::default();
        Self {
            fill: initial.fill,
            stroke: initial.stroke,
            stroke_width: initial.stroke_width,
            stroke_line_join: initial.stroke_line_join,
            stroke_line_cap: initial.stroke_line_cap,
            stroke_miter_limit: initial.stroke_miter_limit,
            font_size: MEDIUM_FONT_SIZE,
            font_family: None,
            font_weight: None,
            letter_spacing: 0.0,
            visibility: initial.visibility,
            marker_start: None,
            marker_mid: None,
            marker_end: None,
            text_anchor: TextAnchor::Start,
        }
    }
}

/// Everything computed for one element: the inherited set plus its own non-inherited values.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Computed {
    pub inherited: Inherited,
    pub display_none: bool,
    pub filter: Option<String>,
    pub overflow_visible: bool,
}

impl Computed {
    pub(crate) fn to_style(&self) -> Style {
        let i = &self.inherited;
        Style {
            fill: i.fill.clone(),
            stroke: i.stroke.clone(),
            stroke_width: i.stroke_width,
            stroke_line_join: i.stroke_line_join,
            stroke_line_cap: i.stroke_line_cap,
            stroke_miter_limit: i.stroke_miter_limit,
            font_size: Some(i.font_size),
            display_none: self.display_none,
            visibility: i.visibility,
            marker_start: i.marker_start.clone(),
            marker_mid: i.marker_mid.clone(),
            marker_end: i.marker_end.clone(),
            filter: self.filter.clone(),
        }
    }
}

/// Presentation attributes first, then the `style` attribute, so later entries win.
pub(crate) fn declarations<'a>(node: roxmltree::Node<'a, '_>) -> Vec<(&'a str, &'a str)> {
    let mut out: Vec<(&'a str, &'a str)> = PRESENTATION_ATTRIBUTES
        .iter()
        .filter_map(|&name| node.attribute(name).map(|value| (name, value)))
        .collect();
    if let Some(marker) = node.attribute("marker") {
        out.push(("marker", marker));
    }
    if let Some(style) = node.attribute("style") {
        out.extend(parse_inline(style));
    }
    out
}

fn parse_inline(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        let name = name.trim();
        let value = value.trim();
        let value = value.strip_suffix("!important").unwrap_or(value).trim_end();
        (!name.is_empty() && !value.is_empty()).then_some((name, value))
    })
}

pub(crate) fn compute(
    parent: &Inherited,
    declarations: &[(&str, &str)],
    ctx: &LengthContext,
    element: &str,
) -> Computed {
    let mut out = Computed {
        inherited: parent.clone(),
        ..Default::default()
    };

    let mut letter_spacing = None;
    for &(name, value) in declarations {
        if value == "inherit" {
            continue;
        }
        let parsed = if name == "letter-spacing" {
            set(&mut letter_spacing, spacing(value).map(Some))
        } else {
            apply(&mut out, parent, name, value, ctx)
        };
        if !parsed {
            tracing::warn!(element, property = name, value, "ignoring malformed property value");
        }
    }

    // `em` refers to this element's own font size, which may be declared after the spacing.
    if let Some(length) = letter_spacing {
        let ctx = ctx.with_font_size(Some(out.inherited.font_size));
        match length.resolve(0.0, Direction::Horizontal, &ctx) {
            Ok(value) => out.inherited.letter_spacing = value,
            Err(_) => tracing::warn!(element, "ignoring unresolvable letter-spacing"),
        }
    }
    out
}

/// `normal` is zero; percentages are not accepted.
fn spacing(value: &str) -> Option<Length> {
    match value {
        "normal" => Some(Length::zero()),
        _ => values::length(value).filter(|l| !l.is_percent()),
    }
}

/// Returns `false` when the value could not be parsed. Unknown properties are accepted.
fn apply(
    out: &mut Computed,
    parent: &Inherited,
    name: &str,
    value: &str,
    ctx: &LengthContext,
) -> bool {
    let s = &mut out.inherited;
    match name {
        "fill" => set(&mut s.fill, values::paint(value)),
        "stroke" => set(&mut s.stroke, values::paint(value)),
        "stroke-width" => set(&mut s.stroke_width, values::length(value)),
        "stroke-miterlimit" => set(
            &mut s.stroke_miter_limit,
            values::number(value).filter(|v| *v >= 1.0),
        ),
        "stroke-linejoin" => set(
            &mut s.stroke_line_join,
            match value {
                "miter" | "miter-clip" | "arcs" => Some(LineJoin::Miter),
                "round" => Some(LineJoin::Round),
                "bevel" => Some(LineJoin::Bevel),
                _ => None,
            },
        ),
        "stroke-linecap" => set(
            &mut s.stroke_line_cap,
            match value {
                "butt" => Some(LineCap::Butt),
                "round" => Some(LineCap::Round),
                "square" => Some(LineCap::Square),
                _ => None,
            },
        ),
        "font-size" => set(&mut s.font_size, font_size(value, parent.font_size, ctx)),
        "font-family" => {
            s.font_family = Some(value.to_string());
            true
        }
        "font-weight" => {
            s.font_weight = Some(value.to_string());
            true
        }
        "visibility" => set(
            &mut s.visibility,
            match value {
                "visible" => Some(Visibility::Visible),
                "hidden" => Some(Visibility::Hidden),
                "collapse" => Some(Visibility::Collapse),
                _ => None,
            },
        ),
        "text-anchor" => set(
            &mut s.text_anchor,
            match value {
                "start" => Some(TextAnchor::Start),
                "middle" => Some(TextAnchor::Middle),
                "end" => Some(TextAnchor::End),
                _ => None,
            },
        ),
        "marker-start" => set(&mut s.marker_start, marker_ref(value)),
        "marker-mid" => set(&mut s.marker_mid, marker_ref(value)),
        "marker-end" => set(&mut s.marker_end, marker_ref(value)),
        "marker" => {
            let Some(reference) = marker_ref(value) else {
                return false;
            };
            s.marker_start = reference.clone();
            s.marker_mid = reference.clone();
            s.marker_end = reference;
            true
        }
        "display" => {
            out.display_none = value == "none";
            true
        }
        "filter" => set(&mut out.filter, marker_ref(value)),
        "overflow" => {
            out.overflow_visible = matches!(value, "visible" | "auto");
            true
        }
        _ => true,
    }
}

fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// `none` → `Some(None)`, `url(#id)` → `Some(Some(id))`.
fn marker_ref(value: &str) -> Option<Option<String>> {
    if value == "none" {
        return Some(None);
    }
    values::func_iri(value).map(Some)
}

/// Computed font size in user units.
pub(crate) fn font_size(value: &str, parent: f64, ctx: &LengthContext) -> Option<f64> {
    let step = match value {
        "xx-small" => Some(-3),
        "x-small" => Some(-2),
        "small" => Some(-1),
        "medium" => Some(0),
        "large" => Some(1),
        "x-large" => Some(2),
        "xx-large" => Some(3),
        _ => None,
    };
    if let Some(step) = step {
        return Some(MEDIUM_FONT_SIZE * FONT_SCALE.powi(step));
    }
    match value {
        "smaller" => return Some(parent / FONT_SCALE),
        "larger" => return Some(parent * FONT_SCALE),
        _ => {}
    }

    let length = values::length(value)?;
    let ctx = ctx.with_font_size(Some(parent));
    let size = match length.unit {
        LengthUnit::Percent => parent * length.value / 100.0,
        _ => length.resolve(parent, Direction::Vertical, &ctx).ok()?,
    };
    (size >= 0.0).then_some(size)
}
