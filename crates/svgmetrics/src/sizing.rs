//! Intrinsic document size and the root's pixel mapping.

use crate::Result;
use crate::geometry::BoundingBox;
use crate::options::{MeasureOptions, PercentSizing, ViewBoxSizing};
use serde::{Deserialize, Serialize};
use svgmetrics_core::geom::{Rect, Size, Transform, size};
use svgmetrics_core::length::{Direction, Length, LengthContext};
use svgmetrics_core::node::{NodeKind, ViewportElement};
use svgmetrics_core::Document;

/// Where the document size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeSource {
    /// Root `width`/`height` (absolute, or percentages of the viewBox).
    Attributes,
    ViewBox,
    DefaultViewport,
    /// Painted extents of the content.
    ContentInk,
    /// Geometric extents of the content.
    ContentLogical,
}

/// Document size in pixels, before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentSize {
    pub width: f64,
    pub height: f64,
    pub source: SizeSource,
}

impl DocumentSize {
    pub fn to_pixels(&self) -> Dimensions {
        Dimensions::from_size(self.width, self.height)
    }
}

/// Integer pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    /// Rounds half away from zero, like `f64::round`.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            width: width.round() as i32,
            height: height.round() as i32,
        }
    }
}

/// One axis of a size that still depends on the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Axis {
    Fixed(f64),
    Ink,
    Logical,
}

impl Axis {
    fn pick(self, rect: Option<Rect>, from_width: bool) -> f64 {
        match self {
            Axis::Fixed(v) => v,
            Axis::Ink | Axis::Logical => rect
                .map(|r| if from_width { r.width } else { r.height })
                .unwrap_or(0.0),
        }
    }
}

/// The size as far as it can be known without measuring content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Declared {
    Known(DocumentSize),
    FromContent { width: Axis, height: Axis, source: SizeSource },
}

impl Declared {
    /// Completes a content-derived size from the measured whole-document box.
    pub(crate) fn finish(self, content: &BoundingBox) -> DocumentSize {
        match self {
            Declared::Known(size) => size,
            Declared::FromContent {
                width,
                height,
                source,
            } => {
                let rect_for = |axis: Axis| match axis {
                    Axis::Logical => content.logical,
                    _ => content.ink,
                };
                DocumentSize {
                    width: width.pick(rect_for(width), true),
                    height: height.pick(rect_for(height), false),
                    source,
                }
            }
        }
    }
}

fn root_element<'d>(
    document: &'d Document,
    options: &MeasureOptions,
) -> Result<Option<(&'d ViewportElement, LengthContext, Transform)>> {
    let root = document.node(document.root())?;
    Ok(match &root.kind {
        NodeKind::Svg(element) => Some((
            element,
            LengthContext::new(options.dpi).with_font_size(root.style.font_size),
            root.transform,
        )),
        _ => None,
    })
}

pub(crate) fn declared_size(document: &Document, options: &MeasureOptions) -> Result<Declared> {
    let Some((element, ctx, _)) = root_element(document, options)? else {
        return Ok(Declared::FromContent {
            width: Axis::Logical,
            height: Axis::Logical,
            source: SizeSource::ContentLogical,
        });
    };
    let default = options.default_viewport;
    let known = |width, height, source| Declared::Known(DocumentSize { width, height, source });
    let (width, height) = declared_sides(element);

    if let Some(vb) = element.view_box {
        let declared = match (width, height) {
            (None, None) => match options.view_box_sizing {
                ViewBoxSizing::ViewBox => known(vb.width, vb.height, SizeSource::ViewBox),
                ViewBoxSizing::DefaultViewport => {
                    known(default.width, default.height, SizeSource::DefaultViewport)
                }
            },
            (Some(w), Some(h)) => known(
                w.resolve(vb.width, Direction::Horizontal, &ctx)?,
                h.resolve(vb.height, Direction::Vertical, &ctx)?,
                SizeSource::Attributes,
            ),
            // The missing side follows the viewBox aspect ratio.
            (Some(w), None) => {
                let w = w.resolve(vb.width, Direction::Horizontal, &ctx)?;
                known(w, w * vb.height / vb.width, SizeSource::Attributes)
            }
            (None, Some(h)) => {
                let h = h.resolve(vb.height, Direction::Vertical, &ctx)?;
                known(h * vb.width / vb.height, h, SizeSource::Attributes)
            }
        };
        return Ok(declared);
    }

    let absolute = |l: Option<Length>| l.filter(|l| !l.is_percent());
    match (width, height) {
        (None, None) => Ok(Declared::FromContent {
            width: Axis::Logical,
            height: Axis::Logical,
            source: SizeSource::ContentLogical,
        }),
        (Some(w), Some(h)) if !w.is_percent() && !h.is_percent() => Ok(known(
            w.resolve(0.0, Direction::Horizontal, &ctx)?,
            h.resolve(0.0, Direction::Vertical, &ctx)?,
            SizeSource::Attributes,
        )),
        (w, h) => match options.percent_sizing {
            PercentSizing::ContentInk => {
                let axis = |l: Option<Length>, dir| -> Result<Axis> {
                    Ok(match absolute(l) {
                        Some(l) => Axis::Fixed(l.resolve(0.0, dir, &ctx)?),
                        None => Axis::Ink,
                    })
                };
                Ok(Declared::FromContent {
                    width: axis(w, Direction::Horizontal)?,
                    height: axis(h, Direction::Vertical)?,
                    source: SizeSource::ContentInk,
                })
            }
            PercentSizing::DefaultViewport => {
                let full = Length::percent(100.0);
                Ok(known(
                    w.unwrap_or(full)
                        .resolve(default.width, Direction::Horizontal, &ctx)?,
                    h.unwrap_or(full)
                        .resolve(default.height, Direction::Vertical, &ctx)?,
                    SizeSource::DefaultViewport,
                ))
            }
        },
    }
}

/// Base for percentages in the root's content: the viewBox, else the absolute size, else the
/// default viewport (per axis).
pub(crate) fn user_viewport(document: &Document, options: &MeasureOptions) -> Result<Size> {
    let default = options.default_viewport;
    let Some((element, ctx, _)) = root_element(document, options)? else {
        return Ok(default);
    };
    if let Some(vb) = element.view_box {
        return Ok(vb.size());
    }
    let axis = |l: Option<Length>, dir: Direction, fallback: f64| -> Result<f64> {
        Ok(match l {
            Some(l) if !l.is_percent() => l.resolve(0.0, dir, &ctx)?,
            Some(l) => l.resolve(fallback, dir, &ctx)?,
            None => fallback,
        })
    };
    let (width, height) = declared_sides(element);
    Ok(size(
        axis(width, Direction::Horizontal, default.width)?,
        axis(height, Direction::Vertical, default.height)?,
    ))
}

/// The root's `width`/`height`; negative lengths are invalid and count as absent.
fn declared_sides(element: &ViewportElement) -> (Option<Length>, Option<Length>) {
    let valid = |l: Option<Length>| l.filter(|l| l.value >= 0.0);
    (valid(element.width), valid(element.height))
}

/// Root user space → document pixels, and the viewport for the root's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RootLayout {
    pub pixel_transform: Transform,
    pub viewport: Size,
}

pub(crate) fn root_layout(
    document: &Document,
    options: &MeasureOptions,
    declared: &Declared,
) -> Result<RootLayout> {
    let viewport = user_viewport(document, options)?;
    let Some((element, _, transform)) = root_element(document, options)? else {
        return Ok(RootLayout {
            pixel_transform: Transform::identity(),
            viewport,
        });
    };
    let pixel_transform = match (&element.view_box, declared) {
        (Some(vb), Declared::Known(size)) => element
            .aspect
            .view_box_transform(vb, &Rect::from_size(size.width, size.height))
            .then(&transform),
        _ => transform,
    };
    Ok(RootLayout {
        pixel_transform,
        viewport,
    })
}
