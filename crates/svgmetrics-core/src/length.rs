//! CSS/SVG lengths and their resolution to user units.

use crate::error::{Error, Result};
use crate::geom::Size;
use serde::{Deserialize, Serialize};

pub const POINTS_PER_INCH: f64 = 72.0;
pub const CM_PER_INCH: f64 = 2.54;
pub const MM_PER_INCH: f64 = 25.4;
pub const PICA_PER_INCH: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Unitless numbers and `px` are both user units.
    Px,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
    Em,
    Ex,
    Percent,
}

impl LengthUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Em => "em",
            LengthUnit::Ex => "ex",
            LengthUnit::Percent => "%",
        }
    }
}

/// Which viewport extent a percentage refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Percentages of the normalized diagonal, `sqrt((w² + h²) / 2)`.
    Both,
}

impl Direction {
    pub fn reference(self, viewport: Size) -> f64 {
        match self {
            Direction::Horizontal => viewport.width,
            Direction::Vertical => viewport.height,
            Direction::Both => {
                ((viewport.width * viewport.width + viewport.height * viewport.height) / 2.0)
                    .sqrt()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

impl Dpi {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn for_direction(self, direction: Direction) -> f64 {
        match direction {
            Direction::Horizontal => self.x,
            Direction::Vertical => self.y,
            Direction::Both => (self.x * self.y).sqrt(),
        }
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self { x: 96.0, y: 96.0 }
    }
}

/// Unit conversion context supplied by style resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LengthContext {
    pub dpi: Dpi,
    /// Computed font size in user units; required for `em`/`ex`.
    pub font_size: Option<f64>,
}

impl LengthContext {
    pub fn new(dpi: Dpi) -> Self {
        Self {
            dpi,
            font_size: None,
        }
    }

    pub fn with_font_size(self, font_size: Option<f64>) -> Self {
        Self { font_size, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    pub const fn percent(value: f64) -> Self {
        Self::new(value, LengthUnit::Percent)
    }

    pub const fn zero() -> Self {
        Self::px(0.0)
    }

    pub fn is_percent(&self) -> bool {
        self.unit == LengthUnit::Percent
    }

    /// Resolves to user units against an explicit percentage base.
    pub fn resolve(&self, reference: f64, direction: Direction, ctx: &LengthContext) -> Result<f64> {
        let dpi = ctx.dpi.for_direction(direction);
        let v = self.value;
        Ok(match self.unit {
            LengthUnit::Px => v,
            LengthUnit::In => v * dpi,
            LengthUnit::Cm => v * dpi / CM_PER_INCH,
            LengthUnit::Mm => v * dpi / MM_PER_INCH,
            LengthUnit::Pt => v * dpi / POINTS_PER_INCH,
            LengthUnit::Pc => v * dpi / PICA_PER_INCH,
            LengthUnit::Percent => reference * v / 100.0,
            LengthUnit::Em => v * self.font_size(ctx)?,
            LengthUnit::Ex => v * self.font_size(ctx)? / 2.0,
        })
    }

    /// Resolves against the current viewport, picking the percentage base from `direction`.
    pub fn resolve_in(&self, viewport: Size, direction: Direction, ctx: &LengthContext) -> Result<f64> {
        self.resolve(direction.reference(viewport), direction, ctx)
    }

    fn font_size(&self, ctx: &LengthContext) -> Result<f64> {
        ctx.font_size.ok_or_else(|| Error::MissingContext {
            length: self.to_string(),
            missing: "a font size",
        })
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}
