use serde::{Deserialize, Serialize};

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Builds a transform from SVG `matrix(a b c d e f)` components.
pub fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Transform {
    Transform::new(a, b, c, d, e, f)
}

/// Axis-aligned rectangle in user units.
///
/// Width and height are never negative; constructors normalize flipped extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_extents(x, y, x + width, y + height)
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn from_extents(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        size(self.width, self.height)
    }

    /// True when the rectangle covers no area (it may still have a position).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_extents(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(Rect::from_extents(x0, y0, x1, y1))
    }

    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::from_extents(
            self.x - dx,
            self.y - dy,
            self.right() + dx,
            self.bottom() + dy,
        )
    }

    /// Maps the four corners through `transform` and returns their bounding rectangle.
    pub fn transform(&self, transform: &Transform) -> Rect {
        if *transform == Transform::identity() {
            return *self;
        }
        let corners = [
            point(self.x, self.y),
            point(self.right(), self.y),
            point(self.x, self.bottom()),
            point(self.right(), self.bottom()),
        ];
        Bounds::from_points(corners.iter().map(|p| transform.transform_point(*p)))
            .map(|b| b.to_rect())
            .unwrap_or(*self)
    }
}

/// Union over optional rectangles; `None` (no extent) is the identity element.
pub fn union_rects(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (Some(r), None) | (None, Some(r)) => Some(r),
        (None, None) => None,
    }
}

/// Min/max accumulator used while scanning geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let mut b = Self::from_point(it.next()?);
        for p in it {
            b.include_point(p);
        }
        Some(b)
    }

    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn include(&mut self, other: &Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_extents(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Adds `p` to an optional accumulator, creating it on first use.
pub fn include_point(bounds: &mut Option<Bounds>, p: Point) {
    match bounds {
        Some(b) => b.include_point(p),
        None => *bounds = Some(Bounds::from_point(p)),
    }
}
