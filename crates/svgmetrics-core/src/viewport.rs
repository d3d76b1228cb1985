//! viewBox and `preserveAspectRatio` handling.

use crate::geom::{Rect, Size, Transform, size};
use serde::{Deserialize, Serialize};

/// A user-space rectangle mapped onto a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Returns `None` for non-positive or non-finite sizes, which disable rendering.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn size(&self) -> Size {
        size(self.width, self.height)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align1D {
    Min,
    Mid,
    Max,
}

impl Align1D {
    fn offset(self, free: f64) -> f64 {
        match self {
            Align1D::Min => 0.0,
            Align1D::Mid => free / 2.0,
            Align1D::Max => free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitMode {
    Meet,
    Slice,
}

/// `preserveAspectRatio`; `align == None` stretches non-uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub align: Option<(Align1D, Align1D)>,
    pub fit: FitMode,
}

impl AspectRatio {
    pub const STRETCH: AspectRatio = AspectRatio {
        align: None,
        fit: FitMode::Meet,
    };

    pub fn new(x: Align1D, y: Align1D, fit: FitMode) -> Self {
        Self {
            align: Some((x, y)),
            fit,
        }
    }

    /// Transform that maps `view_box` user units onto `viewport` (in parent units).
    pub fn view_box_transform(&self, view_box: &ViewBox, viewport: &Rect) -> Transform {
        let sx = viewport.width / view_box.width;
        let sy = viewport.height / view_box.height;

        let (sx, sy, tx, ty) = match self.align {
            None => (sx, sy, viewport.x, viewport.y),
            Some((ax, ay)) => {
                let s = match self.fit {
                    FitMode::Meet => sx.min(sy),
                    FitMode::Slice => sx.max(sy),
                };
                let free_w = viewport.width - view_box.width * s;
                let free_h = viewport.height - view_box.height * s;
                (s, s, viewport.x + ax.offset(free_w), viewport.y + ay.offset(free_h))
            }
        };

        Transform::translation(-view_box.x, -view_box.y)
            .then_scale(sx, sy)
            .then_translate(euclid::vec2(tx, ty))
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::new(Align1D::Mid, Align1D::Mid, FitMode::Meet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;

    fn vb(x: f64, y: f64, w: f64, h: f64) -> ViewBox {
        ViewBox::new(x, y, w, h).unwrap()
    }

    #[test]
    fn degenerate_view_boxes_are_rejected() {
        assert!(ViewBox::new(0.0, 0.0, 0.0, 10.0).is_none());
        assert!(ViewBox::new(0.0, 0.0, 10.0, -1.0).is_none());
        assert!(ViewBox::new(0.0, 0.0, f64::NAN, 1.0).is_none());
    }

    #[test]
    fn meet_centers_the_smaller_axis() {
        let t = AspectRatio::default()
            .view_box_transform(&vb(0.0, 0.0, 10.0, 10.0), &Rect::new(0.0, 0.0, 100.0, 50.0));
        let p0 = t.transform_point(point(0.0, 0.0));
        let p1 = t.transform_point(point(10.0, 10.0));
        assert_eq!((p0.x, p0.y), (25.0, 0.0));
        assert_eq!((p1.x, p1.y), (75.0, 50.0));
    }

    #[test]
    fn slice_overflows_the_larger_axis() {
        let ar = AspectRatio::new(Align1D::Min, Align1D::Max, FitMode::Slice);
        let t = ar.view_box_transform(&vb(0.0, 0.0, 10.0, 10.0), &Rect::new(0.0, 0.0, 100.0, 50.0));
        let p1 = t.transform_point(point(10.0, 10.0));
        assert_eq!((p1.x, p1.y), (100.0, 50.0));
        let p0 = t.transform_point(point(0.0, 0.0));
        assert_eq!((p0.x, p0.y), (0.0, -50.0));
    }

    #[test]
    fn stretch_scales_each_axis() {
        let t = AspectRatio::STRETCH
            .view_box_transform(&vb(10.0, 20.0, 10.0, 10.0), &Rect::new(5.0, 5.0, 100.0, 50.0));
        let p = t.transform_point(point(20.0, 30.0));
        assert_eq!((p.x, p.y), (105.0, 55.0));
    }
}
