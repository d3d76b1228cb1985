//! Absolute path data.
//!
//! Only move/line/cubic/close commands are stored; quadratic curves are elevated to cubics and
//! arcs are expected to be approximated by cubics before they reach this type.

use crate::geom::{Point, point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::LineTo(point(x, y)));
        self
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> &mut Self {
        self.commands
            .push(PathCommand::CurveTo(point(x1, y1), point(x2, y2), point(x, y)));
        self
    }

    /// Quadratic Bézier from the current point, stored as the equivalent cubic.
    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) -> &mut Self {
        let p0 = self.current_point().unwrap_or(point(0.0, 0.0));
        let c1 = point(p0.x + 2.0 / 3.0 * (x1 - p0.x), p0.y + 2.0 / 3.0 * (y1 - p0.y));
        let c2 = point(x + 2.0 / 3.0 * (x1 - x), y + 2.0 / 3.0 * (y1 - y));
        self.commands.push(PathCommand::CurveTo(c1, c2, point(x, y)));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::ClosePath);
        self
    }

    /// The pen position after the last command.
    pub fn current_point(&self) -> Option<Point> {
        let mut current = None;
        let mut subpath_start = None;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    current = Some(p);
                    subpath_start = Some(p);
                }
                PathCommand::LineTo(p) | PathCommand::CurveTo(_, _, p) => current = Some(p),
                PathCommand::ClosePath => current = subpath_start,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_is_elevated_to_cubic() {
        let mut p = PathData::new();
        p.move_to(0.0, 0.0).quad_to(3.0, 3.0, 6.0, 0.0);
        let PathCommand::CurveTo(c1, c2, end) = p.commands()[1] else {
            panic!("expected a cubic");
        };
        assert_eq!((c1.x, c1.y), (2.0, 2.0));
        assert_eq!((c2.x, c2.y), (4.0, 2.0));
        assert_eq!((end.x, end.y), (6.0, 0.0));
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let mut p = PathData::new();
        p.move_to(1.0, 2.0).line_to(5.0, 5.0).close();
        assert_eq!(p.current_point(), Some(point(1.0, 2.0)));
    }

    #[test]
    fn empty_path_has_no_commands() {
        assert!(PathData::new().is_empty());
        let mut p = PathData::new();
        p.move_to(1.0, 1.0);
        assert!(!p.is_empty());
    }
}
