//! Coordinate geometry for rotation with canvas expansion.
//!
//! # Coordinate System
//!
//! - Pixel space: origin top-left, x grows right, y grows down
//! - Angles are in degrees; positive = counter-clockwise as seen on screen
//! - Transformed coordinates are integers, rounded up (ceiling)
//!
//! Every annotation encoding is remapped through [`rotate_point`], which uses
//! the [`CanvasGeometry`] computed once per rotation call by
//! [`compute_canvas`].

mod canvas;
mod min_area;

use serde::{Deserialize, Serialize};

pub use canvas::{compute_canvas, rotate_point, CanvasGeometry};
pub use min_area::{min_area_rect, RotatedBox};

/// An integer point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotate this point into the canvas described by `geometry`.
    #[inline]
    pub fn rotated(self, geometry: &CanvasGeometry) -> Point {
        rotate_point(self.x as f64, self.y as f64, geometry)
    }

    pub(crate) fn to_f64(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (i32, i32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}
