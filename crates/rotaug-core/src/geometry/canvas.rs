//! Canvas expansion and the single point-rotation formula.
//!
//! The canvas is the bounding box of the source rectangle after rotation:
//!
//! ```text
//! new_w = ceil(|h * sin(θ)| + |w * cos(θ)|)
//! new_h = ceil(|w * sin(θ)| + |h * cos(θ)|)
//! ```
//!
//! A point is mapped into that canvas in four steps: expand by half the size
//! increase, translate to the canvas center with the y axis flipped up,
//! rotate counter-clockwise, then flip back and round up.

use serde::{Deserialize, Serialize};

use super::Point;

/// Per-call geometry of one rotation.
///
/// Built by [`compute_canvas`] from the current image's dimensions and the
/// resolved angle. It is a plain value: nothing is cached between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Source image width.
    pub width: u32,
    /// Source image height.
    pub height: u32,
    /// Width of the rotated canvas.
    pub canvas_width: u32,
    /// Height of the rotated canvas.
    pub canvas_height: u32,
    /// `canvas_width - width`. Negative when rotation narrows the bounding
    /// box, e.g. a landscape image turned by 90 degrees.
    pub width_increase: i64,
    /// `canvas_height - height`.
    pub height_increase: i64,
    /// Rotation angle in degrees.
    pub angle: i32,
    /// Rotation angle in radians.
    pub radians: f64,
}

impl CanvasGeometry {
    /// Sine and cosine of the rotation angle.
    ///
    /// Quarter turns return exact values so that 90/180/270 degree rotations
    /// produce integer canvases and drift-free corners.
    pub fn sin_cos(&self) -> (f64, f64) {
        match self.angle.rem_euclid(360) {
            0 => (0.0, 1.0),
            90 => (1.0, 0.0),
            180 => (0.0, -1.0),
            270 => (-1.0, 0.0),
            _ => self.radians.sin_cos(),
        }
    }

    /// Center of the rotated canvas, the pivot of the rotation.
    pub fn canvas_center(&self) -> (f64, f64) {
        (
            self.canvas_width as f64 / 2.0,
            self.canvas_height as f64 / 2.0,
        )
    }

    /// Offset of the source image inside the expanded canvas: half the
    /// increase on each axis. May be fractional or negative.
    pub fn image_offset(&self) -> (f64, f64) {
        (
            self.width_increase as f64 / 2.0,
            self.height_increase as f64 / 2.0,
        )
    }

    /// True when the canvas keeps the source dimensions.
    pub fn is_identity_size(&self) -> bool {
        self.width_increase == 0 && self.height_increase == 0
    }
}

/// Compute the rotated canvas for a `width` x `height` image.
///
/// Zero-sized images produce a zero-sized canvas; callers are expected to
/// reject them first.
pub fn compute_canvas(width: u32, height: u32, angle_degrees: i32) -> CanvasGeometry {
    let mut geometry = CanvasGeometry {
        width,
        height,
        canvas_width: width,
        canvas_height: height,
        width_increase: 0,
        height_increase: 0,
        angle: angle_degrees,
        radians: (angle_degrees as f64).to_radians(),
    };

    let (sin, cos) = geometry.sin_cos();
    let (w, h) = (width as f64, height as f64);

    let canvas_width = ((h * sin).abs() + (w * cos).abs()).ceil() as u32;
    let canvas_height = ((w * sin).abs() + (h * cos).abs()).ceil() as u32;

    geometry.canvas_width = canvas_width;
    geometry.canvas_height = canvas_height;
    geometry.width_increase = canvas_width as i64 - width as i64;
    geometry.height_increase = canvas_height as i64 - height as i64;
    geometry
}

/// Map a source-image coordinate into the rotated canvas.
///
/// The order of operations and the ceiling rounding are load-bearing: corner
/// order and magnitudes of every reconstructed annotation depend on them.
/// Coordinates that land outside the `i32` range saturate at its bounds.
pub fn rotate_point(x: f64, y: f64, geometry: &CanvasGeometry) -> Point {
    let (sin, cos) = geometry.sin_cos();
    let (half_w, half_h) = geometry.canvas_center();

    // 1. Position inside the expanded (pre-rotation) canvas
    let (offset_x, offset_y) = geometry.image_offset();
    let expanded_x = x + offset_x;
    let expanded_y = y + offset_y;

    // 2. Center-relative, y up
    let translated_x = expanded_x - half_w;
    let translated_y = half_h - expanded_y;

    // 3. Counter-clockwise rotation
    let rotated_x = translated_x * cos - translated_y * sin;
    let rotated_y = translated_x * sin + translated_y * cos;

    // 4. Back to canvas coordinates, y down
    Point::new(
        (rotated_x + half_w).ceil() as i32,
        (-rotated_y + half_h).ceil() as i32,
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=2000, 1u32..=2000)
    }

    proptest! {
        /// Property: every rotated corner of the source lies in the canvas,
        /// up to the one pixel the ceiling may add.
        #[test]
        fn prop_canvas_contains_rotated_corners(
            (width, height) in dimensions_strategy(),
            angle in 0i32..360,
        ) {
            let g = compute_canvas(width, height, angle);
            let (w, h) = (width as f64, height as f64);
            for (x, y) in [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)] {
                let p = rotate_point(x, y, &g);
                prop_assert!(p.x >= -1 && p.x <= g.canvas_width as i32 + 1, "x {} for {:?}", p.x, g);
                prop_assert!(p.y >= -1 && p.y <= g.canvas_height as i32 + 1, "y {} for {:?}", p.y, g);
            }
        }

        /// Property: square images never shrink under rotation.
        #[test]
        fn prop_square_canvas_never_shrinks(size in 1u32..=2000, angle in 0i32..360) {
            let g = compute_canvas(size, size, angle);
            prop_assert!(g.canvas_width >= size);
            prop_assert!(g.canvas_height >= size);
        }

        /// Property: the canvas is never smaller than the shorter source side.
        #[test]
        fn prop_canvas_at_least_short_side(
            (width, height) in dimensions_strategy(),
            angle in 0i32..360,
        ) {
            let g = compute_canvas(width, height, angle);
            let short = width.min(height);
            prop_assert!(g.canvas_width >= short);
            prop_assert!(g.canvas_height >= short);
        }

        /// Property: opposite angles need the same canvas.
        #[test]
        fn prop_opposite_angles_same_canvas(
            (width, height) in dimensions_strategy(),
            angle in 1i32..360,
        ) {
            let a = compute_canvas(width, height, angle);
            let b = compute_canvas(width, height, 360 - angle);
            prop_assert_eq!((a.canvas_width, a.canvas_height), (b.canvas_width, b.canvas_height));
        }
    }
}
