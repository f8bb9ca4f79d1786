//! Pixel resampling for rotation onto an expanded canvas.
//!
//! The warp is driven by the same [`CanvasGeometry`](crate::geometry::CanvasGeometry)
//! that remaps annotations, so a source pixel at `(x, y)` lands where
//! [`rotate_point`](crate::geometry::rotate_point) sends `(x, y)`.
//!
//! # Coordinate System
//!
//! - Pixel indices address pixel positions directly (no half-pixel shift)
//! - Positive angles rotate counter-clockwise as seen on screen
//! - Canvas regions not covered by the source take the fill color

mod rotation;

pub use rotation::{rotation_matrix, warp_rotation, InterpolationFilter};
