//! Center/size/angle rectangles and the minimum-area enclosing rectangle.
//!
//! [`RotatedBox`] follows the OpenCV `RotatedRect` layout: the width edge
//! runs along `(cos a, sin a)` in image space (y down), so a positive angle
//! turns the box clockwise on screen. [`min_area_rect`] returns boxes in the
//! same convention with `angle` in `[0, 90)`, which means
//! `min_area_rect(&b.box_points())` reproduces `b` up to that normalization.

use serde::{Deserialize, Serialize};

/// A rectangle given by center, size and rotation angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotatedBox {
    /// Center `(x, y)`.
    pub center: (f64, f64),
    /// `(width, height)`.
    pub size: (f64, f64),
    /// Rotation in degrees.
    pub angle: f64,
}

impl RotatedBox {
    pub fn new(center: (f64, f64), size: (f64, f64), angle: f64) -> Self {
        Self {
            center,
            size,
            angle,
        }
    }

    /// The four corners of the box.
    ///
    /// Order matches OpenCV `boxPoints`: for `angle == 0` this is
    /// bottom-left, top-left, top-right, bottom-right.
    pub fn box_points(&self) -> [(f64, f64); 4] {
        let (cx, cy) = self.center;
        let (w, h) = self.size;
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let a = sin * 0.5;
        let b = cos * 0.5;

        let p0 = (cx - a * h - b * w, cy + b * h - a * w);
        let p1 = (cx + a * h - b * w, cy - b * h - a * w);
        let p2 = (2.0 * cx - p0.0, 2.0 * cy - p0.1);
        let p3 = (2.0 * cx - p1.0, 2.0 * cy - p1.1);

        [p0, p1, p2, p3]
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.size.0 * self.size.1
    }
}

/// Find the smallest-area rectangle, at any orientation, enclosing `points`.
///
/// Uses rotating calipers over the convex hull: the optimal rectangle has one
/// side collinear with a hull edge. Returns a zero box for empty input; a
/// single point yields a zero-size box at that point, and collinear points a
/// box of height zero.
pub fn min_area_rect(points: &[(f64, f64)]) -> RotatedBox {
    let hull = convex_hull(points);

    match hull.len() {
        0 => return RotatedBox::default(),
        1 => return RotatedBox::new(hull[0], (0.0, 0.0), 0.0),
        _ => {}
    }

    let n = hull.len();
    let mut best: Option<(f64, RotatedBox)> = None;

    for i in 0..n {
        let origin = hull[i];
        let next = hull[(i + 1) % n];
        let (ex, ey) = (next.0 - origin.0, next.1 - origin.1);
        let len = ex.hypot(ey);
        if len < f64::EPSILON {
            continue;
        }

        // Unit edge direction and its perpendicular
        let (ux, uy) = (ex / len, ey / len);
        let (vx, vy) = (-uy, ux);

        let mut min_u = f64::MAX;
        let mut max_u = f64::MIN;
        let mut min_v = f64::MAX;
        let mut max_v = f64::MIN;
        for p in &hull {
            let (dx, dy) = (p.0 - origin.0, p.1 - origin.1);
            let proj_u = dx * ux + dy * uy;
            let proj_v = dx * vx + dy * vy;
            min_u = min_u.min(proj_u);
            max_u = max_u.max(proj_u);
            min_v = min_v.min(proj_v);
            max_v = max_v.max(proj_v);
        }

        let width = max_u - min_u;
        let height = max_v - min_v;
        let area = width * height;

        let better = match &best {
            None => true,
            Some((best_area, _)) => area < *best_area,
        };
        if better {
            let mid_u = (min_u + max_u) / 2.0;
            let mid_v = (min_v + max_v) / 2.0;
            let center = (
                origin.0 + mid_u * ux + mid_v * vx,
                origin.1 + mid_u * uy + mid_v * vy,
            );
            let angle = uy.atan2(ux).to_degrees();
            best = Some((area, normalize_box(center, width, height, angle)));
        }
    }

    best.map(|(_, rect)| rect).unwrap_or_default()
}

/// Bring `angle` into `[0, 90)`, swapping the sides when the width axis is
/// turned by a quarter.
fn normalize_box(center: (f64, f64), width: f64, height: f64, angle: f64) -> RotatedBox {
    let mut angle = angle.rem_euclid(180.0);
    // rem_euclid rounds tiny negatives up to the modulus itself
    if angle >= 180.0 {
        angle -= 180.0;
    }
    let (mut width, mut height) = (width, height);
    if angle >= 90.0 {
        angle -= 90.0;
        std::mem::swap(&mut width, &mut height);
    }
    RotatedBox::new(center, (width, height), angle)
}

/// Convex hull by Andrew's monotone chain, counter-clockwise in a y-up frame,
/// collinear points dropped.
fn convex_hull(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<(f64, f64)> = Vec::with_capacity(pts.len() * 2);

    // Lower hull
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper hull
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    hull.pop();
    hull
}

/// Z component of `(b - a) x (c - a)`.
fn cross(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the rectangle encloses every input point.
        #[test]
        fn prop_min_area_rect_encloses_points(
            pts in prop::collection::vec((-500i32..500, -500i32..500), 3..20),
        ) {
            let pts: Vec<(f64, f64)> = pts.into_iter().map(|(x, y)| (x as f64, y as f64)).collect();
            let rect = min_area_rect(&pts);

            let (sin, cos) = rect.angle.to_radians().sin_cos();
            for &(x, y) in &pts {
                let dx = x - rect.center.0;
                let dy = y - rect.center.1;
                let along = dx * cos + dy * sin;
                let across = -dx * sin + dy * cos;
                prop_assert!(along.abs() <= rect.size.0 / 2.0 + 1e-6);
                prop_assert!(across.abs() <= rect.size.1 / 2.0 + 1e-6);
            }
        }

        /// Property: angles stay in [0, 90).
        #[test]
        fn prop_min_area_rect_angle_range(
            pts in prop::collection::vec((-500i32..500, -500i32..500), 1..20),
        ) {
            let pts: Vec<(f64, f64)> = pts.into_iter().map(|(x, y)| (x as f64, y as f64)).collect();
            let rect = min_area_rect(&pts);
            prop_assert!(rect.angle >= 0.0 && rect.angle < 90.0);
        }
    }
}
