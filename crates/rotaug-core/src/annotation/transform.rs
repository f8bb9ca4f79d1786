//! Per-encoding decomposition into points, rotation, and reassembly.

use super::{AnnotationSet, Rect, RotatedAnnotations, RotatedRect};
use crate::geometry::{min_area_rect, rotate_point, CanvasGeometry, Point, RotatedBox};

impl AnnotationSet {
    /// Remap every annotation into the canvas described by `geometry`.
    ///
    /// The output has the same encoding, count and element order as the
    /// input. Call [`AnnotationSet::validate`] first; this function assumes
    /// well-formed elements.
    pub fn transform(&self, geometry: &CanvasGeometry) -> RotatedAnnotations {
        match self {
            AnnotationSet::Points(points) => RotatedAnnotations::Points(
                points.iter().map(|p| p.rotated(geometry)).collect(),
            ),
            AnnotationSet::Rects(rects) => RotatedAnnotations::Rects(
                rects.iter().map(|r| rotate_rect(r, geometry)).collect(),
            ),
            AnnotationSet::AxisRangeRotatedRects(rows) => RotatedAnnotations::AxisRangeRotatedRects(
                rows.iter().map(|row| rotate_axis_range(row, geometry)).collect(),
            ),
            AnnotationSet::CenterSizeRotatedRects(boxes) => {
                RotatedAnnotations::CenterSizeRotatedRects(
                    boxes.iter().map(|b| rotate_box(b, geometry)).collect(),
                )
            }
            AnnotationSet::Quadrilaterals(quads) => RotatedAnnotations::Quadrilaterals(
                quads.iter().map(|q| rotate_quadrilateral(q, geometry)).collect(),
            ),
            AnnotationSet::Polygons(polygons) => RotatedAnnotations::Polygons(
                polygons
                    .iter()
                    .map(|poly| poly.iter().map(|p| p.rotated(geometry)).collect())
                    .collect(),
            ),
        }
    }
}

fn rotate_rect(rect: &Rect, geometry: &CanvasGeometry) -> RotatedRect {
    let (cx, cy) = rect.center();
    RotatedRect {
        center: rotate_point(cx, cy, geometry),
        width: rect.width,
        height: rect.height,
        angle: geometry.angle,
        corners: rect.corners().map(|corner| corner.rotated(geometry)),
    }
}

/// Only the min and max corners move; theta has the rotation subtracted.
fn rotate_axis_range(row: &[f64; 5], geometry: &CanvasGeometry) -> [f64; 5] {
    let [x_min, y_min, x_max, y_max, theta] = *row;
    let top_left = rotate_point(x_min, y_min, geometry);
    let bottom_right = rotate_point(x_max, y_max, geometry);
    [
        top_left.x as f64,
        top_left.y as f64,
        bottom_right.x as f64,
        bottom_right.y as f64,
        theta - geometry.angle as f64,
    ]
}

fn rotate_box(rotated_box: &RotatedBox, geometry: &CanvasGeometry) -> RotatedBox {
    let corners: Vec<(f64, f64)> = rotated_box
        .box_points()
        .iter()
        .map(|&(x, y)| rotate_point(x, y, geometry).to_f64())
        .collect();
    min_area_rect(&corners)
}

fn rotate_quadrilateral(quad: &[i32; 8], geometry: &CanvasGeometry) -> [i32; 8] {
    let mut out = [0; 8];
    for (src, dst) in quad.chunks_exact(2).zip(out.chunks_exact_mut(2)) {
        let p = Point::new(src[0], src[1]).rotated(geometry);
        dst[0] = p.x;
        dst[1] = p.y;
    }
    out
}
