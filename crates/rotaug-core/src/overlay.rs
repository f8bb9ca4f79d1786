//! Drawing annotations onto an image for visual inspection.
//!
//! Points and the corner pair of axis-range rows are drawn as small circle
//! markers; every other encoding is drawn as a closed outline. Lines use
//! integer Bresenham stepping and anything outside the image is clipped.

use crate::annotation::{AnnotationSet, RotatedAnnotations};
use crate::decode::DecodedImage;
use crate::geometry::{Point, RotatedBox};

/// Radius of point markers, in pixels.
pub const MARKER_RADIUS: i32 = 1;

enum Shape {
    Marker(Point),
    Outline(Vec<Point>),
}

/// Pixels on the segment from `from` to `to`, both ends included.
pub fn line_points(from: Point, to: Point) -> Vec<Point> {
    if from == to {
        return vec![from];
    }

    let (x0, y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x1 > x0 { 1 } else { -1 };
    let sy = if y1 > y0 { 1 } else { -1 };

    let npts = dx.max(dy) + 1;
    let mut points = Vec::with_capacity(npts as usize);
    let (mut x, mut y) = (x0, y0);

    if dx >= dy {
        // Step along x
        let mut err = dx / 2;
        for _ in 0..npts {
            points.push(Point::new(x as i32, y as i32));
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        // Step along y
        let mut err = dy / 2;
        for _ in 0..npts {
            points.push(Point::new(x as i32, y as i32));
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    points
}

/// Clip the segment to the pixel rectangle `[0, width) x [0, height)`
/// (Liang-Barsky). Returns `None` when nothing of it is visible.
pub fn clip_segment(from: Point, to: Point, width: u32, height: u32) -> Option<(Point, Point)> {
    if width == 0 || height == 0 {
        return None;
    }

    let (x0, y0) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
    let (x_max, y_max) = ((width - 1) as f64, (height - 1) as f64);

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        Point::new(
            (x0 + t * dx).round().clamp(0.0, x_max) as i32,
            (y0 + t * dy).round().clamp(0.0, y_max) as i32,
        )
    };
    Some((at(t0), at(t1)))
}

/// Draw the visible part of a segment. Only clipped pixels are rasterized,
/// so far-off endpoints cost nothing.
pub fn draw_line(image: &mut DecodedImage, from: Point, to: Point, color: [u8; 3]) {
    let Some((from, to)) = clip_segment(from, to, image.width, image.height) else {
        return;
    };
    for p in line_points(from, to) {
        image.put_pixel(p.x as i64, p.y as i64, color);
    }
}

/// Circle outline of `radius` around `center` (midpoint algorithm).
pub fn draw_marker(image: &mut DecodedImage, center: Point, radius: i32, color: [u8; 3]) {
    let (cx, cy) = (center.x as i64, center.y as i64);
    if radius <= 0 {
        image.put_pixel(cx, cy, color);
        return;
    }

    let (mut x, mut y, mut err) = (radius as i64, 0i64, 1 - radius as i64);
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            image.put_pixel(cx + px, cy + py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Closed outline through `vertices`, last vertex joined back to the first.
pub fn draw_polygon(image: &mut DecodedImage, vertices: &[Point], color: [u8; 3]) {
    match vertices {
        [] => {}
        [single] => image.put_pixel(single.x as i64, single.y as i64, color),
        _ => {
            for (i, &from) in vertices.iter().enumerate() {
                let to = vertices[(i + 1) % vertices.len()];
                draw_line(image, from, to, color);
            }
        }
    }
}

/// Draw rotated annotations onto the rotated canvas.
pub fn draw_annotations(image: &mut DecodedImage, annotations: &RotatedAnnotations, color: [u8; 3]) {
    let shapes: Vec<Shape> = match annotations {
        RotatedAnnotations::Points(points) => points.iter().copied().map(Shape::Marker).collect(),
        RotatedAnnotations::Rects(rects) => rects
            .iter()
            .map(|r| Shape::Outline(r.box_points().to_vec()))
            .collect(),
        RotatedAnnotations::AxisRangeRotatedRects(rows) => axis_range_markers(rows),
        RotatedAnnotations::CenterSizeRotatedRects(boxes) => box_outlines(boxes),
        RotatedAnnotations::Quadrilaterals(quads) => quad_outlines(quads),
        RotatedAnnotations::Polygons(polygons) => {
            polygons.iter().cloned().map(Shape::Outline).collect()
        }
    };
    draw_shapes(image, &shapes, color);
}

/// Draw annotations in their source encoding onto the source image.
pub fn draw_annotation_set(image: &mut DecodedImage, annotations: &AnnotationSet, color: [u8; 3]) {
    let shapes: Vec<Shape> = match annotations {
        AnnotationSet::Points(points) => points.iter().copied().map(Shape::Marker).collect(),
        AnnotationSet::Rects(rects) => rects
            .iter()
            .map(|r| Shape::Outline(r.corners().to_vec()))
            .collect(),
        AnnotationSet::AxisRangeRotatedRects(rows) => axis_range_markers(rows),
        AnnotationSet::CenterSizeRotatedRects(boxes) => box_outlines(boxes),
        AnnotationSet::Quadrilaterals(quads) => quad_outlines(quads),
        AnnotationSet::Polygons(polygons) => polygons.iter().cloned().map(Shape::Outline).collect(),
    };
    draw_shapes(image, &shapes, color);
}

fn draw_shapes(image: &mut DecodedImage, shapes: &[Shape], color: [u8; 3]) {
    for shape in shapes {
        match shape {
            Shape::Marker(p) => draw_marker(image, *p, MARKER_RADIUS, color),
            Shape::Outline(vertices) => draw_polygon(image, vertices, color),
        }
    }
}

fn axis_range_markers(rows: &[[f64; 5]]) -> Vec<Shape> {
    rows.iter()
        .flat_map(|r| {
            [
                Shape::Marker(Point::new(r[0] as i32, r[1] as i32)),
                Shape::Marker(Point::new(r[2] as i32, r[3] as i32)),
            ]
        })
        .collect()
}

fn box_outlines(boxes: &[RotatedBox]) -> Vec<Shape> {
    boxes
        .iter()
        .map(|b| {
            Shape::Outline(
                b.box_points()
                    .iter()
                    .map(|&(x, y)| Point::new(x as i32, y as i32))
                    .collect(),
            )
        })
        .collect()
}

fn quad_outlines(quads: &[[i32; 8]]) -> Vec<Shape> {
    quads
        .iter()
        .map(|q| {
            Shape::Outline(
                q.chunks_exact(2)
                    .map(|xy| Point::new(xy[0], xy[1]))
                    .collect(),
            )
        })
        .collect()
}
