//! Annotation encodings and their remapping under rotation.
//!
//! Six encodings are supported. The selector is explicit, never inferred
//! from the data:
//!
//! | Encoding | Element | Rotated element |
//! |---|---|---|
//! | `points` | `(x, y)` | `(x, y)` |
//! | `rects` | `(x, y, w, h)` | [`RotatedRect`] |
//! | `np_rotated_rects` | `[x_min, y_min, x_max, y_max, theta]` | same row |
//! | `cv_rotated_rects` | [`RotatedBox`] | [`RotatedBox`] |
//! | `quadrilaterals` | 8 numbers, 4 corners | 8 numbers |
//! | `polygons` | 3 or more points | same number of points |

mod transform;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RotateError, RotateResult};
use crate::geometry::{Point, RotatedBox};

/// Selector for one of the supported annotation encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationEncoding {
    /// Plain points.
    #[default]
    Points,
    /// Axis-aligned `(x, y, width, height)` rectangles.
    Rects,
    /// `[x_min, y_min, x_max, y_max, theta]` rows.
    #[serde(alias = "np_rotated_rects")]
    AxisRangeRotatedRects,
    /// Center/size/angle rectangles.
    #[serde(alias = "cv_rotated_rects")]
    CenterSizeRotatedRects,
    /// Four corners flattened to eight numbers.
    Quadrilaterals,
    /// Closed polygons of any length.
    Polygons,
}

impl AnnotationEncoding {
    /// All encodings, in selector order.
    pub const ALL: [AnnotationEncoding; 6] = [
        AnnotationEncoding::Points,
        AnnotationEncoding::Rects,
        AnnotationEncoding::AxisRangeRotatedRects,
        AnnotationEncoding::CenterSizeRotatedRects,
        AnnotationEncoding::Quadrilaterals,
        AnnotationEncoding::Polygons,
    ];

    /// Canonical selector name.
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationEncoding::Points => "points",
            AnnotationEncoding::Rects => "rects",
            AnnotationEncoding::AxisRangeRotatedRects => "np_rotated_rects",
            AnnotationEncoding::CenterSizeRotatedRects => "cv_rotated_rects",
            AnnotationEncoding::Quadrilaterals => "quadrilaterals",
            AnnotationEncoding::Polygons => "polygons",
        }
    }

    /// Number of values in one flat row of this encoding, or `None` when
    /// rows have variable length (polygons).
    pub fn row_arity(self) -> Option<usize> {
        match self {
            AnnotationEncoding::Points => Some(2),
            AnnotationEncoding::Rects => Some(4),
            AnnotationEncoding::AxisRangeRotatedRects => Some(5),
            AnnotationEncoding::CenterSizeRotatedRects => Some(5),
            AnnotationEncoding::Quadrilaterals => Some(8),
            AnnotationEncoding::Polygons => None,
        }
    }
}

impl fmt::Display for AnnotationEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationEncoding {
    type Err = RotateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(AnnotationEncoding::Points),
            "rects" => Ok(AnnotationEncoding::Rects),
            "np_rotated_rects" | "axis_range_rotated_rects" => {
                Ok(AnnotationEncoding::AxisRangeRotatedRects)
            }
            "cv_rotated_rects" | "center_size_rotated_rects" => {
                Ok(AnnotationEncoding::CenterSizeRotatedRects)
            }
            "quadrilaterals" => Ok(AnnotationEncoding::Quadrilaterals),
            "polygons" => Ok(AnnotationEncoding::Polygons),
            other => Err(RotateError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Axis-aligned rectangle: top-left corner plus extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center in sub-pixel precision.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Right and bottom edges, or `None` when either leaves the `i32` range.
    pub fn far_edges(&self) -> Option<(i32, i32)> {
        Some((
            self.x.checked_add(self.width)?,
            self.y.checked_add(self.height)?,
        ))
    }

    /// Corners in top-left, top-right, bottom-right, bottom-left order.
    ///
    /// Edges past the `i32` range saturate; [`AnnotationSet::validate`]
    /// rejects such rectangles before rotation.
    pub fn corners(&self) -> [Point; 4] {
        let (x, y) = (self.x, self.y);
        let (r, b) = (
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        );
        [
            Point::new(x, y),
            Point::new(r, y),
            Point::new(r, b),
            Point::new(x, b),
        ]
    }
}

/// A rectangle after rotation, produced for the `rects` encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    /// Rotated center.
    pub center: Point,
    /// Width of the source rectangle.
    pub width: i32,
    /// Height of the source rectangle.
    pub height: i32,
    /// Rotation applied, in degrees within `[0, 360)`.
    pub angle: i32,
    /// Rotated corners, top-left, top-right, bottom-right, bottom-left of the
    /// source rectangle.
    pub corners: [Point; 4],
}

impl RotatedRect {
    /// The four rotated corners.
    pub fn box_points(&self) -> &[Point; 4] {
        &self.corners
    }
}

/// A collection of annotations in exactly one encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "annotations", rename_all = "snake_case")]
pub enum AnnotationSet {
    Points(Vec<Point>),
    Rects(Vec<Rect>),
    /// Rows of `[x_min, y_min, x_max, y_max, theta]`.
    AxisRangeRotatedRects(Vec<[f64; 5]>),
    CenterSizeRotatedRects(Vec<RotatedBox>),
    /// Four corners as `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    Quadrilaterals(Vec<[i32; 8]>),
    Polygons(Vec<Vec<Point>>),
}

/// Annotations after rotation, in the same encoding as their input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "annotations", rename_all = "snake_case")]
pub enum RotatedAnnotations {
    Points(Vec<Point>),
    Rects(Vec<RotatedRect>),
    AxisRangeRotatedRects(Vec<[f64; 5]>),
    CenterSizeRotatedRects(Vec<RotatedBox>),
    Quadrilaterals(Vec<[i32; 8]>),
    Polygons(Vec<Vec<Point>>),
}

impl RotatedAnnotations {
    pub fn encoding(&self) -> AnnotationEncoding {
        match self {
            RotatedAnnotations::Points(_) => AnnotationEncoding::Points,
            RotatedAnnotations::Rects(_) => AnnotationEncoding::Rects,
            RotatedAnnotations::AxisRangeRotatedRects(_) => {
                AnnotationEncoding::AxisRangeRotatedRects
            }
            RotatedAnnotations::CenterSizeRotatedRects(_) => {
                AnnotationEncoding::CenterSizeRotatedRects
            }
            RotatedAnnotations::Quadrilaterals(_) => AnnotationEncoding::Quadrilaterals,
            RotatedAnnotations::Polygons(_) => AnnotationEncoding::Polygons,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RotatedAnnotations::Points(v) => v.len(),
            RotatedAnnotations::Rects(v) => v.len(),
            RotatedAnnotations::AxisRangeRotatedRects(v) => v.len(),
            RotatedAnnotations::CenterSizeRotatedRects(v) => v.len(),
            RotatedAnnotations::Quadrilaterals(v) => v.len(),
            RotatedAnnotations::Polygons(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnnotationSet {
    /// An empty set in the given encoding.
    pub fn empty(encoding: AnnotationEncoding) -> Self {
        match encoding {
            AnnotationEncoding::Points => AnnotationSet::Points(Vec::new()),
            AnnotationEncoding::Rects => AnnotationSet::Rects(Vec::new()),
            AnnotationEncoding::AxisRangeRotatedRects => {
                AnnotationSet::AxisRangeRotatedRects(Vec::new())
            }
            AnnotationEncoding::CenterSizeRotatedRects => {
                AnnotationSet::CenterSizeRotatedRects(Vec::new())
            }
            AnnotationEncoding::Quadrilaterals => AnnotationSet::Quadrilaterals(Vec::new()),
            AnnotationEncoding::Polygons => AnnotationSet::Polygons(Vec::new()),
        }
    }

    pub fn encoding(&self) -> AnnotationEncoding {
        match self {
            AnnotationSet::Points(_) => AnnotationEncoding::Points,
            AnnotationSet::Rects(_) => AnnotationEncoding::Rects,
            AnnotationSet::AxisRangeRotatedRects(_) => AnnotationEncoding::AxisRangeRotatedRects,
            AnnotationSet::CenterSizeRotatedRects(_) => AnnotationEncoding::CenterSizeRotatedRects,
            AnnotationSet::Quadrilaterals(_) => AnnotationEncoding::Quadrilaterals,
            AnnotationSet::Polygons(_) => AnnotationEncoding::Polygons,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnnotationSet::Points(v) => v.len(),
            AnnotationSet::Rects(v) => v.len(),
            AnnotationSet::AxisRangeRotatedRects(v) => v.len(),
            AnnotationSet::CenterSizeRotatedRects(v) => v.len(),
            AnnotationSet::Quadrilaterals(v) => v.len(),
            AnnotationSet::Polygons(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every element of the set.
    ///
    /// Rejects negative rectangle extents, rectangles whose far edge
    /// overflows `i32`, non-finite values and polygons with fewer than
    /// three vertices.
    pub fn validate(&self) -> RotateResult<()> {
        let encoding = self.encoding();
        let malformed = |index: usize, reason: String| RotateError::MalformedAnnotation {
            index,
            encoding,
            reason,
        };

        match self {
            AnnotationSet::Points(_) | AnnotationSet::Quadrilaterals(_) => Ok(()),
            AnnotationSet::Rects(rects) => {
                for (i, r) in rects.iter().enumerate() {
                    if r.width < 0 || r.height < 0 {
                        return Err(malformed(
                            i,
                            format!("negative extent {}x{}", r.width, r.height),
                        ));
                    }
                    if r.far_edges().is_none() {
                        return Err(malformed(
                            i,
                            format!("far edge of rect at ({}, {}) overflows", r.x, r.y),
                        ));
                    }
                }
                Ok(())
            }
            AnnotationSet::AxisRangeRotatedRects(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                        return Err(malformed(i, format!("non-finite value {v}")));
                    }
                }
                Ok(())
            }
            AnnotationSet::CenterSizeRotatedRects(boxes) => {
                for (i, b) in boxes.iter().enumerate() {
                    let values = [b.center.0, b.center.1, b.size.0, b.size.1, b.angle];
                    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                        return Err(malformed(i, format!("non-finite value {v}")));
                    }
                    if b.size.0 < 0.0 || b.size.1 < 0.0 {
                        return Err(malformed(
                            i,
                            format!("negative size {}x{}", b.size.0, b.size.1),
                        ));
                    }
                }
                Ok(())
            }
            AnnotationSet::Polygons(polygons) => {
                for (i, polygon) in polygons.iter().enumerate() {
                    if polygon.len() < 3 {
                        return Err(malformed(
                            i,
                            format!("polygon needs at least 3 points, got {}", polygon.len()),
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    /// Build a set from flat numeric rows, the loosely-typed form used at
    /// language boundaries.
    ///
    /// Row layouts: points `[x, y]`, rects `[x, y, w, h]`, axis-range rects
    /// `[x_min, y_min, x_max, y_max, theta]`, center/size rects
    /// `[cx, cy, w, h, angle]`, quadrilaterals `[x1, y1, .., x4, y4]`,
    /// polygons `[x1, y1, x2, y2, ...]` with at least three points.
    /// Integer encodings reject fractional values.
    ///
    /// # Errors
    ///
    /// Returns `RotateError::MalformedAnnotation` for the first row with
    /// the wrong arity or a value the encoding cannot hold.
    pub fn from_rows(encoding: AnnotationEncoding, rows: &[Vec<f64>]) -> RotateResult<Self> {
        for (index, row) in rows.iter().enumerate() {
            check_row(encoding, index, row)?;
        }

        let ints = |row: &[f64]| row.iter().map(|&v| v as i32).collect::<Vec<i32>>();

        let set = match encoding {
            AnnotationEncoding::Points => {
                AnnotationSet::Points(rows.iter().map(|r| Point::new(r[0] as i32, r[1] as i32)).collect())
            }
            AnnotationEncoding::Rects => AnnotationSet::Rects(
                rows.iter()
                    .map(|r| Rect::new(r[0] as i32, r[1] as i32, r[2] as i32, r[3] as i32))
                    .collect(),
            ),
            AnnotationEncoding::AxisRangeRotatedRects => AnnotationSet::AxisRangeRotatedRects(
                rows.iter().map(|r| [r[0], r[1], r[2], r[3], r[4]]).collect(),
            ),
            AnnotationEncoding::CenterSizeRotatedRects => AnnotationSet::CenterSizeRotatedRects(
                rows.iter()
                    .map(|r| RotatedBox::new((r[0], r[1]), (r[2], r[3]), r[4]))
                    .collect(),
            ),
            AnnotationEncoding::Quadrilaterals => AnnotationSet::Quadrilaterals(
                rows.iter()
                    .map(|r| {
                        let v = ints(r);
                        [v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7]]
                    })
                    .collect(),
            ),
            AnnotationEncoding::Polygons => AnnotationSet::Polygons(
                rows.iter()
                    .map(|r| {
                        ints(r)
                            .chunks_exact(2)
                            .map(|xy| Point::new(xy[0], xy[1]))
                            .collect()
                    })
                    .collect(),
            ),
        };

        set.validate()?;
        Ok(set)
    }

    /// Flatten the set back into numeric rows, the inverse of
    /// [`AnnotationSet::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        match self {
            AnnotationSet::Points(points) => points
                .iter()
                .map(|p| vec![p.x as f64, p.y as f64])
                .collect(),
            AnnotationSet::Rects(rects) => rects
                .iter()
                .map(|r| vec![r.x as f64, r.y as f64, r.width as f64, r.height as f64])
                .collect(),
            AnnotationSet::AxisRangeRotatedRects(rows) => rows.iter().map(|r| r.to_vec()).collect(),
            AnnotationSet::CenterSizeRotatedRects(boxes) => boxes
                .iter()
                .map(|b| vec![b.center.0, b.center.1, b.size.0, b.size.1, b.angle])
                .collect(),
            AnnotationSet::Quadrilaterals(quads) => quads
                .iter()
                .map(|q| q.iter().map(|&v| v as f64).collect())
                .collect(),
            AnnotationSet::Polygons(polygons) => polygons
                .iter()
                .map(|poly| {
                    poly.iter()
                        .flat_map(|p| [p.x as f64, p.y as f64])
                        .collect()
                })
                .collect(),
        }
    }
}

/// Check one flat row against the layout of `encoding`.
fn check_row(encoding: AnnotationEncoding, index: usize, row: &[f64]) -> RotateResult<()> {
    let malformed = |reason: String| RotateError::MalformedAnnotation {
        index,
        encoding,
        reason,
    };

    match encoding.row_arity() {
        Some(arity) if row.len() != arity => {
            return Err(malformed(format!(
                "expected {arity} values, got {}",
                row.len()
            )));
        }
        None if row.len() % 2 != 0 => {
            return Err(malformed(format!(
                "expected x/y pairs, got {} values",
                row.len()
            )));
        }
        _ => {}
    }

    if let Some(v) = row.iter().find(|v| !v.is_finite()) {
        return Err(malformed(format!("non-finite value {v}")));
    }

    let integer_encoding = !matches!(
        encoding,
        AnnotationEncoding::AxisRangeRotatedRects | AnnotationEncoding::CenterSizeRotatedRects
    );
    if integer_encoding {
        if let Some(v) = row.iter().find(|&&v| !is_i32(v)) {
            return Err(malformed(format!("expected integer coordinate, got {v}")));
        }
    }

    Ok(())
}

fn is_i32(v: f64) -> bool {
    v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64
}
