//! Annotated rotation WASM bindings.
//!
//! Annotations cross the boundary as arrays of numeric rows, one row per
//! annotation, in the layout of the chosen encoding (see
//! `AnnotationSet::from_rows`). Rotated annotations come back as
//! `{ encoding, annotations }` objects.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const rects = [[117, 188, 108, 57]];
//! const result = rotate_annotated(image, 'rects', rects, [-15, 15], 1);
//! console.log(`rotated by ${result.angle}`);
//! const { annotations } = result.annotations();
//! const preview = result.draw_overlay(0, 255, 0);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use rotaug_core::annotation::{AnnotationEncoding, AnnotationSet};
use rotaug_core::decode::DecodedImage;
use rotaug_core::error::RotateResult;
use rotaug_core::overlay;
use rotaug_core::rotator::{AngleSpec, RotationOutput, Rotator, RotatorConfig};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, JsDecodedImage};

/// The result of one annotated rotation.
#[wasm_bindgen]
pub struct JsRotationResult {
    output: RotationOutput,
}

#[wasm_bindgen]
impl JsRotationResult {
    /// Resolved rotation angle in degrees, within [0, 360)
    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> i32 {
        self.output.angle()
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_width(&self) -> u32 {
        self.output.geometry.canvas_width
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_height(&self) -> u32 {
        self.output.geometry.canvas_height
    }

    /// The rotated canvas (a copy).
    pub fn image(&self) -> JsDecodedImage {
        JsDecodedImage::from_decoded(self.output.image.clone())
    }

    /// Rotated annotations as `{ encoding, annotations }`.
    pub fn annotations(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.output.annotations)
            .map_err(|e| JsValue::from_str(&format!("Failed to convert annotations: {}", e)))
    }

    /// Copy of the rotated canvas with the rotated annotations drawn on it.
    pub fn draw_overlay(&self, r: u8, g: u8, b: u8) -> JsDecodedImage {
        JsDecodedImage::from_decoded(overlay_output(&self.output, [r, g, b]))
    }
}

/// Rotate an image and its annotations by an angle drawn from `angle`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `encoding` - One of `points`, `rects`, `np_rotated_rects`,
///   `cv_rotated_rects`, `quadrilaterals`, `polygons`
/// * `rows` - Annotation rows as nested number arrays
/// * `angle` - `[angle]` for a fixed angle or `[min, max]` for a range
/// * `filter` - 0=Nearest, 1=Bilinear (default), 2=Lanczos3
///
/// # Errors
///
/// Returns an error for an unknown encoding, a malformed row, a bad angle
/// spec or an invalid image. Nothing is rotated in that case.
#[wasm_bindgen]
pub fn rotate_annotated(
    image: &JsDecodedImage,
    encoding: &str,
    rows: JsValue,
    angle: Vec<i32>,
    filter: u8,
) -> Result<JsRotationResult, JsValue> {
    let seed = entropy_seed();
    rotate_annotated_seeded(image, encoding, rows, angle, filter, seed)
}

/// Same as [`rotate_annotated`] with a caller-chosen seed for reproducible
/// angle draws.
#[wasm_bindgen]
pub fn rotate_annotated_seeded(
    image: &JsDecodedImage,
    encoding: &str,
    rows: JsValue,
    angle: Vec<i32>,
    filter: u8,
    seed: u64,
) -> Result<JsRotationResult, JsValue> {
    let rows: Vec<Vec<f64>> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&format!("Invalid annotation rows: {}", e)))?;

    rotate_rows(&image.to_decoded(), encoding, &rows, &angle, filter, seed)
        .map(|output| JsRotationResult { output })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse, validate and rotate. Free of JsValue so it runs on every target.
pub(crate) fn rotate_rows(
    image: &DecodedImage,
    encoding: &str,
    rows: &[Vec<f64>],
    angle: &[i32],
    filter: u8,
    seed: u64,
) -> RotateResult<RotationOutput> {
    let encoding: AnnotationEncoding = encoding.parse()?;
    let config = RotatorConfig {
        encoding,
        angle: AngleSpec::from_values(angle)?,
        filter: filter_from_u8(filter),
        ..RotatorConfig::default()
    };
    let annotations = AnnotationSet::from_rows(encoding, rows)?;

    Rotator::new(config)?.rotate_with_rng(image, &annotations, &mut StdRng::seed_from_u64(seed))
}

pub(crate) fn overlay_output(output: &RotationOutput, color: [u8; 3]) -> DecodedImage {
    let mut canvas = output.image.clone();
    overlay::draw_annotations(&mut canvas, &output.annotations, color);
    canvas
}

/// 64 bits from the JS engine's generator.
fn entropy_seed() -> u64 {
    let word = || (js_sys::Math::random() * u32::MAX as f64) as u64;
    (word() << 32) | word()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotaug_core::annotation::RotatedAnnotations;
    use rotaug_core::geometry::Point;

    #[test]
    fn test_rotate_rows_points_fixed_angle() {
        let image = DecodedImage::filled(200, 100, [50, 50, 50]);
        let rows = vec![vec![0.0, 0.0], vec![100.0, 50.0]];

        let out = rotate_rows(&image, "points", &rows, &[90], 1, 0).unwrap();
        assert_eq!(out.angle(), 90);
        assert_eq!((out.image.width, out.image.height), (100, 200));
        assert_eq!(
            out.annotations,
            RotatedAnnotations::Points(vec![Point::new(0, 200), Point::new(50, 100)])
        );
    }

    #[test]
    fn test_rotate_rows_seed_is_reproducible() {
        let image = DecodedImage::filled(40, 40, [50, 50, 50]);
        let rows = vec![vec![5.0, 5.0, 10.0, 10.0]];

        let a = rotate_rows(&image, "rects", &rows, &[-15, 15], 1, 1234).unwrap();
        let b = rotate_rows(&image, "rects", &rows, &[-15, 15], 1, 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rotate_rows_accepts_aliases() {
        let image = DecodedImage::filled(40, 40, [0, 0, 0]);
        let rows = vec![vec![20.0, 20.0, 10.0, 4.0, 0.0]];
        let out = rotate_rows(&image, "center_size_rotated_rects", &rows, &[30], 0, 0).unwrap();
        assert_eq!(out.annotations.len(), 1);
    }

    #[test]
    fn test_rotate_rows_unknown_encoding() {
        let image = DecodedImage::filled(4, 4, [0, 0, 0]);
        let err = rotate_rows(&image, "circles", &[], &[0], 1, 0).unwrap_err();
        assert_eq!(err.kind(), "unknown_encoding");
    }

    #[test]
    fn test_rotate_rows_rejects_three_value_rects() {
        let image = DecodedImage::filled(4, 4, [0, 0, 0]);
        let rows = vec![vec![1.0, 2.0, 3.0]];
        let err = rotate_rows(&image, "rects", &rows, &[15], 1, 0).unwrap_err();
        assert_eq!(err.kind(), "malformed_annotation");
    }

    #[test]
    fn test_rotate_rows_bad_angle_spec() {
        let image = DecodedImage::filled(4, 4, [0, 0, 0]);
        let err = rotate_rows(&image, "points", &[], &[1, 2, 3], 1, 0).unwrap_err();
        assert_eq!(err.kind(), "invalid_angle_spec");
    }

    #[test]
    fn test_overlay_output_marks_canvas() {
        let image = DecodedImage::filled(60, 40, [0, 0, 0]);
        let rows = vec![vec![10.0, 10.0, 50.0, 12.0, 48.0, 30.0, 8.0, 28.0]];
        let out = rotate_rows(&image, "quadrilaterals", &rows, &[15], 1, 0).unwrap();

        let drawn = overlay_output(&out, [0, 255, 0]);
        assert_ne!(drawn, out.image);
        assert_eq!((drawn.width, drawn.height), (out.image.width, out.image.height));
    }
}
