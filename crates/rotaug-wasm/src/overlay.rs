//! Annotation drawing WASM bindings, for eyeballing augmentation output.

use rotaug_core::annotation::{AnnotationEncoding, AnnotationSet};
use rotaug_core::decode::DecodedImage;
use rotaug_core::error::RotateResult;
use rotaug_core::overlay;
use wasm_bindgen::prelude::*;

use crate::types::JsDecodedImage;

/// Draw source annotations onto a copy of `image`.
///
/// `rows` uses the same layout as `rotate_annotated`. Points and axis-range
/// corners are drawn as small circles, every other encoding as an outline.
#[wasm_bindgen]
pub fn draw_annotations(
    image: &JsDecodedImage,
    encoding: &str,
    rows: JsValue,
    r: u8,
    g: u8,
    b: u8,
) -> Result<JsDecodedImage, JsValue> {
    let rows: Vec<Vec<f64>> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&format!("Invalid annotation rows: {}", e)))?;

    draw_rows(image.to_decoded(), encoding, &rows, [r, g, b])
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn draw_rows(
    mut image: DecodedImage,
    encoding: &str,
    rows: &[Vec<f64>],
    color: [u8; 3],
) -> RotateResult<DecodedImage> {
    let encoding: AnnotationEncoding = encoding.parse()?;
    let annotations = AnnotationSet::from_rows(encoding, rows)?;
    overlay::draw_annotation_set(&mut image, &annotations, color);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_rows_polygon() {
        let image = DecodedImage::filled(20, 20, [0, 0, 0]);
        let rows = vec![vec![2.0, 2.0, 15.0, 2.0, 8.0, 15.0]];
        let drawn = draw_rows(image, "polygons", &rows, [255, 0, 255]).unwrap();
        assert_eq!(drawn.pixel(2, 2), Some([255, 0, 255]));
        assert_eq!(drawn.pixel(15, 2), Some([255, 0, 255]));
    }

    #[test]
    fn test_draw_rows_far_off_polygon() {
        let image = DecodedImage::filled(16, 16, [0, 0, 0]);
        let rows = vec![vec![-2e9, 0.0, 2e9, 0.0, 0.0, 5.0]];
        let drawn = draw_rows(image, "polygons", &rows, [255, 0, 0]).unwrap();
        assert_eq!(drawn.pixel(8, 0), Some([255, 0, 0]));
    }

    #[test]
    fn test_draw_rows_bad_encoding() {
        let image = DecodedImage::filled(4, 4, [0, 0, 0]);
        assert!(draw_rows(image, "lines", &[], [1, 1, 1]).is_err());
    }
}
