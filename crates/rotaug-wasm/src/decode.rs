//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, image_orientation } from '@rotaug/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsDecodedImage;
use rotaug_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG image from bytes.
///
/// EXIF orientation is applied, so annotation coordinates supplied later
/// refer to the image as a viewer displays it.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported format or are
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode without applying EXIF orientation (raw stored pixel layout).
#[wasm_bindgen]
pub fn decode_image_raw(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image_no_orientation(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// EXIF orientation tag value (1-8), 1 when absent.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_of_garbage_is_normal() {
        assert_eq!(image_orientation(&[0, 1, 2, 3]), 1);
    }

    #[test]
    fn test_orientation_of_png() {
        let png = rotaug_core::encode::encode_png(&[9u8; 4 * 4 * 3], 4, 4).unwrap();
        assert_eq!(image_orientation(&png), 1);
    }
}

/// WASM-specific tests that require JsValue. Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_image_empty() {
        assert!(decode_image(&[]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_png() {
        let png = rotaug_core::encode::encode_png(&[200u8; 8 * 6 * 3], 8, 6).unwrap();
        let img = decode_image(&png).unwrap();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 6);
    }
}
