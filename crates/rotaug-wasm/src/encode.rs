//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png_from_image, encode_jpeg } from '@rotaug/wasm';
//!
//! const png = encode_png_from_image(result.image);
//! const jpeg = encode_jpeg(pixels, width, height, 90);
//! ```

use crate::types::JsDecodedImage;
use rotaug_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, recommended: 90)
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match width * height * 3,
/// a dimension is zero, or encoding fails internally.
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode RGB pixel data to lossless PNG bytes.
///
/// PNG keeps nearest-neighbour label maps exact, which JPEG would not.
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsDecodedImage to JPEG bytes.
#[wasm_bindgen]
pub fn encode_jpeg_from_image(image: &JsDecodedImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode_jpeg(&pixels, image.width(), image.height(), quality)
}

/// Encode a JsDecodedImage to PNG bytes.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode_png(&pixels, image.width(), image.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_pixels_encode_as_jpeg() {
        let img = JsDecodedImage::new(10, 10, vec![128u8; 10 * 10 * 3]);
        let jpeg = rotaug_core::encode::encode_jpeg(&img.pixels(), img.width(), img.height(), 90)
            .unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}
