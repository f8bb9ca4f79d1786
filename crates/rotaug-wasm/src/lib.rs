//! Rotaug WASM - WebAssembly bindings for rotaug
//!
//! This crate exposes the rotaug-core rotation pipeline to
//! JavaScript/TypeScript, for augmenting annotated images in the browser or
//! in Node.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG, PNG, EXIF orientation)
//! - `encode` - Image encoding bindings (JPEG, PNG)
//! - `rotate` - Annotated rotation
//! - `overlay` - Annotation drawing for visual checks
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, rotate_annotated } from '@rotaug/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const result = rotate_annotated(image, 'polygons', polygons, [-15, 15], 1);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod overlay;
mod rotate;
mod types;

// Re-export public types
pub use decode::{decode_image, decode_image_raw, image_orientation};
pub use encode::{encode_jpeg, encode_jpeg_from_image, encode_png, encode_png_from_image};
pub use overlay::draw_annotations;
pub use rotate::{rotate_annotated, rotate_annotated_seeded, JsRotationResult};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Names accepted by the `encoding` argument of the rotation bindings.
#[wasm_bindgen]
pub fn supported_encodings() -> Vec<String> {
    rotaug_core::AnnotationEncoding::ALL
        .iter()
        .map(|e| e.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_supported_encodings() {
        let names = supported_encodings();
        assert_eq!(names.len(), 6);
        assert!(names.iter().any(|n| n == "np_rotated_rects"));
        assert!(names.iter().any(|n| n == "cv_rotated_rects"));
    }
}
