//! Rotaug Core - rotation augmentation for annotated images
//!
//! This crate rotates an image by an arbitrary angle onto an enlarged canvas
//! and remaps its annotations so they stay aligned with the rotated content.
//! Six annotation encodings are supported: points, rects, axis-range rotated
//! rects, center/size rotated rects, quadrilaterals and polygons.
//!
//! The pipeline for one call:
//! 1. Validate encoding, annotations and image
//! 2. Resolve the angle (fixed, or drawn from an inclusive range)
//! 3. Compute the canvas geometry
//! 4. Warp the image and remap every annotation point

pub mod annotation;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod rotator;
pub mod transform;

pub use annotation::{AnnotationEncoding, AnnotationSet, Rect, RotatedAnnotations, RotatedRect};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{encode_jpeg, encode_png, EncodeError};
pub use error::{RotateError, RotateResult};
pub use geometry::{compute_canvas, min_area_rect, rotate_point, CanvasGeometry, Point, RotatedBox};
pub use overlay::{draw_annotation_set, draw_annotations};
pub use rotator::{
    normalize_angle, resolve_angle, AngleSpec, RotationOutput, Rotator, RotatorConfig,
};
pub use transform::{rotation_matrix, warp_rotation, InterpolationFilter};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rotate_then_draw() {
        let rotator = Rotator::new(RotatorConfig::new(
            AnnotationEncoding::Quadrilaterals,
            AngleSpec::Fixed(15),
        ))
        .unwrap();
        let image = DecodedImage::filled(64, 48, [40, 40, 40]);
        let quads = AnnotationSet::from_rows(
            AnnotationEncoding::Quadrilaterals,
            &[vec![10.0, 10.0, 30.0, 12.0, 28.0, 30.0, 8.0, 26.0]],
        )
        .unwrap();

        let mut out = rotator
            .rotate_with_rng(&image, &quads, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(out.angle(), 15);

        let before = out.image.clone();
        draw_annotations(&mut out.image, &out.annotations, [0, 255, 0]);
        assert_ne!(out.image, before);
    }

    #[test]
    fn test_encode_rotated_output() {
        let rotator = Rotator::new(RotatorConfig::default()).unwrap();
        let image = DecodedImage::filled(32, 32, [200, 100, 50]);
        let out = rotator
            .rotate_with_rng(
                &image,
                &AnnotationSet::Points(vec![Point::new(16, 16)]),
                &mut StdRng::seed_from_u64(11),
            )
            .unwrap();

        let png = encode_png(&out.image.pixels, out.image.width, out.image.height).unwrap();
        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded, out.image);
    }
}
