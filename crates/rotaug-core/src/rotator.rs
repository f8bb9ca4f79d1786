//! Rotation of an image together with its annotations.
//!
//! A [`Rotator`] holds immutable settings ([`RotatorConfig`]). Each call takes
//! the image and annotations explicitly and returns a fresh
//! [`RotationOutput`]; nothing is retained between calls, so one rotator can
//! be shared across threads.
//!
//! # Example
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use rotaug_core::{AnnotationSet, AngleSpec, Point, Rotator, RotatorConfig};
//!
//! let rotator = Rotator::new(RotatorConfig {
//!     angle: AngleSpec::Range { min: -15, max: 15 },
//!     ..RotatorConfig::default()
//! })?;
//! let points = AnnotationSet::Points(vec![Point::new(10, 20)]);
//! let mut rng = StdRng::seed_from_u64(7);
//! let out = rotator.rotate_with_rng(&image, &points, &mut rng)?;
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annotation::{AnnotationEncoding, AnnotationSet, RotatedAnnotations};
use crate::decode::DecodedImage;
use crate::error::{RotateError, RotateResult};
use crate::geometry::{compute_canvas, CanvasGeometry};
use crate::transform::{warp_rotation, InterpolationFilter};

/// How the rotation angle is chosen for each call, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleSpec {
    /// Always rotate by this angle.
    Fixed(i32),
    /// Draw uniformly from `min..=max` on every call.
    Range { min: i32, max: i32 },
}

impl Default for AngleSpec {
    fn default() -> Self {
        AngleSpec::Range { min: -15, max: 15 }
    }
}

impl AngleSpec {
    /// Build from the loosely-typed form: one value is a fixed angle, two
    /// values an inclusive range.
    pub fn from_values(values: &[i32]) -> RotateResult<Self> {
        let spec = match *values {
            [angle] => AngleSpec::Fixed(angle),
            [min, max] => AngleSpec::Range { min, max },
            _ => {
                return Err(RotateError::InvalidAngleSpec(format!(
                    "expected one angle or a [min, max] pair, got {} values",
                    values.len()
                )))
            }
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> RotateResult<()> {
        match *self {
            AngleSpec::Range { min, max } if min > max => Err(RotateError::InvalidAngleSpec(
                format!("range minimum {min} exceeds maximum {max}"),
            )),
            _ => Ok(()),
        }
    }

    /// Resolve to a concrete angle in `[0, 360)`.
    ///
    /// Only ranges consume randomness; a fixed angle never touches `rng`.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let raw = match *self {
            AngleSpec::Fixed(angle) => angle,
            AngleSpec::Range { min, max } if min >= max => min,
            AngleSpec::Range { min, max } => rng.random_range(min..=max),
        };
        normalize_angle(raw)
    }
}

/// Draw an angle from `spec` and normalize it into `[0, 360)`.
pub fn resolve_angle<R: Rng + ?Sized>(spec: &AngleSpec, rng: &mut R) -> i32 {
    spec.resolve(rng)
}

/// Normalize an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_angle(angle: i32) -> i32 {
    angle.rem_euclid(360)
}

/// Settings for a [`Rotator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorConfig {
    /// The only annotation encoding this rotator accepts.
    pub encoding: AnnotationEncoding,
    /// Fixed angle or inclusive range, in degrees.
    pub angle: AngleSpec,
    /// Pixel interpolation for the image warp.
    pub filter: InterpolationFilter,
    /// RGB color of canvas regions not covered by the source image.
    pub fill: [u8; 3],
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            encoding: AnnotationEncoding::Points,
            angle: AngleSpec::default(),
            filter: InterpolationFilter::Bilinear,
            fill: [0, 0, 0],
        }
    }
}

impl RotatorConfig {
    pub fn new(encoding: AnnotationEncoding, angle: AngleSpec) -> Self {
        Self {
            encoding,
            angle,
            ..Self::default()
        }
    }
}

/// Result of one rotation call.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationOutput {
    /// The rotated canvas.
    pub image: DecodedImage,
    /// Annotations remapped into the canvas, in the input encoding.
    pub annotations: RotatedAnnotations,
    /// Geometry of this call.
    pub geometry: CanvasGeometry,
}

impl RotationOutput {
    /// The resolved angle in `[0, 360)`.
    pub fn angle(&self) -> i32 {
        self.geometry.angle
    }
}

/// Rotates images and keeps their annotations aligned.
#[derive(Debug, Clone)]
pub struct Rotator {
    config: RotatorConfig,
}

impl Rotator {
    /// Create a rotator, rejecting an invalid angle spec up front.
    pub fn new(config: RotatorConfig) -> RotateResult<Self> {
        config.angle.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }

    pub fn encoding(&self) -> AnnotationEncoding {
        self.config.encoding
    }

    /// Rotate using the thread-local random generator.
    #[cfg(feature = "thread-rng")]
    pub fn rotate(
        &self,
        image: &DecodedImage,
        annotations: &AnnotationSet,
    ) -> RotateResult<RotationOutput> {
        self.rotate_with_rng(image, annotations, &mut rand::rng())
    }

    /// Rotate with an explicit random source.
    ///
    /// # Errors
    ///
    /// Every check runs before the angle is drawn or any pixel is touched:
    /// - `EncodingMismatch` when `annotations` is not in the configured encoding
    /// - `MalformedAnnotation` for the first bad element
    /// - `InvalidImage` for a zero-sized image or a short pixel buffer
    pub fn rotate_with_rng<R: Rng + ?Sized>(
        &self,
        image: &DecodedImage,
        annotations: &AnnotationSet,
        rng: &mut R,
    ) -> RotateResult<RotationOutput> {
        self.check_request(image, annotations).inspect_err(|err| {
            warn!(kind = err.kind(), %err, "rejected rotation request");
        })?;

        let angle = self.config.angle.resolve(rng);
        Ok(self.apply(image, annotations, angle))
    }

    /// Rotate by an explicit angle, ignoring the configured angle spec.
    pub fn rotate_by(
        &self,
        image: &DecodedImage,
        annotations: &AnnotationSet,
        angle: i32,
    ) -> RotateResult<RotationOutput> {
        self.check_request(image, annotations).inspect_err(|err| {
            warn!(kind = err.kind(), %err, "rejected rotation request");
        })?;

        Ok(self.apply(image, annotations, normalize_angle(angle)))
    }

    fn check_request(&self, image: &DecodedImage, annotations: &AnnotationSet) -> RotateResult<()> {
        if annotations.encoding() != self.config.encoding {
            return Err(RotateError::EncodingMismatch {
                expected: self.config.encoding,
                found: annotations.encoding(),
            });
        }
        annotations.validate()?;
        check_image(image)
    }

    fn apply(&self, image: &DecodedImage, annotations: &AnnotationSet, angle: i32) -> RotationOutput {
        let geometry = compute_canvas(image.width, image.height, angle);
        let rotated = warp_rotation(image, &geometry, self.config.filter, self.config.fill);
        let annotations = annotations.transform(&geometry);

        debug!(
            angle,
            src_width = image.width,
            src_height = image.height,
            canvas_width = geometry.canvas_width,
            canvas_height = geometry.canvas_height,
            encoding = %annotations.encoding(),
            count = annotations.len(),
            "rotated image"
        );

        RotationOutput {
            image: rotated,
            annotations,
            geometry,
        }
    }
}

fn check_image(image: &DecodedImage) -> RotateResult<()> {
    if image.width == 0 || image.height == 0 {
        return Err(RotateError::InvalidImage(format!(
            "zero-sized image {}x{}",
            image.width, image.height
        )));
    }
    if image.pixels.len() != image.expected_byte_size() {
        return Err(RotateError::InvalidImage(format!(
            "pixel buffer has {} bytes, expected {} for {}x{} RGB",
            image.pixels.len(),
            image.expected_byte_size(),
            image.width,
            image.height
        )));
    }
    Ok(())
}
