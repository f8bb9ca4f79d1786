//! Image rotation with nearest, bilinear and Lanczos3 interpolation.
//!
//! The rotation uses inverse mapping: for each pixel of the output canvas we
//! compute which source position lands there and interpolate around it.
//!
//! The forward transform rotates the source, shifted by half the canvas
//! increase, about the canvas center `(cx, cy)`:
//! ```text
//! | cos   sin   (1 - cos) * cx - sin * cy |
//! | -sin  cos   sin * cx + (1 - cos) * cy |
//! ```
//! Its inverse is the transposed rotation with the translation undone. Source
//! positions outside the image read as the fill color.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decode::DecodedImage;
use crate::geometry::CanvasGeometry;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationFilter {
    /// Nearest neighbour. Keeps label maps and masks free of blended values.
    Nearest,
    /// Bilinear interpolation over the 2x2 neighbourhood.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation over the 6x6 neighbourhood. Sharper, slower.
    Lanczos3,
}

impl InterpolationFilter {
    /// Parse a filter name (`nearest`, `bilinear`, `lanczos3`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nearest" => Some(InterpolationFilter::Nearest),
            "bilinear" | "linear" => Some(InterpolationFilter::Bilinear),
            "lanczos3" | "lanczos" => Some(InterpolationFilter::Lanczos3),
            _ => None,
        }
    }
}

/// Forward 2x3 affine matrix rotating about the canvas center.
///
/// Unit scale, angle from `geometry`. Maps positions in the expanded canvas
/// (source position plus [`CanvasGeometry::image_offset`]) to positions in
/// the rotated canvas.
pub fn rotation_matrix(geometry: &CanvasGeometry) -> [[f64; 3]; 2] {
    let (sin, cos) = geometry.sin_cos();
    let (cx, cy) = geometry.canvas_center();
    [
        [cos, sin, (1.0 - cos) * cx - sin * cy],
        [-sin, cos, sin * cx + (1.0 - cos) * cy],
    ]
}

/// Invert a rotation-plus-translation matrix.
fn invert_rigid(m: &[[f64; 3]; 2]) -> [[f64; 3]; 2] {
    let [[a, b, tx], [c, d, ty]] = *m;
    // Orthonormal rotation: the inverse is the transpose
    [
        [a, c, -(a * tx + c * ty)],
        [b, d, -(b * tx + d * ty)],
    ]
}

/// Rotate `image` onto the canvas described by `geometry`.
///
/// # Arguments
///
/// * `image` - Source image; its dimensions must match `geometry`
/// * `geometry` - Canvas computed for this image and angle
/// * `filter` - Interpolation method
/// * `fill` - Color of canvas regions the source does not cover
///
/// # Returns
///
/// New `DecodedImage` of `geometry.canvas_width` x `geometry.canvas_height`.
pub fn warp_rotation(
    image: &DecodedImage,
    geometry: &CanvasGeometry,
    filter: InterpolationFilter,
    fill: [u8; 3],
) -> DecodedImage {
    let (dst_w, dst_h) = (geometry.canvas_width, geometry.canvas_height);

    // Fast path: zero rotation leaves the buffer untouched
    if geometry.sin_cos() == (0.0, 1.0) && (dst_w, dst_h) == (image.width, image.height) {
        return image.clone();
    }

    let forward = rotation_matrix(geometry);
    let inverse = invert_rigid(&forward);
    let (offset_x, offset_y) = geometry.image_offset();
    trace!(?forward, offset_x, offset_y, "rotation matrix");

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let (x, y) = (dst_x as f64, dst_y as f64);

            // Position in the expanded canvas, then in the source image
            let src_x = inverse[0][0] * x + inverse[0][1] * y + inverse[0][2] - offset_x;
            let src_y = inverse[1][0] * x + inverse[1][1] * y + inverse[1][2] - offset_y;

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y, fill),
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y, fill),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y, fill),
            };
            output.extend_from_slice(&pixel);
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

/// Get a pixel as [f64; 3], or the fill color outside the image.
#[inline]
fn get_pixel_f64(image: &DecodedImage, px: i64, py: i64, fill: [u8; 3]) -> [f64; 3] {
    let inside = px >= 0 && py >= 0 && px < image.width as i64 && py < image.height as i64;
    let p = if inside {
        image.pixel(px as u32, py as u32).unwrap_or(fill)
    } else {
        fill
    };
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    let px = (x + 0.5).floor() as i64;
    let py = (y + 0.5).floor() as i64;
    get_pixel_f64(image, px, py, fill).map(to_u8)
}

/// Sample a pixel using bilinear interpolation.
///
/// Neighbours outside the image contribute the fill color, so edges blend
/// into the background instead of being cut off.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    let (w, h) = (image.width as f64, image.height as f64);

    // Entirely outside the 2x2 reach of the image
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return fill;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let (x1, y1) = (x0 + 1, y0 + 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0, fill);
    let p10 = get_pixel_f64(image, x1, y0, fill);
    let p01 = get_pixel_f64(image, x0, y1, fill);
    let p11 = get_pixel_f64(image, x1, y1, fill);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = to_u8(v);
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighbourhood.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    let (w, h) = (image.width as f64, image.height as f64);

    if x <= -3.0 || y <= -3.0 || x >= w + 2.0 || y >= h + 2.0 {
        return fill;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px, py, fill);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y, fill);
    }

    sum.map(|s| to_u8(s / weight_sum))
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{compute_canvas, rotate_point};

    const FILL: [u8; 3] = [0, 0, 0];

    /// Gradient test image.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    /// Every pixel gets a distinct, non-black color.
    fn labelled_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8 + 1, y as u8 + 1, 200]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn warp(image: &DecodedImage, angle: i32, filter: InterpolationFilter) -> DecodedImage {
        let geometry = compute_canvas(image.width, image.height, angle);
        warp_rotation(image, &geometry, filter, FILL)
    }

    #[test]
    fn test_no_rotation() {
        let img = test_image(100, 50);
        let result = warp(&img, 0, InterpolationFilter::Bilinear);
        assert_eq!(result, img);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let img = test_image(30, 20);
        assert_eq!(warp(&img, 360, InterpolationFilter::Lanczos3), img);
    }

    #[test]
    fn test_output_matches_canvas() {
        let img = test_image(300, 200);
        let geometry = compute_canvas(300, 200, 15);
        let result = warp_rotation(&img, &geometry, InterpolationFilter::Bilinear, FILL);
        assert_eq!(result.width, geometry.canvas_width);
        assert_eq!(result.height, geometry.canvas_height);
        assert_eq!(result.pixels.len(), result.expected_byte_size());
    }

    #[test]
    fn test_180_degree_rotation_pixels() {
        let img = labelled_image(4, 2);
        let result = warp(&img, 180, InterpolationFilter::Bilinear);

        assert_eq!((result.width, result.height), (4, 2));
        assert_eq!(result.pixel(1, 1), img.pixel(3, 1));
        assert_eq!(result.pixel(3, 1), img.pixel(1, 1));
        // Column 0 maps beyond the right edge
        assert_eq!(result.pixel(0, 0), Some(FILL));
        assert_eq!(result.pixel(0, 1), Some(FILL));
    }

    #[test]
    fn test_90_degree_rotation_swaps_dimensions() {
        let img = labelled_image(4, 2);
        let result = warp(&img, 90, InterpolationFilter::Nearest);

        assert_eq!((result.width, result.height), (2, 4));
        assert_eq!(result.pixel(0, 1), img.pixel(3, 0));
    }

    #[test]
    fn test_pixels_follow_points_on_quarter_turns() {
        for (w, h) in [(4, 2), (5, 3), (7, 4), (8, 3)] {
            let img = labelled_image(w, h);
            for angle in [0, 90, 180, 270] {
                let geometry = compute_canvas(w, h, angle);
                for filter in [
                    InterpolationFilter::Nearest,
                    InterpolationFilter::Bilinear,
                    InterpolationFilter::Lanczos3,
                ] {
                    let result = warp_rotation(&img, &geometry, filter, FILL);
                    for sy in 0..h {
                        for sx in 0..w {
                            let p = rotate_point(sx as f64, sy as f64, &geometry);
                            if p.x < 0 || p.y < 0 {
                                continue;
                            }
                            if let Some(pixel) = result.pixel(p.x as u32, p.y as u32) {
                                assert_eq!(
                                    Some(pixel),
                                    img.pixel(sx, sy),
                                    "{w}x{h} at {angle} ({filter:?}), source ({sx}, {sy})"
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_fill_color_in_corners() {
        let img = DecodedImage::filled(40, 40, [255, 255, 255]);
        let geometry = compute_canvas(40, 40, 45);
        let result = warp_rotation(&img, &geometry, InterpolationFilter::Bilinear, [9, 8, 7]);
        assert_eq!(result.pixel(0, 0), Some([9, 8, 7]));
        let (cx, cy) = (result.width / 2, result.height / 2);
        assert_eq!(result.pixel(cx, cy), Some([255, 255, 255]));
    }

    #[test]
    fn test_rotation_matrix_inverse() {
        let geometry = compute_canvas(300, 200, 15);
        let m = rotation_matrix(&geometry);
        let inv = invert_rigid(&m);
        let (x, y) = (12.5, 77.0);
        let fx = m[0][0] * x + m[0][1] * y + m[0][2];
        let fy = m[1][0] * x + m[1][1] * y + m[1][2];
        let bx = inv[0][0] * fx + inv[0][1] * fy + inv[0][2];
        let by = inv[1][0] * fx + inv[1][1] * fy + inv[1][2];
        assert!((bx - x).abs() < 1e-9);
        assert!((by - y).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_matrix_fixes_center() {
        let geometry = compute_canvas(640, 480, 30);
        let m = rotation_matrix(&geometry);
        let (cx, cy) = geometry.canvas_center();
        assert!((m[0][0] * cx + m[0][1] * cy + m[0][2] - cx).abs() < 1e-9);
        assert!((m[1][0] * cx + m[1][1] * cy + m[1][2] - cy).abs() < 1e-9);
    }

    #[test]
    fn test_filter_from_name() {
        assert_eq!(
            InterpolationFilter::from_name("Nearest"),
            Some(InterpolationFilter::Nearest)
        );
        assert_eq!(
            InterpolationFilter::from_name("lanczos3"),
            Some(InterpolationFilter::Lanczos3)
        );
        assert_eq!(InterpolationFilter::from_name("cubic"), None);
    }

    #[test]
    fn test_bilinear_vs_lanczos_same_dimensions() {
        let img = test_image(50, 50);
        let bilinear = warp(&img, 15, InterpolationFilter::Bilinear);
        let lanczos = warp(&img, 15, InterpolationFilter::Lanczos3);
        assert_eq!(bilinear.width, lanczos.width);
        assert_eq!(bilinear.height, lanczos.height);
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        let w = lanczos_weight(0.0, 3.0);
        assert!((w - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        let w1 = lanczos_weight(1.5, 3.0);
        let w2 = lanczos_weight(-1.5, 3.0);
        assert!((w1 - w2).abs() < 1e-10);
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = DecodedImage::new(1, 1, vec![128, 128, 128]);
        let result = warp(&img, 45, InterpolationFilter::Bilinear);
        assert!(result.width >= 1);
        assert!(result.height >= 1);
    }

    #[test]
    fn test_very_thin_image_rotation() {
        let img = test_image(100, 1);
        let result = warp(&img, 45, InterpolationFilter::Lanczos3);
        assert!(result.width > 0);
        assert!(result.height > 0);
    }
}
