//! Image decoding for the rotation pipeline.
//!
//! Decoding is plumbing around the core: it turns JPEG or PNG bytes into the
//! RGB buffer that [`crate::rotator::Rotator`] consumes. EXIF orientation is
//! applied so that annotation coordinates line up with what a viewer shows.
//!
//! # Examples
//!
//! ```ignore
//! use rotaug_core::decode::decode_image;
//!
//! let bytes = std::fs::read("sample.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
