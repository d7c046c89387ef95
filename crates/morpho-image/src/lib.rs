#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image error types.
pub mod error;

/// image container and pixel conversions.
pub mod image;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
