mod bilinear;
mod interpolate;
mod nearest;
mod remap;

pub use interpolate::{interpolate_pixel, InterpolationMode};
pub use remap::remap;
