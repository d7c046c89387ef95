#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// multi-band image blending module.
pub mod blend;

/// morph error types.
pub mod error;

/// per-triangle homography estimation and blending module.
pub mod homography;

/// blend mask derivation module.
pub mod mask;

/// delaunay mesh and triangle index resolution module.
pub mod mesh;

/// frame orchestration module.
pub mod morph;

/// diagnostic mesh overlay module.
pub mod overlay;

/// landmark point sanitation and interpolation module.
pub mod point;

/// triangle id rasterization module.
pub mod rasterize;

/// inverse warp map construction module.
pub mod warp;

pub use crate::error::MorphError;
pub use crate::homography::{Homography, SingularPolicy};
pub use crate::morph::{draw_analysis, morph_frame, MorphInputs, MorphOutput, MorphParams};
pub use crate::point::Point2f;
