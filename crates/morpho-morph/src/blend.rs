use rayon::prelude::*;

use morpho_image::{Image, ImageError};
use morpho_imgproc::pyramid::{collapse_laplacian, gaussian_pyramid, laplacian_pyramid};

use crate::error::MorphError;

/// Blend two images through a Laplacian pyramid with a spatially varying
/// mask.
///
/// Both images are decomposed into `levels` band-pass layers, the mask into
/// a gaussian pyramid, and at each level the band-pass components are mixed
/// as `a * mask + b * (1 - mask)` before the pyramid is collapsed back to
/// full resolution. Blending each frequency band separately hides the seam
/// that a single-level mask would cut through low frequencies.
///
/// The level count is clamped to the deepest pyramid the image size allows.
///
/// # Arguments
///
/// * `a` - The first image in floating range [0, 1].
/// * `b` - The second image, same size.
/// * `mask` - The per-pixel weight of the first image, in [0, 1].
/// * `levels` - The number of pyramid levels.
///
/// # Errors
///
/// All three inputs must have the same size.
pub fn laplacian_blend(
    a: &Image<f32, 3>,
    b: &Image<f32, 3>,
    mask: &Image<f32, 1>,
    levels: usize,
) -> Result<Image<f32, 3>, MorphError> {
    if a.size() != b.size() {
        return Err(MorphError::Image(ImageError::InvalidImageSize(
            a.cols(),
            a.rows(),
            b.cols(),
            b.rows(),
        )));
    }
    if a.size() != mask.size() {
        return Err(MorphError::Image(ImageError::InvalidImageSize(
            a.cols(),
            a.rows(),
            mask.cols(),
            mask.rows(),
        )));
    }

    let pyramid_a = laplacian_pyramid(a, levels)?;
    let pyramid_b = laplacian_pyramid(b, levels)?;
    let pyramid_mask = gaussian_pyramid(mask, levels)?;

    let mut blended = Vec::with_capacity(pyramid_a.len());
    for ((level_a, level_b), level_mask) in pyramid_a
        .iter()
        .zip(pyramid_b.iter())
        .zip(pyramid_mask.iter())
    {
        blended.push(blend_level(level_a, level_b, level_mask)?);
    }

    collapse_laplacian(&blended).map_err(Into::into)
}

/// Mix one pyramid level, broadcasting the single-channel mask.
fn blend_level(
    a: &Image<f32, 3>,
    b: &Image<f32, 3>,
    mask: &Image<f32, 1>,
) -> Result<Image<f32, 3>, ImageError> {
    let mut out = Image::<f32, 3>::from_size_val(a.size(), 0.0)?;

    let cols = a.cols();
    out.as_slice_mut()
        .par_chunks_exact_mut(cols * 3)
        .zip(a.as_slice().par_chunks_exact(cols * 3))
        .zip(b.as_slice().par_chunks_exact(cols * 3))
        .zip(mask.as_slice().par_chunks_exact(cols))
        .for_each(|(((out_row, a_row), b_row), mask_row)| {
            for x in 0..cols {
                let w = mask_row[x];
                for c in 0..3 {
                    out_row[x * 3 + c] = a_row[x * 3 + c] * w + b_row[x * 3 + c] * (1.0 - w);
                }
            }
        });

    Ok(out)
}
