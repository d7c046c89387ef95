use morpho_image::{Image, ImageError};
use morpho_imgproc::{color::gray_from_rgb, parallel};

use crate::error::MorphError;

/// Derive the blend mask from a guidance image and the mask ratio.
///
/// The guidance image is a structure/edge response of the second source;
/// its inverted grayscale couples the blending boundary to image content
/// while `mask_ratio` applies the global linear control:
///
/// mask = clamp((1 - mask_ratio) - (1 - gray(guidance)) * mask_ratio, 0, 1)
///
/// A mask value of one gives the pixel entirely to the first warped source,
/// zero entirely to the second. At `mask_ratio` 0 the mask is all ones; at 1
/// any structure in the guidance flips the pixel to the second source.
///
/// # Arguments
///
/// * `guidance` - The guidance image in floating range [0, 1].
/// * `mask_ratio` - The global blend control in [0, 1].
/// * `dst` - The output mask, same size as the guidance image.
pub fn blend_mask(
    guidance: &Image<f32, 3>,
    mask_ratio: f32,
    dst: &mut Image<f32, 1>,
) -> Result<(), MorphError> {
    if guidance.size() != dst.size() {
        return Err(MorphError::Image(ImageError::InvalidImageSize(
            guidance.cols(),
            guidance.rows(),
            dst.cols(),
            dst.rows(),
        )));
    }

    let mut gray = Image::<f32, 1>::from_size_val(guidance.size(), 0.0)?;
    gray_from_rgb(guidance, &mut gray)?;

    parallel::par_iter_rows(&gray, dst, |gray_pixel, dst_pixel| {
        let inverted = 1.0 - gray_pixel[0];
        dst_pixel[0] = ((1.0 - mask_ratio) - inverted * mask_ratio).clamp(0.0, 1.0);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::ImageSize;

    const SIZE: ImageSize = ImageSize {
        width: 2,
        height: 2,
    };

    #[test]
    fn ratio_zero_is_all_ones() -> Result<(), MorphError> {
        let guidance = Image::<f32, 3>::from_size_val(SIZE, 0.3)?;
        let mut mask = Image::<f32, 1>::from_size_val(SIZE, 0.0)?;

        blend_mask(&guidance, 0.0, &mut mask)?;

        for &m in mask.as_slice() {
            assert!((m - 1.0).abs() < 1e-6);
        }

        Ok(())
    }

    #[test]
    fn ratio_one_follows_guidance() -> Result<(), MorphError> {
        // white guidance: inverted gray is zero, mask stays zero at ratio 1
        let guidance = Image::<f32, 3>::from_size_val(SIZE, 1.0)?;
        let mut mask = Image::<f32, 1>::from_size_val(SIZE, 0.5)?;

        blend_mask(&guidance, 1.0, &mut mask)?;

        for &m in mask.as_slice() {
            assert!(m.abs() < 1e-5);
        }

        Ok(())
    }

    #[test]
    fn mask_is_clamped() -> Result<(), MorphError> {
        // black guidance at full ratio drives the raw value to -1
        let guidance = Image::<f32, 3>::from_size_val(SIZE, 0.0)?;
        let mut mask = Image::<f32, 1>::from_size_val(SIZE, 0.0)?;

        blend_mask(&guidance, 1.0, &mut mask)?;

        for &m in mask.as_slice() {
            assert!((0.0..=1.0).contains(&m));
            assert_eq!(m, 0.0);
        }

        Ok(())
    }

    #[test]
    fn size_mismatch_is_rejected() -> Result<(), MorphError> {
        let guidance = Image::<f32, 3>::from_size_val(SIZE, 0.0)?;
        let mut mask = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0.0,
        )?;

        assert!(blend_mask(&guidance, 0.5, &mut mask).is_err());

        Ok(())
    }
}
