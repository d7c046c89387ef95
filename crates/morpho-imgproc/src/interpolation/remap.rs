use crate::parallel;

use super::interpolate::interpolate_pixel;
use super::InterpolationMode;
use morpho_image::{Image, ImageError};

/// Apply a generic geometric transformation to an image.
///
/// For every destination pixel the coordinate maps give the source position
/// to sample from. Pixels whose source position falls outside the image are
/// left untouched.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate.
/// * `map_y` - The y coordinates of the pixels to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// The mapx and mapy must have the same size, and the output image must have
/// the same size as the maps.
pub fn remap<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if map_x.size() != map_y.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.cols(),
            map_x.rows(),
            map_y.cols(),
            map_y.rows(),
        ));
    }

    if dst.size() != map_x.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.cols(),
            map_x.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        if x >= 0.0 && x < src_cols && y >= 0.0 && y < src_rows {
            dst_pixel.iter_mut().enumerate().for_each(|(c, pixel)| {
                *pixel = interpolate_pixel(src, x, y, c, interpolation);
            });
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use morpho_image::{Image, ImageError, ImageSize};

    #[test]
    fn remap_smoke() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 2,
        };

        let map_x = Image::<f32, 1>::new(new_size, vec![0.0, 2.0, 0.0, 2.0])?;
        let map_y = Image::<f32, 1>::new(new_size, vec![0.0, 0.0, 2.0, 2.0])?;

        let expected = [0.0, 2.0, 6.0, 8.0];

        let mut transformed = Image::<f32, 1>::from_size_val(new_size, 0.0)?;

        super::remap(
            &image,
            &mut transformed,
            &map_x,
            &map_y,
            super::InterpolationMode::Bilinear,
        )?;

        for (a, b) in transformed.as_slice().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }

        Ok(())
    }

    #[test]
    fn remap_identity() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0f32, 1.0, 2.0, 3.0],
        )?;

        let map_x = Image::<f32, 1>::new(image.size(), vec![0.0, 1.0, 0.0, 1.0])?;
        let map_y = Image::<f32, 1>::new(image.size(), vec![0.0, 0.0, 1.0, 1.0])?;

        let mut transformed = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        super::remap(
            &image,
            &mut transformed,
            &map_x,
            &map_y,
            super::InterpolationMode::Bilinear,
        )?;

        assert_eq!(transformed.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn remap_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0.0,
        )?;

        let map_x = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
        let map_y = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0.0,
        )?;

        let mut dst = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        let res = super::remap(
            &image,
            &mut dst,
            &map_x,
            &map_y,
            super::InterpolationMode::Bilinear,
        );
        assert!(res.is_err());

        Ok(())
    }
}
