use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::parallel;
use morpho_image::{Image, ImageError};

/// Resize an image to a new size.
///
/// The destination image size determines the scale factors; the corner
/// pixels of source and destination are aligned.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (new_height, new_width, C).
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// The destination image must not be empty.
pub fn resize_native<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if dst.cols() == 0 || dst.rows() == 0 {
        return Err(ImageError::InvalidImageSize(
            dst.cols(),
            dst.rows(),
            1,
            1,
        ));
    }

    let step_x = if dst.cols() > 1 {
        (src.cols() - 1) as f32 / (dst.cols() - 1) as f32
    } else {
        0.0
    };
    let step_y = if dst.rows() > 1 {
        (src.rows() - 1) as f32 / (dst.rows() - 1) as f32
    } else {
        0.0
    };

    let (cols, rows) = (dst.cols(), dst.rows());
    let mut map_x_data = Vec::with_capacity(rows * cols);
    let mut map_y_data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            map_x_data.push(c as f32 * step_x);
            map_y_data.push(r as f32 * step_y);
        }
    }

    let dst_size = dst.size();
    let map_x = Image::<f32, 1>::new(dst_size, map_x_data)?;
    let map_y = Image::<f32, 1>::new(dst_size, map_y_data)?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        dst_pixel.iter_mut().enumerate().for_each(|(c, pixel)| {
            *pixel = interpolate_pixel(src, x, y, c, interpolation);
        });
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::ImageSize;

    #[test]
    fn resize_upscale() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0, 2.0, 3.0],
        )?;

        let mut dst = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0.0,
        )?;

        resize_native(&src, &mut dst, InterpolationMode::Bilinear)?;

        // corners align with the source corners
        assert_eq!(dst.get_pixel(0, 0, 0)?, 0.0);
        assert_eq!(dst.get_pixel(2, 0, 0)?, 1.0);
        assert_eq!(dst.get_pixel(0, 2, 0)?, 2.0);
        assert_eq!(dst.get_pixel(2, 2, 0)?, 3.0);

        Ok(())
    }

    #[test]
    fn resize_constant_stays_constant() -> Result<(), ImageError> {
        let src = Image::<f32, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0.5,
        )?;

        let mut dst = Image::<f32, 3>::from_size_val(
            ImageSize {
                width: 7,
                height: 5,
            },
            0.0,
        )?;

        resize_native(&src, &mut dst, InterpolationMode::Bilinear)?;

        for &val in dst.as_slice() {
            assert!((val - 0.5).abs() < 1e-6);
        }

        Ok(())
    }
}
