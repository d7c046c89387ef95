use morpho_image::Image;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel to sample.
///
/// # Returns
///
/// The interpolated pixel value.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = u.trunc() as usize;
    let iv = v.trunc() as usize;

    let iu0 = iu.min(cols - 1);
    let iv0 = iv.min(rows - 1);

    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let frac_u = u.fract();
    let frac_v = v.fract();

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let data = image.as_slice();

    let p00 = data[(iv0 * cols + iu0) * C + c];
    let p01 = data[(iv0 * cols + iu1) * C + c];
    let p10 = data[(iv1 * cols + iu0) * C + c];
    let p11 = data[(iv1 * cols + iu1) * C + c];

    p00 * w00 + p01 * w01 + p10 * w10 + p11 * w11
}

#[cfg(test)]
mod tests {
    use morpho_image::{Image, ImageError, ImageSize};

    #[test]
    fn bilinear_exact_at_grid() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0, 2.0, 3.0],
        )?;

        assert_eq!(super::bilinear_interpolation(&image, 0.0, 0.0, 0), 0.0);
        assert_eq!(super::bilinear_interpolation(&image, 1.0, 1.0, 0), 3.0);

        Ok(())
    }

    #[test]
    fn bilinear_midpoint() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0, 2.0, 3.0],
        )?;

        let val = super::bilinear_interpolation(&image, 0.5, 0.5, 0);
        assert!((val - 1.5).abs() < 1e-6);

        Ok(())
    }
}
