use crate::filter::separable_filter;
use crate::interpolation::InterpolationMode;
use crate::parallel;
use crate::resize::resize_native;
use morpho_image::{Image, ImageError, ImageSize};

fn get_pyramid_gaussian_kernel() -> Vec<f32> {
    // The 2D kernel is the separable outer product of this vector:
    // [1.0, 4.0, 6.0, 4.0, 1.0] / 16.0
    [1.0, 4.0, 6.0, 4.0, 1.0].iter().map(|&x| x / 16.0).collect()
}

/// The deepest pyramid that can be built for an image size.
///
/// Each level halves the smaller image dimension; the coarsest level must
/// keep at least one pixel.
pub fn max_pyramid_levels(size: ImageSize) -> usize {
    let mut dim = size.width.min(size.height);
    let mut levels = 0;
    while dim > 1 {
        dim = dim.div_ceil(2);
        levels += 1;
    }
    levels
}

/// Blur an image and then downsample it by a factor of two.
///
/// # Arguments
///
/// * `src` - The source image with shape (height, width, C).
/// * `dst` - The destination image with shape (ceil(height/2), ceil(width/2), C).
///
/// # Errors
///
/// The destination image must have half the source size, rounded up.
pub fn pyrdown<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    let expected_width = src.width().div_ceil(2);
    let expected_height = src.height().div_ceil(2);

    if dst.width() != expected_width || dst.height() != expected_height {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected_width,
            expected_height,
        ));
    }

    let kernel = get_pyramid_gaussian_kernel();
    let mut blurred = Image::<f32, C>::from_size_val(src.size(), 0.0)?;
    separable_filter(src, &mut blurred, &kernel, &kernel)?;

    // take every other pixel
    let cols = src.cols();
    let blurred_slice = blurred.as_slice();
    let (dst_cols, dst_rows) = (dst.cols(), dst.rows());
    let dst_slice = dst.as_slice_mut();
    for y in 0..dst_rows {
        for x in 0..dst_cols {
            let src_base = (y * 2 * cols + x * 2) * C;
            let dst_base = (y * dst_cols + x) * C;
            dst_slice[dst_base..dst_base + C]
                .copy_from_slice(&blurred_slice[src_base..src_base + C]);
        }
    }

    Ok(())
}

/// Upsample an image and then blur it.
///
/// This function scales the input image up to the destination size using
/// bilinear interpolation and then applies a gaussian blur to smooth the
/// result.
///
/// # Arguments
///
/// * `src` - The source image to be upsampled.
/// * `dst` - The destination image; its size halved (rounded up) must equal
///   the source size.
pub fn pyrup<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    if dst.width().div_ceil(2) != src.width() || dst.height().div_ceil(2) != src.height() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width() * 2,
            src.height() * 2,
        ));
    }

    let mut upsampled = Image::<f32, C>::from_size_val(dst.size(), 0.0)?;
    resize_native(src, &mut upsampled, InterpolationMode::Bilinear)?;

    let kernel = get_pyramid_gaussian_kernel();
    separable_filter(&upsampled, dst, &kernel, &kernel)?;

    Ok(())
}

/// Build a gaussian pyramid with `levels` downsampling steps.
///
/// The returned vector holds `levels + 1` images, the first one being the
/// source itself. The level count is clamped so that the coarsest level
/// keeps at least one pixel.
pub fn gaussian_pyramid<const C: usize>(
    src: &Image<f32, C>,
    levels: usize,
) -> Result<Vec<Image<f32, C>>, ImageError> {
    let levels = levels.min(max_pyramid_levels(src.size()));

    let mut pyramid = Vec::with_capacity(levels + 1);
    pyramid.push(src.clone());

    for i in 0..levels {
        let prev = &pyramid[i];
        let size = ImageSize {
            width: prev.width().div_ceil(2),
            height: prev.height().div_ceil(2),
        };
        let mut down = Image::<f32, C>::from_size_val(size, 0.0)?;
        pyrdown(prev, &mut down)?;
        pyramid.push(down);
    }

    Ok(pyramid)
}

/// Build a laplacian pyramid with `levels` band-pass layers.
///
/// The returned vector holds `levels` band-pass images followed by the
/// low-resolution gaussian residual as the last element. Collapsing the
/// pyramid with [`collapse_laplacian`] reconstructs the source exactly.
pub fn laplacian_pyramid<const C: usize>(
    src: &Image<f32, C>,
    levels: usize,
) -> Result<Vec<Image<f32, C>>, ImageError> {
    let gaussian = gaussian_pyramid(src, levels)?;

    let mut pyramid = Vec::with_capacity(gaussian.len());
    for i in 0..gaussian.len() - 1 {
        let mut up = Image::<f32, C>::from_size_val(gaussian[i].size(), 0.0)?;
        pyrup(&gaussian[i + 1], &mut up)?;

        let mut band = Image::<f32, C>::from_size_val(gaussian[i].size(), 0.0)?;
        parallel::par_iter_rows_val_two(&gaussian[i], &up, &mut band, |&g, &u, b| {
            *b = g - u;
        });
        pyramid.push(band);
    }

    // the residual carries everything the bands do not
    pyramid.push(gaussian[gaussian.len() - 1].clone());

    Ok(pyramid)
}

/// Collapse a laplacian pyramid back to a full resolution image.
///
/// # Errors
///
/// The pyramid must not be empty.
pub fn collapse_laplacian<const C: usize>(
    pyramid: &[Image<f32, C>],
) -> Result<Image<f32, C>, ImageError> {
    let residual = pyramid
        .last()
        .ok_or(ImageError::InvalidImageSize(0, 0, 1, 1))?;
    let mut acc = residual.clone();

    for band in pyramid[..pyramid.len() - 1].iter().rev() {
        let mut up = Image::<f32, C>::from_size_val(band.size(), 0.0)?;
        pyrup(&acc, &mut up)?;

        let mut next = Image::<f32, C>::from_size_val(band.size(), 0.0)?;
        parallel::par_iter_rows_val_two(band, &up, &mut next, |&b, &u, n| {
            *n = b + u;
        });
        acc = next;
    }

    Ok(acc)
}
