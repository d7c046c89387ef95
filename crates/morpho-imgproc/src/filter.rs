use rayon::prelude::*;

use crate::parallel;
use morpho_image::{Image, ImageError};

/// Create a normalized 1d gaussian kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The standard deviation of the gaussian.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mean = (kernel_size - 1) as f32 / 2.0;
    let mut kernel = Vec::with_capacity(kernel_size);
    let mut sum = 0.0;

    for i in 0..kernel_size {
        let x = i as f32 - mean;
        let val = (-0.5 * (x / sigma).powi(2)).exp();
        kernel.push(val);
        sum += val;
    }

    kernel.iter_mut().for_each(|k| *k /= sum);

    kernel
}

/// Apply a separable filter to an image.
///
/// The filter runs a horizontal pass with `kernel_x` followed by a vertical
/// pass with `kernel_y`. Samples outside the image replicate the border
/// pixel.
///
/// # Arguments
///
/// * `src` - The source image with shape (height, width, C).
/// * `dst` - The destination image with shape (height, width, C).
/// * `kernel_x` - The horizontal convolution kernel.
/// * `kernel_y` - The vertical convolution kernel.
///
/// # Errors
///
/// The source and destination images must have the same size and the kernels
/// must not be empty.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength);
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (cols, rows) = (src.cols(), src.rows());
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;

    let mut tmp = Image::<f32, C>::from_size_val(src.size(), 0.0)?;

    // horizontal pass
    let src_slice = src.as_slice();
    tmp.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(y, tmp_row)| {
            let src_row = &src_slice[y * cols * C..(y + 1) * cols * C];
            for x in 0..cols {
                for c in 0..C {
                    let mut acc = 0.0;
                    for (k, &w) in kernel_x.iter().enumerate() {
                        let xx = (x as isize + k as isize - half_x).clamp(0, cols as isize - 1);
                        acc += src_row[xx as usize * C + c] * w;
                    }
                    tmp_row[x * C + c] = acc;
                }
            }
        });

    // vertical pass
    let tmp_slice = tmp.as_slice();
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..cols {
                for c in 0..C {
                    let mut acc = 0.0;
                    for (k, &w) in kernel_y.iter().enumerate() {
                        let yy = (y as isize + k as isize - half_y).clamp(0, rows as isize - 1);
                        acc += tmp_slice[(yy as usize * cols + x) * C + c] * w;
                    }
                    dst_row[x * C + c] = acc;
                }
            }
        });

    Ok(())
}

/// Sharpen an image with an unsharp mask.
///
/// Subtracts a gaussian blurred copy from the source to isolate the detail
/// layer, then adds it back scaled by `amount`:
///
/// dst = src + (src - blurred) * amount
///
/// An `amount` of zero returns the source unchanged.
///
/// # Arguments
///
/// * `src` - The source image with shape (height, width, C).
/// * `dst` - The destination image with shape (height, width, C).
/// * `kernel_size` - The size of the gaussian kernel.
/// * `sigma` - The standard deviation of the gaussian.
/// * `amount` - The strength of the sharpening.
pub fn unsharp_mask<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_size: usize,
    sigma: f32,
    amount: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let kernel = gaussian_kernel_1d(kernel_size, sigma);

    let mut blurred = Image::<f32, C>::from_size_val(src.size(), 0.0)?;
    separable_filter(src, &mut blurred, &kernel, &kernel)?;

    parallel::par_iter_rows_val_two(src, &blurred, dst, |&s, &b, d| {
        *d = s + (s - b) * amount;
    });

    Ok(())
}
