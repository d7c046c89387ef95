use rayon::prelude::*;

use morpho_image::Image;

/// Apply a function to each pixel in the image in parallel by rows.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel of two source images in parallel by rows.
pub fn par_iter_rows_val_two<T1, const C1: usize, T2, const C2: usize, T3, const C3: usize>(
    src1: &Image<T1, C1>,
    src2: &Image<T2, C2>,
    dst: &mut Image<T3, C3>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
    T3: Clone + Send + Sync,
{
    let cols = src1.cols();
    src1.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(src2.as_slice().par_chunks_exact(C2 * cols))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C3 * cols))
        .for_each(|((src1_chunk, src2_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|((src1_pixel, src2_pixel), dst_pixel)| {
                    f(src1_pixel, src2_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel for grid sampling in parallel by rows.
pub fn par_iter_rows_resample<const C: usize>(
    dst: &mut Image<f32, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    f: impl Fn(&f32, &f32, &mut [f32]) + Send + Sync,
) {
    let cols = dst.cols();
    let dst_slice = dst.as_slice_mut();
    let map_x_slice = map_x.as_slice();
    let map_y_slice = map_y.as_slice();

    dst_slice
        .par_chunks_exact_mut(C * cols)
        .zip(map_x_slice.par_chunks_exact(cols))
        .zip(map_y_slice.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::{ImageError, ImageSize};

    #[test]
    fn test_par_iter_rows() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1u8, 2, 3, 4],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        par_iter_rows(&src, &mut dst, |src_pixel, dst_pixel| {
            dst_pixel[0] = src_pixel[0] * 2;
        });

        assert_eq!(dst.as_slice(), &[2u8, 4, 6, 8]);

        Ok(())
    }

    #[test]
    fn test_par_iter_rows_val_two() -> Result<(), ImageError> {
        let src1 = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1.0f32, 2.0],
        )?;
        let src2 = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![3.0f32, 4.0],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(src1.size(), 0.0)?;

        par_iter_rows_val_two(&src1, &src2, &mut dst, |&a, &b, d| {
            *d = a + b;
        });

        assert_eq!(dst.as_slice(), &[4.0f32, 6.0]);

        Ok(())
    }
}
