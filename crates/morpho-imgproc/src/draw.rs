use morpho_image::Image;

/// Set a pixel's color, ignoring out of bounds coordinates.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || y < 0 || x >= img.cols() as i64 || y >= img.rows() as i64 {
        return;
    }

    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        set_pixel(img, x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::{ImageError, ImageSize};

    #[test]
    fn draw_horizontal_line() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 2,
            },
            0,
        )?;

        draw_line(&mut img, (0, 0), (3, 0), [255]);

        assert_eq!(img.as_slice(), &[255u8, 255, 255, 255, 0, 0, 0, 0]);

        Ok(())
    }

    #[test]
    fn draw_line_clips_to_image() -> Result<(), ImageError> {
        let mut img = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;

        // endpoints outside the canvas must not panic
        draw_line(&mut img, (-2, -2), (4, 4), [255, 0, 0]);

        assert_eq!(img.get_pixel(0, 0, 0)?, 255);
        assert_eq!(img.get_pixel(1, 1, 0)?, 255);

        Ok(())
    }
}
