use morpho_image::{Image, ImageError};
use morpho_imgproc::draw::draw_line;

use crate::error::MorphError;
use crate::mesh;
use crate::point::{self, Point2f};

/// Draw the edges of a triangle mesh onto an analysis canvas.
///
/// # Arguments
///
/// * `canvas` - The image to draw on.
/// * `triangles` - The triangles as vertex coordinate triples.
/// * `color` - The RGB color of the mesh lines.
pub fn draw_mesh(canvas: &mut Image<u8, 3>, triangles: &[[Point2f; 3]], color: [u8; 3]) {
    for tri in triangles {
        for i in 0..3 {
            let p0 = tri[i];
            let p1 = tri[(i + 1) % 3];
            draw_line(
                canvas,
                (p0.x.round() as i64, p0.y.round() as i64),
                (p1.x.round() as i64, p1.y.round() as i64),
                color,
            );
        }
    }
}

/// Draw the two source meshes and the intermediate mesh onto a canvas.
///
/// A diagnostic side effect only; nothing feeds back into the pipeline.
/// Each point set is sanitized and triangulated independently, so the
/// overlay works with the raw landmark inputs. When a previous frame is
/// given it is ghosted into the canvas at half weight first, keeping
/// frame-to-frame mesh drift visible in a sequence.
///
/// # Arguments
///
/// * `canvas` - The analysis canvas, usually a copy of the output frame.
/// * `previous` - The previous output frame, if any.
/// * `points_a` - The landmarks of the first source image.
/// * `points_b` - The landmarks of the second source image.
/// * `points_mid` - The intermediate point set returned by
///   [`crate::morph::morph_frame`].
/// * `color` - The RGB color of the mesh lines.
pub fn draw_analysis(
    canvas: &mut Image<u8, 3>,
    previous: Option<&Image<u8, 3>>,
    points_a: &[Point2f],
    points_b: &[Point2f],
    points_mid: &[Point2f],
    color: [u8; 3],
) -> Result<(), MorphError> {
    let size = canvas.size();

    if let Some(prev) = previous {
        if prev.size() != size {
            return Err(MorphError::Image(ImageError::InvalidImageSize(
                prev.cols(),
                prev.rows(),
                size.width,
                size.height,
            )));
        }
        for (c, &p) in canvas.as_slice_mut().iter_mut().zip(prev.as_slice()) {
            *c = ((*c as u16 + p as u16) / 2) as u8;
        }
    }

    for points in [points_a, points_b, points_mid] {
        let unique = point::sanitize(points, size)?;
        let triangles = mesh::triangulate(&unique, size);
        draw_mesh(canvas, &triangles, color);
    }

    Ok(())
}
