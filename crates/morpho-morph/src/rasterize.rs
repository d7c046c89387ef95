use morpho_image::{Image, ImageError, ImageSize};

use crate::point::Point2f;

/// Paint a per-pixel triangle membership map.
///
/// Initializes a zero field of `size` and fills each triangle, rounded to
/// integer pixel coordinates, with the value `index + 1` in input order.
/// Later triangles overwrite earlier ones where they overlap (painter's
/// algorithm); triangles from a proper Delaunay mesh only touch at shared
/// edges, where the last writer wins deterministically. A value of zero
/// marks a pixel not covered by any triangle.
///
/// # Arguments
///
/// * `triangles` - The triangles as vertex coordinate triples.
/// * `size` - The size of the map.
pub fn triangle_id_map(
    triangles: &[[Point2f; 3]],
    size: ImageSize,
) -> Result<Image<i32, 1>, ImageError> {
    let mut map = Image::<i32, 1>::from_size_val(size, 0)?;

    for (index, tri) in triangles.iter().enumerate() {
        fill_triangle(&mut map, tri, (index + 1) as i32);
    }

    Ok(map)
}

/// Fill a triangle's convex hull with `id` using inclusive edge tests.
fn fill_triangle(map: &mut Image<i32, 1>, tri: &[Point2f; 3], id: i32) {
    let (ax, ay) = (tri[0].x.round() as i64, tri[0].y.round() as i64);
    let (bx, by) = (tri[1].x.round() as i64, tri[1].y.round() as i64);
    let (cx, cy) = (tri[2].x.round() as i64, tri[2].y.round() as i64);

    let area = (bx - ax) * (cy - ay) - (by - ay) * (cx - ax);
    if area == 0 {
        // zero-area triangle after rounding, nothing to paint
        return;
    }
    let sign = area.signum();

    let cols = map.cols() as i64;
    let rows = map.rows() as i64;

    let min_x = ax.min(bx).min(cx).max(0);
    let max_x = ax.max(bx).max(cx).min(cols - 1);
    let min_y = ay.min(by).min(cy).max(0);
    let max_y = ay.max(by).max(cy).min(rows - 1);

    let slice = map.as_slice_mut();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let e0 = (bx - ax) * (y - ay) - (by - ay) * (x - ax);
            let e1 = (cx - bx) * (y - by) - (cy - by) * (x - bx);
            let e2 = (ax - cx) * (y - cy) - (ay - cy) * (x - cx);

            if e0 * sign >= 0 && e1 * sign >= 0 && e2 * sign >= 0 {
                slice[(y * cols + x) as usize] = id;
            }
        }
    }
}
