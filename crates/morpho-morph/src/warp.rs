use log::warn;
use rayon::prelude::*;

use morpho_image::Image;

use crate::error::MorphError;
use crate::homography::{Homography, SingularPolicy};

/// Build the dense inverse warp maps for a triangle id map.
///
/// The homographies map source coordinates toward the intermediate mesh;
/// sampling goes the other way, so the inverse of each entry is precomputed
/// once. For every pixel covered by a triangle the maps hold the source
/// coordinate produced by that triangle's inverse transform; pixels with id
/// zero map to themselves so uncovered background passes through unchanged.
///
/// # Arguments
///
/// * `id_map` - The per-pixel triangle membership map, see
///   [`crate::rasterize::triangle_id_map`].
/// * `homographies` - The per-triangle transforms, aligned with the ids in
///   the map. `None` entries are triangles skipped in lenient mode; their
///   pixels keep the identity mapping.
/// * `policy` - What to do when a transform cannot be inverted.
///
/// # Returns
///
/// The x and y coordinate maps, each of the id map's size.
///
/// # Errors
///
/// Returns [`MorphError::UnknownTriangleId`] if the map references a
/// triangle the homography list does not contain, and
/// [`MorphError::SingularTriangle`] for a non-invertible transform under
/// [`SingularPolicy::Strict`].
pub fn build_warp_maps(
    id_map: &Image<i32, 1>,
    homographies: &[Option<Homography>],
    policy: SingularPolicy,
) -> Result<(Image<f32, 1>, Image<f32, 1>), MorphError> {
    // no pixel may be mapped through a transform that does not exist
    if let Some(&bad) = id_map
        .as_slice()
        .iter()
        .find(|&&id| id < 0 || id as usize > homographies.len())
    {
        return Err(MorphError::UnknownTriangleId {
            id: bad,
            triangles: homographies.len(),
        });
    }

    // compute inverse matrices
    let mut inverses: Vec<Option<Homography>> = Vec::with_capacity(homographies.len());
    for (index, h) in homographies.iter().enumerate() {
        match h {
            Some(h) => match h.inverse() {
                Some(inv) => inverses.push(Some(inv)),
                None => match policy {
                    SingularPolicy::Strict => {
                        return Err(MorphError::SingularTriangle { index });
                    }
                    SingularPolicy::Lenient => {
                        warn!("triangle {index} is not invertible, falling back to identity");
                        inverses.push(None);
                    }
                },
            },
            None => inverses.push(None),
        }
    }

    let mut map_x = Image::<f32, 1>::from_size_val(id_map.size(), 0.0)?;
    let mut map_y = Image::<f32, 1>::from_size_val(id_map.size(), 0.0)?;

    let cols = id_map.cols();
    map_x
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(map_y.as_slice_mut().par_chunks_exact_mut(cols))
        .zip(id_map.as_slice().par_chunks_exact(cols))
        .enumerate()
        .for_each(|(y, ((x_row, y_row), id_row))| {
            for x in 0..cols {
                let id = id_row[x];
                let (u, v) = match id {
                    0 => (x as f32, y as f32),
                    _ => match &inverses[(id - 1) as usize] {
                        Some(inv) => inv.transform_point(x as f32, y as f32),
                        None => (x as f32, y as f32),
                    },
                };
                x_row[x] = u;
                y_row[x] = v;
            }
        });

    Ok((map_x, map_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homography::solve_triangle;
    use crate::point::Point2f;
    use crate::rasterize::triangle_id_map;
    use morpho_image::ImageSize;

    const SIZE: ImageSize = ImageSize {
        width: 4,
        height: 4,
    };

    #[test]
    fn uncovered_pixels_map_to_identity() -> Result<(), MorphError> {
        let id_map = Image::<i32, 1>::from_size_val(SIZE, 0)?;
        let (map_x, map_y) = build_warp_maps(&id_map, &[], SingularPolicy::Strict)?;

        for y in 0..SIZE.height {
            for x in 0..SIZE.width {
                assert_eq!(map_x.get_pixel(x, y, 0)?, x as f32);
                assert_eq!(map_y.get_pixel(x, y, 0)?, y as f32);
            }
        }

        Ok(())
    }

    #[test]
    fn covered_pixels_follow_inverse_transform() -> Result<(), MorphError> {
        let tri = [
            Point2f::new(0.0, 0.0),
            Point2f::new(3.0, 0.0),
            Point2f::new(0.0, 3.0),
        ];
        // shift the triangle one pixel right
        let shifted = [
            Point2f::new(1.0, 0.0),
            Point2f::new(3.0, 0.0),
            Point2f::new(1.0, 3.0),
        ];
        let h = solve_triangle(&tri, &shifted).unwrap();

        let id_map = triangle_id_map(&[shifted], SIZE)?;
        let (map_x, map_y) = build_warp_maps(&id_map, &[Some(h)], SingularPolicy::Strict)?;

        // a pixel inside the shifted triangle pulls from one pixel to the left
        assert!((map_x.get_pixel(1, 0, 0)? - 0.0).abs() < 1e-4);
        assert!((map_y.get_pixel(1, 0, 0)? - 0.0).abs() < 1e-4);

        // uncovered pixel keeps identity
        assert_eq!(map_x.get_pixel(3, 3, 0)?, 3.0);
        assert_eq!(map_y.get_pixel(3, 3, 0)?, 3.0);

        Ok(())
    }

    #[test]
    fn unknown_triangle_id_is_rejected() -> Result<(), MorphError> {
        let mut id_map = Image::<i32, 1>::from_size_val(SIZE, 0)?;
        id_map.as_slice_mut()[0] = 3;

        let res = build_warp_maps(&id_map, &[], SingularPolicy::Strict);
        assert!(matches!(
            res,
            Err(MorphError::UnknownTriangleId { id: 3, .. })
        ));

        Ok(())
    }

    #[test]
    fn negative_triangle_id_is_rejected() -> Result<(), MorphError> {
        let mut id_map = Image::<i32, 1>::from_size_val(SIZE, 0)?;
        id_map.as_slice_mut()[0] = -5;

        let res = build_warp_maps(&id_map, &[], SingularPolicy::Strict);
        assert!(matches!(
            res,
            Err(MorphError::UnknownTriangleId { id: -5, .. })
        ));

        Ok(())
    }

    #[test]
    fn skipped_triangle_pixels_stay_identity() -> Result<(), MorphError> {
        let tri = [
            Point2f::new(0.0, 0.0),
            Point2f::new(3.0, 0.0),
            Point2f::new(0.0, 3.0),
        ];
        let id_map = triangle_id_map(&[tri], SIZE)?;
        let (map_x, map_y) = build_warp_maps(&id_map, &[None], SingularPolicy::Lenient)?;

        assert_eq!(map_x.get_pixel(1, 1, 0)?, 1.0);
        assert_eq!(map_y.get_pixel(1, 1, 0)?, 1.0);

        Ok(())
    }
}
