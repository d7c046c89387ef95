use std::collections::HashMap;

use morpho_image::ImageSize;

use crate::point::Point2f;

/// Indices of a triangle's vertices into a landmark point set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleIndices(pub [usize; 3]);

fn in_bounds(p: &Point2f, size: ImageSize) -> bool {
    let x = p.x.round();
    let y = p.y.round();
    x >= 0.0 && x <= (size.width - 1) as f32 && y >= 0.0 && y <= (size.height - 1) as f32
}

/// Build a Delaunay triangulation over a deduplicated point set.
///
/// Triangles with any vertex outside `size` (after rounding to the nearest
/// pixel) are dropped. A collinear or too small point set yields an empty
/// triangle list.
///
/// # Arguments
///
/// * `points` - The deduplicated points to triangulate. Duplicate
///   coordinates break the triangulation and must be removed first, see
///   [`crate::point::unique_points`].
/// * `size` - The image bounds.
///
/// # Returns
///
/// The triangles as vertex coordinate triples, in triangulation order.
pub fn triangulate(points: &[Point2f], size: ImageSize) -> Vec<[Point2f; 3]> {
    let delaunay_points: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();

    let triangulation = delaunator::triangulate(&delaunay_points);

    triangulation
        .triangles
        .chunks_exact(3)
        .map(|t| [points[t[0]], points[t[1]], points[t[2]]])
        .filter(|tri| tri.iter().all(|p| in_bounds(p, size)))
        .collect()
}

/// Resolve triangle vertex coordinates back to indices into a point set.
///
/// The triangulation runs on deduplicated coordinates while downstream
/// homography lookups need indices that align 1:1 across the two source
/// images' correspondences, so each vertex is matched back into the
/// original (possibly larger) point set by exact coordinate comparison.
/// Duplicate coordinates resolve to their first occurrence. A triangle is
/// discarded if any of its vertices cannot be matched.
pub fn index_triangles(
    triangles: &[[Point2f; 3]],
    points: &[Point2f],
) -> Vec<TriangleIndices> {
    // coordinate-to-index map, first match wins
    let mut lookup: HashMap<(u32, u32), usize> = HashMap::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        lookup.entry(p.key()).or_insert(i);
    }

    triangles
        .iter()
        .filter_map(|tri| {
            let a = lookup.get(&tri[0].key())?;
            let b = lookup.get(&tri[1].key())?;
            let c = lookup.get(&tri[2].key())?;
            Some(TriangleIndices([*a, *b, *c]))
        })
        .collect()
}

/// Materialize triangle vertex coordinates from an index list.
///
/// Every index must be valid for `points`; the index lists produced by
/// [`index_triangles`] are valid for any point set correspondent with the
/// one they were resolved against.
pub fn gather(indices: &[TriangleIndices], points: &[Point2f]) -> Vec<[Point2f; 3]> {
    indices
        .iter()
        .map(|t| [points[t.0[0]], points[t.0[1]], points[t.0[2]]])
        .collect()
}
