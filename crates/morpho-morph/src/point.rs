use std::collections::HashSet;

use morpho_image::ImageSize;

use crate::error::MorphError;

/// A 2D landmark point with f32 coordinates.
///
/// Points are compared bit-exactly; deduplication and the triangle index
/// lookup rely on exact coordinate equality of clipped inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2f {
    /// X coordinate of the point.
    pub x: f32,
    /// Y coordinate of the point.
    pub y: f32,
}

impl Point2f {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Bit pattern of the coordinates, usable as a hash map key.
    pub(crate) fn key(&self) -> (u32, u32) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl From<(f32, f32)> for Point2f {
    fn from(p: (f32, f32)) -> Self {
        Self { x: p.0, y: p.1 }
    }
}

/// Clamp every point into the image bounds [0, width-1] x [0, height-1].
///
/// Points are never dropped, only moved onto the nearest border.
pub fn clip_points(points: &mut [Point2f], size: ImageSize) {
    let max_x = (size.width - 1) as f32;
    let max_y = (size.height - 1) as f32;
    for p in points.iter_mut() {
        p.x = p.x.clamp(0.0, max_x);
        p.y = p.y.clamp(0.0, max_y);
    }
}

/// Validate that every point lies inside the image bounds.
///
/// # Errors
///
/// Returns [`MorphError::PointOutOfBounds`] with the offending point index.
/// After [`clip_points`] this should be unreachable.
pub fn check_points(points: &[Point2f], size: ImageSize) -> Result<(), MorphError> {
    let max_x = (size.width - 1) as f32;
    let max_y = (size.height - 1) as f32;
    for (index, p) in points.iter().enumerate() {
        let inside = p.x >= 0.0 && p.x <= max_x && p.y >= 0.0 && p.y <= max_y;
        if !inside || !p.x.is_finite() || !p.y.is_finite() {
            return Err(MorphError::PointOutOfBounds {
                index,
                x: p.x,
                y: p.y,
            });
        }
    }
    Ok(())
}

/// Remove exact duplicate coordinates, preserving first-occurrence order.
pub fn unique_points(points: &[Point2f]) -> Vec<Point2f> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| seen.insert(p.key()))
        .copied()
        .collect()
}

/// Clip, validate and deduplicate a landmark point set.
///
/// # Arguments
///
/// * `points` - The landmark points to sanitize.
/// * `size` - The image bounds to clip against.
///
/// # Returns
///
/// The deduplicated point set with all coordinates inside the bounds.
///
/// # Errors
///
/// Returns [`MorphError::DegenerateInput`] if fewer than three unique points
/// remain, since no triangulation can be built from them.
///
/// # Example
///
/// ```
/// use morpho_image::ImageSize;
/// use morpho_morph::point::{sanitize, Point2f};
///
/// let points = vec![
///     Point2f::new(-5.0, 0.0),
///     Point2f::new(0.0, 0.0),
///     Point2f::new(3.0, 120.0),
///     Point2f::new(7.0, 7.0),
/// ];
///
/// let size = ImageSize { width: 8, height: 8 };
/// let unique = sanitize(&points, size).unwrap();
///
/// // the first two points collapse onto (0, 0)
/// assert_eq!(unique.len(), 3);
/// assert_eq!(unique[1], Point2f::new(3.0, 7.0));
/// ```
pub fn sanitize(points: &[Point2f], size: ImageSize) -> Result<Vec<Point2f>, MorphError> {
    let mut clipped = points.to_vec();
    clip_points(&mut clipped, size);
    check_points(&clipped, size)?;

    let unique = unique_points(&clipped);
    if unique.len() < 3 {
        return Err(MorphError::DegenerateInput {
            unique: unique.len(),
        });
    }

    Ok(unique)
}

/// Linearly blend two equal-length point sets.
///
/// Every output point is `(1 - ratio) * a[i] + ratio * b[i]`.
///
/// # Errors
///
/// Returns [`MorphError::LengthMismatch`] if the sets differ in length.
///
/// # Example
///
/// ```
/// use morpho_morph::point::{lerp_points, Point2f};
///
/// let a = vec![Point2f::new(0.0, 0.0)];
/// let b = vec![Point2f::new(2.0, 4.0)];
///
/// let mid = lerp_points(&a, &b, 0.5).unwrap();
/// assert_eq!(mid[0], Point2f::new(1.0, 2.0));
/// ```
pub fn lerp_points(a: &[Point2f], b: &[Point2f], ratio: f32) -> Result<Vec<Point2f>, MorphError> {
    if a.len() != b.len() {
        return Err(MorphError::LengthMismatch {
            lhs: a.len(),
            rhs: b.len(),
        });
    }

    Ok(a.iter()
        .zip(b.iter())
        .map(|(pa, pb)| Point2f {
            x: (1.0 - ratio) * pa.x + ratio * pb.x,
            y: (1.0 - ratio) * pa.y + ratio * pb.y,
        })
        .collect())
}
