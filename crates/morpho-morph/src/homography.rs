use log::warn;

use crate::error::MorphError;
use crate::point::Point2f;

/// Epsilon substituted for a zero homogeneous denominator.
pub const W_EPSILON: f32 = 1e-5;

/// Policy for triangles whose homography is not invertible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SingularPolicy {
    /// A singular triangle aborts the frame with
    /// [`MorphError::SingularTriangle`].
    #[default]
    Strict,
    /// A singular triangle is skipped and its pixels keep their identity
    /// mapping.
    Lenient,
}

/// A row-major 3x3 projective transform between two triangles' coordinate
/// frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography(pub [f32; 9]);

impl Homography {
    /// The identity transform.
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Multiply two transforms, applying `rhs` first.
    pub fn matmul(&self, rhs: &Self) -> Self {
        let a = &self.0;
        let b = &rhs.0;
        let mut m = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                m[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self(m)
    }

    #[rustfmt::skip]
    /// The determinant of the transform.
    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        m[0] * (m[4] * m[8] - m[5] * m[7]) -
        m[1] * (m[3] * m[8] - m[5] * m[6]) +
        m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    #[rustfmt::skip]
    fn adjugate(&self) -> [f32; 9] {
        let m = &self.0;
        [
            m[4] * m[8] - m[5] * m[7],  // [0, 0]
            m[2] * m[7] - m[1] * m[8],  // [0, 1]
            m[1] * m[5] - m[2] * m[4],  // [0, 2]
            m[5] * m[6] - m[3] * m[8],  // [1, 0]
            m[0] * m[8] - m[2] * m[6],  // [1, 1]
            m[2] * m[3] - m[0] * m[5],  // [1, 2]
            m[3] * m[7] - m[4] * m[6],  // [2, 0]
            m[1] * m[6] - m[0] * m[7],  // [2, 1]
            m[0] * m[4] - m[1] * m[3],  // [2, 2]
        ]
    }

    /// The inverse transform, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        let adj = self.adjugate();
        let inv_det = 1.0 / det;

        let mut inv = [0.0; 9];
        for (o, a) in inv.iter_mut().zip(adj.iter()) {
            *o = a * inv_det;
        }

        Some(Self(inv))
    }

    /// Apply the transform to a point in homogeneous coordinates.
    ///
    /// A zero denominator is clamped to [`W_EPSILON`] rather than producing
    /// a division by zero.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.0;
        let mut w = m[6] * x + m[7] * y + m[8];
        if w == 0.0 {
            w = W_EPSILON;
        }
        (
            (m[0] * x + m[1] * y + m[2]) / w,
            (m[3] * x + m[4] * y + m[5]) / w,
        )
    }
}

#[rustfmt::skip]
/// The 3x3 matrix with the triangle's vertices as homogeneous columns.
fn triangle_basis(tri: &[Point2f; 3]) -> Homography {
    Homography([
        tri[0].x, tri[1].x, tri[2].x,
        tri[0].y, tri[1].y, tri[2].y,
        1.0, 1.0, 1.0,
    ])
}

/// Compute the projective transform mapping one triangle onto another.
///
/// Solves `H = Hom(dst) * Hom(src)^-1` where `Hom(t)` is the matrix of the
/// triangle's vertices as homogeneous columns. Returns `None` when the
/// source triangle is degenerate (collinear vertices).
pub fn solve_triangle(src: &[Point2f; 3], dst: &[Point2f; 3]) -> Option<Homography> {
    let src_inv = triangle_basis(src).inverse()?;
    Some(triangle_basis(dst).matmul(&src_inv))
}

/// Compute the per-triangle transforms for matched triangle lists.
///
/// The output preserves input order. Under [`SingularPolicy::Strict`] a
/// degenerate triangle aborts with [`MorphError::SingularTriangle`]; under
/// [`SingularPolicy::Lenient`] it is recorded as `None` and skipped
/// downstream.
///
/// # Errors
///
/// Returns [`MorphError::LengthMismatch`] if the lists differ in length.
pub fn solve_all(
    src: &[[Point2f; 3]],
    dst: &[[Point2f; 3]],
    policy: SingularPolicy,
) -> Result<Vec<Option<Homography>>, MorphError> {
    if src.len() != dst.len() {
        return Err(MorphError::LengthMismatch {
            lhs: src.len(),
            rhs: dst.len(),
        });
    }

    let mut homographies = Vec::with_capacity(src.len());
    for (index, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        match solve_triangle(s, d) {
            Some(h) => homographies.push(Some(h)),
            None => match policy {
                SingularPolicy::Strict => {
                    return Err(MorphError::SingularTriangle { index });
                }
                SingularPolicy::Lenient => {
                    warn!("skipping degenerate triangle {index}");
                    homographies.push(None);
                }
            },
        }
    }

    Ok(homographies)
}

/// Interpolate a transform and its inverse toward identity.
///
/// Produces the pair
///
/// * `H1 = I * (1 - ratio) + H * ratio`
/// * `H2 = I * ratio + H^-1 * (1 - ratio)`
///
/// so that at ratio 0 the first image stays put while the second is warped
/// fully into its frame, and at ratio 1 the roles invert. Returns `None`
/// when `H` is singular.
pub fn blend_homography(h: &Homography, ratio: f32) -> Option<(Homography, Homography)> {
    let inv = h.inverse()?;

    let identity = &Homography::IDENTITY.0;
    let mut h1 = [0.0; 9];
    let mut h2 = [0.0; 9];
    for i in 0..9 {
        h1[i] = identity[i] * (1.0 - ratio) + h.0[i] * ratio;
        h2[i] = identity[i] * ratio + inv.0[i] * (1.0 - ratio);
    }

    Some((Homography(h1), Homography(h2)))
}

/// Blend every transform in a batch toward identity, order-preserving.
///
/// `None` entries (triangles already skipped by [`solve_all`] in lenient
/// mode) stay `None` in both outputs.
#[allow(clippy::type_complexity)]
pub fn blend_all(
    homographies: &[Option<Homography>],
    ratio: f32,
    policy: SingularPolicy,
) -> Result<(Vec<Option<Homography>>, Vec<Option<Homography>>), MorphError> {
    let mut first = Vec::with_capacity(homographies.len());
    let mut second = Vec::with_capacity(homographies.len());

    for (index, h) in homographies.iter().enumerate() {
        match h {
            Some(h) => match blend_homography(h, ratio) {
                Some((h1, h2)) => {
                    first.push(Some(h1));
                    second.push(Some(h2));
                }
                None => match policy {
                    SingularPolicy::Strict => {
                        return Err(MorphError::SingularTriangle { index });
                    }
                    SingularPolicy::Lenient => {
                        warn!("skipping triangle {index} with a singular homography");
                        first.push(None);
                        second.push(None);
                    }
                },
            },
            None => {
                first.push(None);
                second.push(None);
            }
        }
    }

    Ok((first, second))
}
