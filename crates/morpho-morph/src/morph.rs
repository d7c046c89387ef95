use std::f32::consts::PI;

use log::debug;

use morpho_image::{Image, ImageError};
use morpho_imgproc::filter::unsharp_mask;
use morpho_imgproc::interpolation::{remap, InterpolationMode};

use crate::blend::laplacian_blend;
use crate::error::MorphError;
use crate::homography::{blend_all, solve_all, SingularPolicy};
use crate::mask::blend_mask;
use crate::mesh;
use crate::overlay;
use crate::point::{self, Point2f};
use crate::rasterize::triangle_id_map;
use crate::warp::build_warp_maps;

/// Kernel size of the unsharp post-filter.
const UNSHARP_KERNEL_SIZE: usize = 3;
/// Gaussian sigma of the unsharp post-filter.
const UNSHARP_SIGMA: f32 = 1.0;

/// Immutable per-frame configuration of the morph pipeline.
#[derive(Clone, Copy, Debug)]
pub struct MorphParams {
    /// Blend factor of the geometric interpolation, in [0, 1].
    pub shape_ratio: f32,
    /// Blend factor of the photometric mixing, in [0, 1].
    pub mask_ratio: f32,
    /// Number of levels of the Laplacian blending pyramid.
    pub pyramid_levels: usize,
    /// Policy for degenerate triangles.
    pub singular_policy: SingularPolicy,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            shape_ratio: 0.5,
            mask_ratio: 0.5,
            pyramid_levels: 4,
            singular_policy: SingularPolicy::Strict,
        }
    }
}

/// Borrowed inputs of one morph frame.
///
/// All images must share the same dimensions and be in floating range
/// [0, 1]; the point sets must be matched landmark correspondences of equal
/// length. Nothing is mutated.
pub struct MorphInputs<'a> {
    /// The first source image.
    pub img_a: &'a Image<f32, 3>,
    /// The second source image.
    pub img_b: &'a Image<f32, 3>,
    /// The guidance/structure image driving the blend mask.
    pub guidance: &'a Image<f32, 3>,
    /// Landmark points on the first image.
    pub points_a: &'a [Point2f],
    /// Landmark points on the second image, matched by index.
    pub points_b: &'a [Point2f],
    /// The previous output frame of a sequence, if any. Consumed only by
    /// the diagnostic overlay, see [`draw_analysis`]; the morph itself
    /// never reads it.
    pub previous: Option<&'a Image<u8, 3>>,
}

/// The result of one morph frame.
pub struct MorphOutput {
    /// The blended output frame.
    pub frame: Image<u8, 3>,
    /// The intermediate point set actually used, post clipping and
    /// interpolation, for downstream reuse.
    pub points: Vec<Point2f>,
}

/// Compute one in-between frame from two corresponding images.
///
/// Runs the full per-frame pipeline: landmark sanitation, Delaunay
/// triangulation of the intermediate point set, per-triangle homography
/// estimation and blending, dense inverse warp map construction, bilinear
/// resampling of both sources, and a mask-driven Laplacian blend with an
/// unsharp post-filter whose strength `sin(mask_ratio * pi)` vanishes at
/// both ratio extremes.
///
/// The pipeline fails fast: any geometry stage error aborts the frame and
/// no partial output is produced. If the intermediate triangulation yields
/// no usable triangle (fully collinear landmarks), the frame degrades to a
/// whole-image identity warp instead of failing.
///
/// # Arguments
///
/// * `inputs` - The source images and their landmark correspondences.
/// * `params` - The per-frame configuration.
///
/// # Returns
///
/// The output frame converted to 8-bit range together with the
/// intermediate point set that produced it.
pub fn morph_frame(
    inputs: &MorphInputs<'_>,
    params: &MorphParams,
) -> Result<MorphOutput, MorphError> {
    let size = inputs.img_a.size();

    if inputs.img_b.size() != size {
        return Err(MorphError::Image(ImageError::InvalidImageSize(
            inputs.img_b.cols(),
            inputs.img_b.rows(),
            size.width,
            size.height,
        )));
    }
    if inputs.guidance.size() != size {
        return Err(MorphError::Image(ImageError::InvalidImageSize(
            inputs.guidance.cols(),
            inputs.guidance.rows(),
            size.width,
            size.height,
        )));
    }
    if inputs.points_a.len() != inputs.points_b.len() {
        return Err(MorphError::LengthMismatch {
            lhs: inputs.points_a.len(),
            rhs: inputs.points_b.len(),
        });
    }

    // sanitize both landmark sets; the clipped full sets drive the
    // homography solve, the deduplicated ones the triangulations
    let mut points_a = inputs.points_a.to_vec();
    point::clip_points(&mut points_a, size);
    point::check_points(&points_a, size)?;
    ensure_triangulable(&points_a)?;

    let mut points_b = inputs.points_b.to_vec();
    point::clip_points(&mut points_b, size);
    point::check_points(&points_b, size)?;
    ensure_triangulable(&points_b)?;

    let mut points_mid = point::lerp_points(&points_a, &points_b, params.shape_ratio)?;
    point::clip_points(&mut points_mid, size);
    point::check_points(&points_mid, size)?;
    let unique_mid = point::unique_points(&points_mid);
    if unique_mid.len() < 3 {
        return Err(MorphError::DegenerateInput {
            unique: unique_mid.len(),
        });
    }

    // triangulate the intermediate mesh and resolve triangle vertices back
    // to indices shared by all three point sets
    let triangles_mid = mesh::triangulate(&unique_mid, size);
    let indices = mesh::index_triangles(&triangles_mid, &points_mid);
    debug!(
        "triangulated {} triangles over {} unique points",
        indices.len(),
        unique_mid.len()
    );

    let tri_a = mesh::gather(&indices, &points_a);
    let tri_b = mesh::gather(&indices, &points_b);
    let tri_mid = mesh::gather(&indices, &points_mid);

    // an empty mesh (fully collinear landmarks) leaves the id map zero and
    // both frames pass through as identity warps
    let id_map = triangle_id_map(&tri_mid, size)?;

    let homographies = solve_all(&tri_a, &tri_b, params.singular_policy)?;
    let (toward_a, toward_b) =
        blend_all(&homographies, params.shape_ratio, params.singular_policy)?;

    let (map_x_a, map_y_a) = build_warp_maps(&id_map, &toward_a, params.singular_policy)?;
    let (map_x_b, map_y_b) = build_warp_maps(&id_map, &toward_b, params.singular_policy)?;

    let mut warped_a = Image::<f32, 3>::from_size_val(size, 0.0)?;
    remap(
        inputs.img_a,
        &mut warped_a,
        &map_x_a,
        &map_y_a,
        InterpolationMode::Bilinear,
    )?;

    let mut warped_b = Image::<f32, 3>::from_size_val(size, 0.0)?;
    remap(
        inputs.img_b,
        &mut warped_b,
        &map_x_b,
        &map_y_b,
        InterpolationMode::Bilinear,
    )?;

    let mut mask = Image::<f32, 1>::from_size_val(size, 0.0)?;
    blend_mask(inputs.guidance, params.mask_ratio, &mut mask)?;

    let blended = laplacian_blend(&warped_a, &warped_b, &mask, params.pyramid_levels)?;

    // sharpening compensates blend softening; it peaks where the two
    // sources mix in equal proportion and vanishes at the ratio extremes
    let amount = (params.mask_ratio * PI).sin();
    let mut sharpened = Image::<f32, 3>::from_size_val(size, 0.0)?;
    unsharp_mask(
        &blended,
        &mut sharpened,
        UNSHARP_KERNEL_SIZE,
        UNSHARP_SIGMA,
        amount,
    )?;
    debug!(
        "blended frame with mask_ratio {} and unsharp amount {amount}",
        params.mask_ratio
    );

    let frame = sharpened.cast_and_scale::<u8>(255.0);

    Ok(MorphOutput {
        frame,
        points: points_mid,
    })
}

/// Render the diagnostic mesh overlay for a finished frame.
///
/// Paints the triangulations of both landmark sets and the intermediate
/// set onto a copy of the output frame. When the inputs carry a previous
/// frame it is ghosted into the canvas first, so consecutive frames of a
/// sequence reveal the mesh drift. Purely diagnostic; nothing feeds back
/// into the pipeline.
///
/// # Arguments
///
/// * `inputs` - The inputs the frame was computed from.
/// * `output` - The frame returned by [`morph_frame`].
/// * `color` - The RGB color of the mesh lines.
pub fn draw_analysis(
    inputs: &MorphInputs<'_>,
    output: &MorphOutput,
    color: [u8; 3],
) -> Result<Image<u8, 3>, MorphError> {
    let mut canvas = output.frame.clone();
    overlay::draw_analysis(
        &mut canvas,
        inputs.previous,
        inputs.points_a,
        inputs.points_b,
        &output.points,
        color,
    )?;
    Ok(canvas)
}

/// Reject a point set that cannot support any triangulation.
fn ensure_triangulable(points: &[Point2f]) -> Result<(), MorphError> {
    let unique = point::unique_points(points);
    if unique.len() < 3 {
        return Err(MorphError::DegenerateInput {
            unique: unique.len(),
        });
    }
    Ok(())
}
