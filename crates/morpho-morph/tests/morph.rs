use morpho_image::{Image, ImageSize};
use morpho_morph::{
    draw_analysis, morph_frame, MorphError, MorphInputs, MorphOutput, MorphParams, Point2f,
    SingularPolicy,
};

const SIZE: ImageSize = ImageSize {
    width: 8,
    height: 8,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn corners() -> Vec<Point2f> {
    vec![
        Point2f::new(0.0, 0.0),
        Point2f::new(7.0, 0.0),
        Point2f::new(7.0, 7.0),
        Point2f::new(0.0, 7.0),
    ]
}

fn constant_image(val: f32) -> Image<f32, 3> {
    Image::<f32, 3>::from_size_val(SIZE, val).unwrap()
}

fn morph(
    img_a: &Image<f32, 3>,
    img_b: &Image<f32, 3>,
    points_a: &[Point2f],
    points_b: &[Point2f],
    params: &MorphParams,
) -> Result<MorphOutput, MorphError> {
    morph_frame(
        &MorphInputs {
            img_a,
            img_b,
            guidance: img_b,
            points_a,
            points_b,
            previous: None,
        },
        params,
    )
}

#[test]
fn identical_inputs_are_a_noop() -> Result<(), MorphError> {
    init_logger();
    let img = constant_image(0.5);
    let points = corners();

    let out = morph(
        &img,
        &img,
        &points,
        &points,
        &MorphParams {
            shape_ratio: 0.5,
            mask_ratio: 0.5,
            pyramid_levels: 2,
            singular_policy: SingularPolicy::Strict,
        },
    )?;

    // 0.5 scaled to 8-bit, up to a unit of floating rounding
    for &p in out.frame.as_slice() {
        assert!((p as i16 - 128).abs() <= 1, "pixel {p} deviates from 128");
    }
    assert_eq!(out.points, points);

    Ok(())
}

#[test]
fn collinear_landmarks_fall_back_to_identity() -> Result<(), MorphError> {
    init_logger();
    let img = constant_image(0.25);
    // all points on the diagonal: the triangulation is empty and every
    // pixel passes through unwarped
    let points = vec![
        Point2f::new(0.0, 0.0),
        Point2f::new(2.0, 2.0),
        Point2f::new(4.0, 4.0),
        Point2f::new(6.0, 6.0),
    ];

    let out = morph(
        &img,
        &img,
        &points,
        &points,
        &MorphParams {
            mask_ratio: 0.0,
            ..Default::default()
        },
    )?;

    // mask_ratio 0: the frame is image A with no sharpening applied
    for &p in out.frame.as_slice() {
        assert!((p as i16 - 64).abs() <= 1, "pixel {p} deviates from 64");
    }

    Ok(())
}

#[test]
fn mask_ratio_extremes_select_one_source_unsharpened() -> Result<(), MorphError> {
    init_logger();
    let img_a = constant_image(0.2);
    let img_b = constant_image(0.8);
    let points = corners();

    // sin(0) == 0: no sharpening, mask all ones, output is image A
    let out = morph(
        &img_a,
        &img_b,
        &points,
        &points,
        &MorphParams {
            mask_ratio: 0.0,
            ..Default::default()
        },
    )?;
    for &p in out.frame.as_slice() {
        assert!((p as i16 - 51).abs() <= 1, "pixel {p} deviates from 51");
    }

    // sin(pi) == 0: no sharpening; the white guidance zeroes the mask and
    // the output is image B
    let out = morph_frame(
        &MorphInputs {
            img_a: &img_a,
            img_b: &img_b,
            guidance: &constant_image(1.0),
            points_a: &points,
            points_b: &points,
            previous: None,
        },
        &MorphParams {
            mask_ratio: 1.0,
            ..Default::default()
        },
    )?;
    for &p in out.frame.as_slice() {
        assert!((p as i16 - 204).abs() <= 1, "pixel {p} deviates from 204");
    }

    Ok(())
}

#[test]
fn collinear_source_triangle_strict_vs_lenient() -> Result<(), MorphError> {
    init_logger();
    let img_a = constant_image(0.4);
    let img_b = constant_image(0.4);
    // every triple of source points is collinear, so whichever triangles
    // the intermediate mesh produces have singular source homographies
    let points_a = vec![
        Point2f::new(0.0, 0.0),
        Point2f::new(2.0, 2.0),
        Point2f::new(4.0, 4.0),
        Point2f::new(6.0, 6.0),
    ];
    let points_b = corners();

    // shape_ratio 1 puts the intermediate mesh on the (non-degenerate)
    // corner landmarks of image B
    let params = MorphParams {
        shape_ratio: 1.0,
        mask_ratio: 0.0,
        pyramid_levels: 2,
        singular_policy: SingularPolicy::Strict,
    };

    let strict = morph(&img_a, &img_b, &points_a, &points_b, &params);
    assert!(matches!(
        strict,
        Err(MorphError::SingularTriangle { .. })
    ));

    let lenient = morph(
        &img_a,
        &img_b,
        &points_a,
        &points_b,
        &MorphParams {
            singular_policy: SingularPolicy::Lenient,
            ..params
        },
    )?;

    // skipped triangles leave their pixels identity mapped, so the
    // constant frame survives unchanged
    for &p in lenient.frame.as_slice() {
        assert!((p as i16 - 102).abs() <= 1, "pixel {p} deviates from 102");
    }

    Ok(())
}

#[test]
fn analysis_overlay_ghosts_previous_frame() -> Result<(), MorphError> {
    init_logger();
    let img = constant_image(0.5);
    let points = corners();
    let previous = Image::<u8, 3>::from_size_val(SIZE, 0).unwrap();

    let inputs = MorphInputs {
        img_a: &img,
        img_b: &img,
        guidance: &img,
        points_a: &points,
        points_b: &points,
        previous: Some(&previous),
    };
    let out = morph_frame(&inputs, &MorphParams::default())?;

    let analysis = draw_analysis(&inputs, &out, [255, 0, 0])?;
    assert_eq!(analysis.size(), SIZE);

    // the ~128 frame halves against the black previous frame off the mesh
    let p = analysis.get_pixel(3, 1, 1)?;
    assert!((p as i16 - 64).abs() <= 1, "pixel {p} deviates from 64");
    // mesh lines are painted on top
    assert_eq!(analysis.get_pixel(0, 0, 0)?, 255);
    // the returned frame itself is untouched by the overlay
    assert!((out.frame.as_slice()[0] as i16 - 128).abs() <= 1);

    Ok(())
}
