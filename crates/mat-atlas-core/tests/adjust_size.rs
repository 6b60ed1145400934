use mat_atlas_core::prelude::*;

#[test]
fn quadratic_uses_the_larger_side() {
    let size = adjust_size((300, 150), &SizeMode::Quadratic, None).expect("adjust");
    assert_eq!(size, (300, 300));
}

#[test]
fn power_of_two_rounds_each_dimension_up() {
    let size = adjust_size((300, 150), &SizeMode::PowerOfTwo, None).expect("adjust");
    assert_eq!(size, (512, 256));
    // exact powers stay put
    let size = adjust_size((256, 64), &SizeMode::PowerOfTwo, None).expect("adjust");
    assert_eq!(size, (256, 64));
}

#[test]
fn automatic_passes_through() {
    let size = adjust_size((123, 77), &SizeMode::Automatic, None).expect("adjust");
    assert_eq!(size, (123, 77));
}

#[test]
fn custom_scales_proportionally_down() {
    let size = adjust_size((400, 200), &SizeMode::Custom, Some((100, 100))).expect("adjust");
    assert_eq!(size, (100, 50));
}

#[test]
fn custom_scales_proportionally_up() {
    let size = adjust_size((50, 25), &SizeMode::Custom, Some((100, 100))).expect("adjust");
    assert_eq!(size, (100, 50));
}

#[test]
fn strict_custom_forces_the_configured_size() {
    let size = adjust_size((300, 150), &SizeMode::StrictCustom, Some((1024, 1024))).expect("adjust");
    assert_eq!(size, (1024, 1024));
    let size = adjust_size((9_999, 3), &SizeMode::StrictCustom, Some((1024, 1024))).expect("adjust");
    assert_eq!(size, (1024, 1024));
}

#[test]
fn custom_without_dimensions_is_a_config_error() {
    let err = adjust_size((300, 150), &SizeMode::Custom, None).unwrap_err();
    assert!(matches!(err, AtlasError::InvalidConfig(_)));
}

#[test]
fn output_ceiling_is_inclusive() {
    assert!(check_output_size((MAX_OUTPUT_DIM, MAX_OUTPUT_DIM)).is_ok());
    let err = check_output_size((MAX_OUTPUT_DIM + 1, 100)).unwrap_err();
    match err {
        AtlasError::OutputTooLarge {
            width,
            height,
            limit,
        } => {
            assert_eq!(width, MAX_OUTPUT_DIM + 1);
            assert_eq!(height, 100);
            assert_eq!(limit, MAX_OUTPUT_DIM);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn oversize_strict_custom_is_flagged_before_generation() {
    let adjusted =
        adjust_size((64, 64), &SizeMode::StrictCustom, Some((25_000, 25_000))).expect("adjust");
    assert!(matches!(
        check_output_size(adjusted),
        Err(AtlasError::OutputTooLarge { .. })
    ));
}
