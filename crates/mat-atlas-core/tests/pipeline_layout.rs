use mat_atlas_core::prelude::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn gap_pads_the_pack_and_is_subtracted_from_uvs() {
    let cfg = AtlasConfig::builder().gap(2).build();
    let out = pack_layout(vec![("a", 10u32, 10u32)], &cfg).expect("pack");
    // 10x10 content padded to 14x14 fills the whole canvas
    assert_eq!((out.width, out.height), (14, 14));
    assert_eq!(out.layout.placements[0].frame, Rect::new(0, 0, 14, 14));
    let uv = out.uvs[0].uv;
    assert!(approx(uv.u_min, 2.0 / 14.0));
    assert!(approx(uv.v_min, 2.0 / 14.0));
    assert!(approx(uv.u_max, 12.0 / 14.0));
    assert!(approx(uv.v_max, 12.0 / 14.0));
}

#[test]
fn empty_input_is_nothing_to_do_not_an_error() {
    let cfg = AtlasConfig::default();
    let out = pack_layout::<String>(Vec::new(), &cfg).expect("pack");
    assert_eq!((out.width, out.height), (0, 0));
    assert!(out.layout.placements.is_empty());
    assert!(out.uvs.is_empty());
}

#[test]
fn zero_size_input_is_rejected_even_with_a_gap() {
    let cfg = AtlasConfig::builder().gap(2).build();
    let err = pack_layout(vec![("a", 0u32, 5u32)], &cfg).unwrap_err();
    assert!(matches!(err, AtlasError::InvalidRectangle { index: 0, .. }));
}

#[test]
fn custom_mode_without_custom_size_fails_validation() {
    let cfg = AtlasConfig::builder().size_mode(SizeMode::Custom).build();
    let err = pack_layout(vec![("a", 10u32, 10u32)], &cfg).unwrap_err();
    assert!(matches!(err, AtlasError::InvalidConfig(_)));
}

#[test]
fn power_of_two_mode_rounds_the_emitted_canvas() {
    let cfg = AtlasConfig::builder()
        .size_mode(SizeMode::PowerOfTwo)
        .build();
    let out = pack_layout(vec![("a", 300u32, 150u32)], &cfg).expect("pack");
    assert_eq!((out.width, out.height), (512, 256));
    // sprites land 1:1; UVs are normalized against the final size
    let uv = out.uvs[0].uv;
    assert!(approx(uv.u_min, 0.0));
    assert!(approx(uv.u_max, 300.0 / 512.0));
    assert!(approx(uv.v_max, 150.0 / 256.0));
}

#[test]
fn quadratic_mode_squares_the_emitted_canvas() {
    let cfg = AtlasConfig::builder().size_mode(SizeMode::Quadratic).build();
    let out = pack_layout(vec![("a", 300u32, 150u32)], &cfg).expect("pack");
    assert_eq!((out.width, out.height), (300, 300));
}

#[test]
fn oversize_output_is_flagged_before_generation() {
    let cfg = AtlasConfig::builder()
        .size_mode(SizeMode::StrictCustom)
        .custom_size(25_000, 25_000)
        .build();
    let err = pack_layout(vec![("a", 64u32, 64u32)], &cfg).unwrap_err();
    assert!(matches!(err, AtlasError::OutputTooLarge { .. }));
}

#[test]
fn row_strategy_is_selectable_through_the_config() {
    let cfg = AtlasConfig::builder()
        .strategy(PackStrategy::AlignmentRows)
        .build();
    let out = pack_layout(vec![("a", 40u32, 40u32)], &cfg).expect("pack");
    // the row packer reports its power-of-two canvas
    assert_eq!((out.width, out.height), (64, 64));
}
