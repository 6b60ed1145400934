use image::{DynamicImage, Rgba, RgbaImage};
use mat_atlas_core::prelude::*;

fn solid(key: &str, w: u32, h: u32, c: [u8; 4]) -> InputImage {
    InputImage {
        key: key.to_string(),
        image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(c))),
    }
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn frame_of<'a>(out: &'a PackOutput, key: &str) -> &'a Rect {
    &out.layout
        .placements
        .iter()
        .find(|p| p.key == key)
        .expect("placement")
        .frame
}

#[test]
fn sprites_land_at_their_placements() {
    let inputs = vec![solid("red", 4, 4, RED), solid("blue", 4, 4, BLUE)];
    let out = pack_images(inputs, &AtlasConfig::default()).expect("pack");
    assert_eq!((out.width, out.height), (8, 4));

    let red = *frame_of(&out, "red");
    let blue = *frame_of(&out, "blue");
    assert_eq!(out.rgba.get_pixel(red.x, red.y), &Rgba(RED));
    assert_eq!(out.rgba.get_pixel(blue.x, blue.y), &Rgba(BLUE));
}

#[test]
fn gap_offsets_content_and_leaves_the_border_clear() {
    let cfg = AtlasConfig::builder().gap(1).build();
    let inputs = vec![solid("red", 4, 4, RED), solid("blue", 4, 4, BLUE)];
    let out = pack_images(inputs, &cfg).expect("pack");
    // two 6x6 padded slots side by side
    assert_eq!((out.width, out.height), (12, 6));

    let red = *frame_of(&out, "red");
    let blue = *frame_of(&out, "blue");
    assert_eq!(out.rgba.get_pixel(red.x + 1, red.y + 1), &Rgba(RED));
    assert_eq!(out.rgba.get_pixel(blue.x + 1, blue.y + 1), &Rgba(BLUE));
    // gap pixels stay untouched
    assert_eq!(out.rgba.get_pixel(red.x, red.y), &Rgba([0, 0, 0, 0]));
}

#[test]
fn custom_scale_down_resizes_sprites_and_uvs_follow() {
    let cfg = AtlasConfig::builder()
        .size_mode(SizeMode::Custom)
        .custom_size(8, 4)
        .build();
    let inputs = vec![solid("red", 8, 8, RED), solid("blue", 8, 8, BLUE)];
    let out = pack_images(inputs, &cfg).expect("pack");
    // bounding 16x8 scaled by 0.5 into the custom bounds
    assert_eq!((out.width, out.height), (8, 4));

    assert_eq!(out.rgba.get_pixel(0, 0), &Rgba(RED));
    assert_eq!(out.rgba.get_pixel(4, 0), &Rgba(BLUE));

    let red_uv = out.uvs.iter().find(|u| u.key == "red").expect("uv").uv;
    assert!((red_uv.u_min - 0.0).abs() < 1e-6);
    assert!((red_uv.u_max - 0.5).abs() < 1e-6);
    assert!((red_uv.v_max - 1.0).abs() < 1e-6);
}

#[test]
fn empty_input_composites_nothing() {
    let out = pack_images(Vec::new(), &AtlasConfig::default()).expect("pack");
    assert_eq!((out.width, out.height), (0, 0));
    assert_eq!(out.rgba.dimensions(), (0, 0));
}
