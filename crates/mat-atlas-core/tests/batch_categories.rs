use image::{DynamicImage, Rgba, RgbaImage};
use mat_atlas_core::prelude::*;

fn solid(key: &str, w: u32, h: u32) -> InputImage {
    InputImage {
        key: key.to_string(),
        image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255]))),
    }
}

fn degenerate(key: &str) -> InputImage {
    InputImage {
        key: key.to_string(),
        image: DynamicImage::ImageRgba8(RgbaImage::new(0, 0)),
    }
}

#[test]
fn one_failing_category_does_not_abort_its_siblings() {
    let categories = vec![
        Category {
            name: "broken".to_string(),
            inputs: vec![solid("ok", 8, 8), degenerate("zero")],
        },
        Category {
            name: "body".to_string(),
            inputs: vec![solid("skin", 16, 16), solid("mouth", 16, 16)],
        },
    ];
    let batch = pack_batch(categories, &AtlasConfig::default());

    assert!(!batch.is_ok());
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].name, "broken");
    assert!(matches!(
        batch.failures[0].error,
        AtlasError::InvalidRectangle { index: 1, .. }
    ));

    assert_eq!(batch.atlases.len(), 1);
    assert_eq!(batch.atlases[0].name, "body");
    assert_eq!(batch.atlases[0].output.layout.placements.len(), 2);
}

#[test]
fn oversize_category_fails_recoverably() {
    let cfg = AtlasConfig::builder()
        .size_mode(SizeMode::StrictCustom)
        .custom_size(25_000, 25_000)
        .build();
    let categories = vec![Category {
        name: "huge".to_string(),
        inputs: vec![solid("a", 32, 32)],
    }];
    let batch = pack_batch(categories, &cfg);
    assert!(batch.atlases.is_empty());
    assert!(matches!(
        batch.failures[0].error,
        AtlasError::OutputTooLarge { .. }
    ));
}

#[test]
fn empty_category_is_a_successful_nothing_to_do() {
    let categories = vec![Category {
        name: "unused".to_string(),
        inputs: Vec::new(),
    }];
    let batch = pack_batch(categories, &AtlasConfig::default());
    assert!(batch.is_ok());
    assert_eq!(batch.atlases.len(), 1);
    assert_eq!(batch.atlases[0].output.width, 0);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_batch_matches_sequential_results() {
    let make = || {
        vec![
            Category {
                name: "a".to_string(),
                inputs: vec![solid("a0", 8, 8), solid("a1", 8, 8)],
            },
            Category {
                name: "b".to_string(),
                inputs: vec![solid("b0", 16, 8)],
            },
        ]
    };
    let sequential = pack_batch(make(), &AtlasConfig::default());
    let parallel = pack_batch(make(), &AtlasConfig::builder().parallel(true).build());
    assert_eq!(sequential.atlases.len(), parallel.atlases.len());
    for (s, p) in sequential.atlases.iter().zip(parallel.atlases.iter()) {
        assert_eq!(s.name, p.name);
        assert_eq!((s.output.width, s.output.height), (p.output.width, p.output.height));
    }
}
