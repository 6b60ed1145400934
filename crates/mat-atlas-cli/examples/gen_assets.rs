//! Generates folders of solid-color test sprites for trying the CLI:
//! `cargo run -p mat-atlas-cli --example gen_assets -- [out_dir]`
//! then `mat-atlas pack assets/body assets/cloth assets/props`.

use std::fs;
use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};

fn solid(w: u32, h: u32, c: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(c))
}

fn random_color_opaque(rng: &mut impl Rng) -> [u8; 4] {
    [
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        255,
    ]
}

fn main() -> anyhow::Result<()> {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);

    // (category, count, size range): a row-friendly set, a mixed set, and a
    // handful of large rectangles.
    let cats: [(&str, u32, (u32, u32)); 3] = [
        ("body", 24, (32, 32)),
        ("cloth", 40, (8, 96)),
        ("props", 6, (128, 512)),
    ];

    for (name, count, (lo, hi)) in cats {
        let dir = root.join(name);
        fs::create_dir_all(&dir)?;
        for i in 0..count {
            let w = rng.gen_range(lo..=hi);
            let h = rng.gen_range(lo..=hi);
            let img = solid(w, h, random_color_opaque(&mut rng));
            img.save(dir.join(format!("{}_{:03}.png", name, i)))?;
        }
        println!("wrote {} sprites to {}", count, dir.display());
    }
    Ok(())
}
