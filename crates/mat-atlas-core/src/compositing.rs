use image::RgbaImage;

/// Blit the whole of `src` into `canvas` with its top-left at (dx, dy).
/// Pixels falling outside the canvas are dropped.
///
/// Placements never rotate, so this is a straight row-by-row copy.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(xx, yy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}
