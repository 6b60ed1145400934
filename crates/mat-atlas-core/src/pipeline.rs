use std::collections::HashMap;

use image::{DynamicImage, RgbaImage, imageops};
use tracing::{debug, info, instrument};

use crate::adjust::{adjust_size, check_output_size};
use crate::compositing::blit_rgba;
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::model::{Layout, PackItem, Rect, UvRect};
use crate::packer::packer_for;

/// In-memory image to pack (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Per-item normalized texture rect within the final atlas, gap removed.
#[derive(Debug, Clone)]
pub struct UvFrame {
    pub key: String,
    pub uv: UvRect,
}

/// Output of a layout-only run: placements plus the adjusted canvas size and
/// the UV rects a remapping step needs. No pixel data.
#[derive(Debug)]
pub struct LayoutOutput {
    /// Placements in padded pixel space and the packed bounding size.
    pub layout: Layout,
    /// Final emitted canvas width after size adjustment.
    pub width: u32,
    /// Final emitted canvas height after size adjustment.
    pub height: u32,
    pub uvs: Vec<UvFrame>,
}

/// Output of a full packing run: layout, final size, UV rects, and the
/// composited RGBA page.
pub struct PackOutput {
    pub layout: Layout,
    pub width: u32,
    pub height: u32,
    pub uvs: Vec<UvFrame>,
    pub rgba: RgbaImage,
}

/// Packs bare sizes without compositing pixel data.
///
/// Inputs are (key, width, height). Each rectangle is padded by `2*gap` on
/// both axes before packing; the gap is subtracted again when the UV rects
/// are reported. Empty input is a successful empty output, not an error.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: &AtlasConfig,
) -> Result<LayoutOutput> {
    cfg.validate()?;

    if inputs.is_empty() {
        return Ok(LayoutOutput {
            layout: Layout::empty(),
            width: 0,
            height: 0,
            uvs: Vec::new(),
        });
    }

    let items = padded_items(
        inputs.into_iter().map(|(k, w, h)| (k.into(), w, h)),
        cfg.gap,
    )?;
    let layout = packer_for(&cfg.strategy).pack(&items)?;

    let bounding = (layout.width, layout.height);
    let (width, height) = adjust_size(bounding, &cfg.size_mode, cfg.custom_size)?;
    check_output_size((width, height))?;
    debug!(
        bounding_w = bounding.0,
        bounding_h = bounding.1,
        width,
        height,
        "size adjusted"
    );

    let uvs = compute_uvs(&layout, cfg.gap, bounding, (width, height));
    Ok(LayoutOutput {
        layout,
        width,
        height,
        uvs,
    })
}

#[instrument(skip_all)]
/// Packs `inputs` into one atlas page using configuration `cfg`.
///
/// On top of the layout path this composites every source image into an RGBA
/// canvas at the final adjusted size. When a custom mode shrinks the canvas
/// below the packed bounds, sprites are resized into proportionally scaled
/// rects and the UV rects follow them.
pub fn pack_images(inputs: Vec<InputImage>, cfg: &AtlasConfig) -> Result<PackOutput> {
    cfg.validate()?;

    if inputs.is_empty() {
        return Ok(PackOutput {
            layout: Layout::empty(),
            width: 0,
            height: 0,
            uvs: Vec::new(),
            rgba: RgbaImage::new(0, 0),
        });
    }

    let mut sources: HashMap<String, RgbaImage> = HashMap::with_capacity(inputs.len());
    let mut sized: Vec<(String, u32, u32)> = Vec::with_capacity(inputs.len());
    for inp in inputs {
        let rgba = inp.image.to_rgba8();
        let (w, h) = rgba.dimensions();
        sized.push((inp.key.clone(), w, h));
        sources.insert(inp.key, rgba);
    }

    let items = padded_items(sized.into_iter(), cfg.gap)?;
    let layout = packer_for(&cfg.strategy).pack(&items)?;

    let bounding = (layout.width, layout.height);
    let (width, height) = adjust_size(bounding, &cfg.size_mode, cfg.custom_size)?;
    check_output_size((width, height))?;
    info!(
        width,
        height,
        placements = layout.placements.len(),
        "packed atlas"
    );

    let mut canvas = RgbaImage::new(width, height);
    let mut uvs = Vec::with_capacity(layout.placements.len());
    for placement in &layout.placements {
        let dest = content_rect_in_final(&placement.frame, cfg.gap, bounding, (width, height));
        if let Some(src) = sources.get(&placement.key) {
            if (dest.w, dest.h) == src.dimensions() {
                blit_rgba(src, &mut canvas, dest.x, dest.y);
            } else {
                let resized = imageops::resize(src, dest.w, dest.h, imageops::FilterType::Triangle);
                blit_rgba(&resized, &mut canvas, dest.x, dest.y);
            }
        }
        uvs.push(UvFrame {
            key: placement.key.clone(),
            uv: uv_for(&dest, width, height),
        });
    }

    Ok(PackOutput {
        layout,
        width,
        height,
        uvs,
        rgba: canvas,
    })
}

/// Validates original dimensions, then pads each by `2*gap` on both axes.
/// Validation happens pre-padding so a zero-size input cannot hide behind
/// its gap.
fn padded_items(
    inputs: impl Iterator<Item = (String, u32, u32)>,
    gap: u32,
) -> Result<Vec<PackItem<String>>> {
    let gap2 = gap * 2;
    let mut items = Vec::new();
    for (index, (key, w, h)) in inputs.enumerate() {
        if w == 0 || h == 0 {
            return Err(AtlasError::InvalidRectangle {
                index,
                width: w,
                height: h,
            });
        }
        items.push(PackItem::new(key, w + gap2, h + gap2));
    }
    Ok(items)
}

/// Pixel rect a placement's content (gap removed) occupies in the final
/// canvas. Identity while the canvas only grew; proportionally scaled when a
/// custom mode shrank a dimension below the packed bounds.
fn content_rect_in_final(frame: &Rect, gap: u32, bounding: (u32, u32), fin: (u32, u32)) -> Rect {
    let content = Rect::new(
        frame.x + gap,
        frame.y + gap,
        frame.w - 2 * gap,
        frame.h - 2 * gap,
    );
    if fin.0 >= bounding.0 && fin.1 >= bounding.1 {
        return content;
    }
    let sx = fin.0 as f64 / bounding.0 as f64;
    let sy = fin.1 as f64 / bounding.1 as f64;
    Rect::new(
        (content.x as f64 * sx).round() as u32,
        (content.y as f64 * sy).round() as u32,
        ((content.w as f64 * sx).round() as u32).max(1),
        ((content.h as f64 * sy).round() as u32).max(1),
    )
}

fn uv_for(content: &Rect, fw: u32, fh: u32) -> UvRect {
    UvRect {
        u_min: content.x as f32 / fw as f32,
        v_min: content.y as f32 / fh as f32,
        u_max: (content.x + content.w) as f32 / fw as f32,
        v_max: (content.y + content.h) as f32 / fh as f32,
    }
}

fn compute_uvs(layout: &Layout, gap: u32, bounding: (u32, u32), fin: (u32, u32)) -> Vec<UvFrame> {
    layout
        .placements
        .iter()
        .map(|p| {
            let dest = content_rect_in_final(&p.frame, gap, bounding, fin);
            UvFrame {
                key: p.key.clone(),
                uv: uv_for(&dest, fin.0, fin.1),
            }
        })
        .collect()
}
