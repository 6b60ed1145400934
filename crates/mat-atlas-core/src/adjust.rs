//! Post-processing of the packed bounding size into the emitted canvas size.

use crate::config::SizeMode;
use crate::error::{AtlasError, Result};

/// Absolute ceiling on either dimension of an emitted atlas. Sizes above this
/// are rejected as a user-facing error before any atlas generation happens.
pub const MAX_OUTPUT_DIM: u32 = 20_000;

/// Smallest power of two >= `v` (1 for 0).
pub fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

/// Derives the emitted canvas dimensions from the packed bounding size.
///
/// `custom` is required for `Custom` and `StrictCustom`; `AtlasConfig::
/// validate` enforces that before packing, so a missing value here is an
/// `InvalidConfig` error rather than a panic.
pub fn adjust_size(
    bounding: (u32, u32),
    mode: &SizeMode,
    custom: Option<(u32, u32)>,
) -> Result<(u32, u32)> {
    let (w, h) = bounding;
    match mode {
        SizeMode::PowerOfTwo => Ok((next_pow2(w), next_pow2(h))),
        SizeMode::Quadratic => {
            let m = w.max(h);
            Ok((m, m))
        }
        SizeMode::Automatic => Ok((w, h)),
        SizeMode::Custom => {
            let (cw, ch) = custom.ok_or_else(|| {
                AtlasError::InvalidConfig("custom size mode requires custom_size".into())
            })?;
            if w == 0 || h == 0 {
                return Ok((w, h));
            }
            // Uniform scale so the result fits the custom bounds exactly,
            // aspect preserved; one dimension lands on its bound.
            let scale = (cw as f64 / w as f64).min(ch as f64 / h as f64);
            let sw = ((w as f64 * scale).round() as u32).max(1);
            let sh = ((h as f64 * scale).round() as u32).max(1);
            Ok((sw, sh))
        }
        SizeMode::StrictCustom => custom.ok_or_else(|| {
            AtlasError::InvalidConfig("strict custom size mode requires custom_size".into())
        }),
    }
}

/// Rejects adjusted sizes with any dimension above `MAX_OUTPUT_DIM`.
///
/// This is the driver's responsibility, not the packers': a too-large result
/// is a recoverable user decision (smaller custom size, fewer merged
/// textures), not a packing failure.
pub fn check_output_size(size: (u32, u32)) -> Result<()> {
    let (w, h) = size;
    if w > MAX_OUTPUT_DIM || h > MAX_OUTPUT_DIM {
        return Err(AtlasError::OutputTooLarge {
            width: w,
            height: h,
            limit: MAX_OUTPUT_DIM,
        });
    }
    Ok(())
}
