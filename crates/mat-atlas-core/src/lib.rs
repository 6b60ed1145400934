//! Core library for merging material textures into atlases.
//!
//! - Packers: growing binary tree (default) and alignment rows, behind one
//!   `RectanglePacker` trait
//! - Size adjustment: power-of-two / quadratic / automatic / custom /
//!   strict-custom, with a hard ceiling on the emitted size
//! - Pipeline: `pack_images` composites an RGBA atlas and emits per-texture
//!   UV rects; `pack_layout` is the layout-only variant
//! - Batch: `pack_batch` packs independent categories in isolation,
//!   optionally in parallel
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use mat_atlas_core::{AtlasConfig, InputImage, pack_images};
//! # fn main() -> anyhow::Result<()> {
//! let skin = ImageReader::open("skin.png")?.decode()?;
//! let cloth = ImageReader::open("cloth.png")?.decode()?;
//! let inputs = vec![
//!     InputImage { key: "skin".into(), image: skin },
//!     InputImage { key: "cloth".into(), image: cloth },
//! ];
//! let out = pack_images(inputs, &AtlasConfig::default())?;
//! println!("atlas: {}x{}", out.width, out.height);
//! # Ok(()) }
//! ```

pub mod adjust;
pub mod batch;
pub mod compositing;
pub mod config;
pub mod error;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use adjust::*;
pub use batch::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `mat_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::adjust::{MAX_OUTPUT_DIM, adjust_size, check_output_size};
    pub use crate::batch::{BatchOutput, Category, CategoryAtlas, CategoryFailure, pack_batch};
    pub use crate::config::{AtlasConfig, AtlasConfigBuilder, PackStrategy, SizeMode};
    pub use crate::error::AtlasError;
    pub use crate::model::{Layout, LayoutStats, PackItem, Placement, Rect, UvRect};
    pub use crate::packer::{AlignmentRowPacker, GrowingTreePacker, RectanglePacker, packer_for};
    pub use crate::pipeline::{
        InputImage, LayoutOutput, PackOutput, UvFrame, pack_images, pack_layout,
    };
}
