use crate::config::PackStrategy;
use crate::error::{AtlasError, Result};
use crate::model::{Layout, PackItem};

pub mod rows;
pub mod tree;

pub use rows::AlignmentRowPacker;
pub use tree::GrowingTreePacker;

/// A packer decides an (x, y) offset for every input rectangle and the
/// canvas extent that contains them.
///
/// Implementations must keep placements pairwise disjoint and be
/// deterministic for identical input order. All mutable state is scoped to
/// one `pack` call; the strategy values themselves are stateless and may be
/// shared freely across runs and threads.
pub trait RectanglePacker<K> {
    fn pack(&self, items: &[PackItem<K>]) -> Result<Layout<K>>;
}

/// Returns the packer implementing `strategy`.
pub fn packer_for<K: Clone>(strategy: &PackStrategy) -> Box<dyn RectanglePacker<K>> {
    match strategy {
        PackStrategy::GrowingTree => Box::new(GrowingTreePacker),
        PackStrategy::AlignmentRows => Box::new(AlignmentRowPacker),
    }
}

/// Rejects zero-dimension items before any packer state is built.
pub(crate) fn validate_items<K>(items: &[PackItem<K>]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        if item.w == 0 || item.h == 0 {
            return Err(AtlasError::InvalidRectangle {
                index,
                width: item.w,
                height: item.h,
            });
        }
    }
    Ok(())
}
