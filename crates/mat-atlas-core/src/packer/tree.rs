use tracing::trace;

use super::{RectanglePacker, validate_items};
use crate::error::{AtlasError, Result};
use crate::model::{Layout, PackItem, Placement, Rect};

/// One region of the canvas. A leaf is available; once consumed it is split
/// into a `right` and a `down` child and never reused directly.
#[derive(Clone, Copy, Debug)]
struct Region {
    rect: Rect,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Region {
    fn leaf(rect: Rect) -> Self {
        Self {
            rect,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// Arena of region nodes addressed by index. Children and the root are index
/// references, so wrapping the old root inside a larger one on growth is an
/// index swap rather than a restructuring of nested ownership.
struct RegionArena {
    nodes: Vec<Region>,
    root: usize,
}

impl RegionArena {
    fn new(w: u32, h: u32) -> Self {
        Self {
            nodes: vec![Region::leaf(Rect::new(0, 0, w, h))],
            root: 0,
        }
    }

    fn alloc(&mut self, region: Region) -> usize {
        self.nodes.push(region);
        self.nodes.len() - 1
    }

    fn canvas(&self) -> Rect {
        self.nodes[self.root].rect
    }

    /// Depth-first search for the first leaf that fits, right child before
    /// down child.
    fn find(&self, idx: usize, w: u32, h: u32) -> Option<usize> {
        let node = self.nodes[idx];
        if node.used {
            node.right
                .and_then(|r| self.find(r, w, h))
                .or_else(|| node.down.and_then(|d| self.find(d, w, h)))
        } else if w <= node.rect.w && h <= node.rect.h {
            Some(idx)
        } else {
            None
        }
    }

    /// Consumes `w x h` at the origin of leaf `idx`, splitting the remainder
    /// into a down strip (full region width) and a right strip (item height).
    fn split(&mut self, idx: usize, w: u32, h: u32) -> Rect {
        let rect = self.nodes[idx].rect;
        let down = self.alloc(Region::leaf(Rect::new(
            rect.x,
            rect.y + h,
            rect.w,
            rect.h - h,
        )));
        let right = self.alloc(Region::leaf(Rect::new(rect.x + w, rect.y, rect.w - w, h)));
        let node = &mut self.nodes[idx];
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
        Rect::new(rect.x, rect.y, w, h)
    }

    /// Wraps the current root as the `down` child of a new root widened by
    /// `w`; the new `right` child is the fresh full-height strip.
    fn grow_right(&mut self, w: u32) {
        let old = self.canvas();
        let strip = self.alloc(Region::leaf(Rect::new(old.w, 0, w, old.h)));
        let old_root = self.root;
        let new_root = self.alloc(Region {
            rect: Rect::new(0, 0, old.w + w, old.h),
            used: true,
            right: Some(strip),
            down: Some(old_root),
        });
        self.root = new_root;
    }

    /// Wraps the current root as the `right` child of a new root heightened
    /// by `h`; the new `down` child is the fresh full-width strip.
    fn grow_down(&mut self, h: u32) {
        let old = self.canvas();
        let strip = self.alloc(Region::leaf(Rect::new(0, old.h, old.w, h)));
        let old_root = self.root;
        let new_root = self.alloc(Region {
            rect: Rect::new(0, 0, old.w, old.h + h),
            used: true,
            right: Some(old_root),
            down: Some(strip),
        });
        self.root = new_root;
    }
}

/// Growing-binary-tree packer.
///
/// The canvas starts at the first item's size and grows rightward or
/// downward when nothing fits, choosing the direction that keeps the canvas
/// near square. Input order determines placement order, so different
/// orderings of the same set produce different (equally valid) layouts.
pub struct GrowingTreePacker;

impl GrowingTreePacker {
    fn grow_and_place(&self, arena: &mut RegionArena, w: u32, h: u32) -> Result<Rect> {
        let canvas = arena.canvas();
        let can_grow_right = h <= canvas.h;
        let can_grow_down = w <= canvas.w;
        let should_grow_right = can_grow_right && canvas.h >= canvas.w + w;
        let should_grow_down = can_grow_down && canvas.w >= canvas.h + h;

        if should_grow_right || (!should_grow_down && can_grow_right) {
            trace!(w, h, canvas_w = canvas.w, canvas_h = canvas.h, "grow right");
            arena.grow_right(w);
        } else if should_grow_down || can_grow_down {
            trace!(w, h, canvas_w = canvas.w, canvas_h = canvas.h, "grow down");
            arena.grow_down(h);
        } else {
            return Err(AtlasError::GrowthImpossible {
                width: w,
                height: h,
            });
        }

        // The fresh strip is at least item-sized, so a failed retry here
        // means the tree state is corrupt.
        let idx = arena
            .find(arena.root, w, h)
            .ok_or(AtlasError::GrowthImpossible {
                width: w,
                height: h,
            })?;
        Ok(arena.split(idx, w, h))
    }
}

impl<K: Clone> RectanglePacker<K> for GrowingTreePacker {
    fn pack(&self, items: &[PackItem<K>]) -> Result<Layout<K>> {
        validate_items(items)?;
        if items.is_empty() {
            return Ok(Layout::empty());
        }

        let mut arena = RegionArena::new(items[0].w, items[0].h);
        let mut placements: Vec<Placement<K>> = Vec::with_capacity(items.len());

        for item in items {
            let frame = match arena.find(arena.root, item.w, item.h) {
                Some(idx) => arena.split(idx, item.w, item.h),
                None => self.grow_and_place(&mut arena, item.w, item.h)?,
            };
            placements.push(Placement {
                key: item.key.clone(),
                frame,
            });
        }

        // Content bounding box, not the root extent: the last growth strip
        // is rarely filled to its far edge.
        let width = placements
            .iter()
            .map(|p| p.frame.x + p.frame.w)
            .max()
            .unwrap_or(0);
        let height = placements
            .iter()
            .map(|p| p.frame.y + p.frame.h)
            .max()
            .unwrap_or(0);

        Ok(Layout {
            width,
            height,
            placements,
        })
    }
}
