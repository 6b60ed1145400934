use std::collections::BTreeMap;

use tracing::trace;

use super::{RectanglePacker, validate_items};
use crate::error::{AtlasError, Result};
use crate::model::{Layout, PackItem, Placement, Rect};

/// Ascending table of permissible initial canvas sizes. The first item must
/// fit one of these; afterwards the canvas doubles freely.
const BASE_SIZES: [u32; 14] = [
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192,
];

/// Rightmost occupied frontier of one row.
///
/// `allowance` bounds how tall an item placed at this frontier may be
/// without breaching the next row down. Signed: the widen-growth path can
/// drive it negative, and a negative allowance simply never accepts an item.
#[derive(Clone, Copy, Debug)]
struct AlignmentNode {
    x: u32,
    y: u32,
    allowance: i64,
}

/// At most one node per row, keyed and scanned by row-origin y.
#[derive(Debug, Default)]
struct NodeRegistry {
    rows: BTreeMap<u32, AlignmentNode>,
}

/// Result of one selection scan: row keys of the frontier nodes relevant to
/// placement and growth.
struct ScanResult {
    /// Node with the greatest x (widen-growth fallback).
    rightmost: u32,
    /// Node with the greatest y (heighten-growth fallback).
    lowest: u32,
    /// Among nodes that can take the item, the one with the greatest x.
    valid: Option<u32>,
}

impl NodeRegistry {
    fn insert(&mut self, node: AlignmentNode) {
        self.rows.insert(node.y, node);
    }

    fn get(&self, y: u32) -> Option<AlignmentNode> {
        self.rows.get(&y).copied()
    }

    fn contains_row(&self, y: u32) -> bool {
        self.rows.contains_key(&y)
    }

    fn set_allowance(&mut self, y: u32, allowance: i64) {
        if let Some(node) = self.rows.get_mut(&y) {
            node.allowance = allowance;
        }
    }

    /// Scans every node once, tracking the growth fallbacks and the
    /// tightest valid candidate (greatest x; first row in ascending-y order
    /// wins ties).
    fn scan(&self, w: u32, h: u32, canvas_w: u32, canvas_h: u32) -> ScanResult {
        // Seeded before any item beyond the first, so the registry is
        // never empty here.
        let first = self.rows.values().next().copied().unwrap_or(AlignmentNode {
            x: 0,
            y: 0,
            allowance: 0,
        });
        let mut rightmost = first;
        let mut lowest = first;
        let mut valid: Option<AlignmentNode> = None;

        for node in self.rows.values() {
            if node.x > rightmost.x {
                rightmost = *node;
            }
            if node.y > lowest.y {
                lowest = *node;
            }
            if (h as i64) > node.allowance {
                continue;
            }
            if (canvas_w as i64) - (node.x as i64) >= w as i64
                && (canvas_h as i64) - (node.y as i64) >= h as i64
            {
                match valid {
                    None => valid = Some(*node),
                    Some(best) if node.x > best.x => valid = Some(*node),
                    Some(_) => {}
                }
            }
        }

        ScanResult {
            rightmost: rightmost.y,
            lowest: lowest.y,
            valid: valid.map(|n| n.y),
        }
    }

    /// Places a `w x h` item at row `y` and returns the placement origin.
    ///
    /// Advances the frontier by `w` and shrinks its allowance to `h`, opens
    /// the follow-up row at `y + h` with the leftover allowance (unless that
    /// row already has a node), and merges the advanced node into the first
    /// other node (ascending y) whose frontier now coincides with it.
    fn place(&mut self, y: u32, w: u32, h: u32) -> (u32, u32) {
        let node = self.rows[&y];
        let origin = (node.x, node.y);
        let prev_allowance = node.allowance;

        let advanced = AlignmentNode {
            x: node.x + w,
            y: node.y,
            allowance: h as i64,
        };
        self.rows.insert(advanced.y, advanced);

        let next_row = node.y + h;
        if !self.contains_row(next_row) {
            let opened = AlignmentNode {
                x: node.x,
                y: next_row,
                allowance: prev_allowance - h as i64,
            };
            trace!(
                x = opened.x,
                y = opened.y,
                allowance = opened.allowance,
                "open row"
            );
            self.insert(opened);
        }

        if let Some(other_y) = self.row_sharing_x(advanced.x, advanced.y) {
            if let Some(removed) = self.rows.remove(&advanced.y) {
                trace!(x = removed.x, y = removed.y, into = other_y, "merge rows");
                if let Some(other) = self.rows.get_mut(&other_y) {
                    other.allowance += removed.allowance;
                }
            }
        }

        origin
    }

    /// First row (ascending y) other than `y` whose frontier sits at `x`.
    fn row_sharing_x(&self, x: u32, y: u32) -> Option<u32> {
        self.rows
            .values()
            .find(|n| n.x == x && n.y != y)
            .map(|n| n.y)
    }
}

fn base_size_for(max_side: u32) -> Option<u32> {
    BASE_SIZES.iter().copied().find(|&s| max_side <= s)
}

/// Which way the canvas doubles next when no frontier fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GrowDirection {
    Wider,
    Taller,
}

/// Alignment-row packer.
///
/// The first item seeds a square power-of-two canvas; every later item lands
/// on the rightmost frontier that can take it. When none can, the canvas
/// doubles in width and height alternately. Collinear frontiers merge so the
/// registry stays small over long runs.
pub struct AlignmentRowPacker;

impl<K: Clone> RectanglePacker<K> for AlignmentRowPacker {
    fn pack(&self, items: &[PackItem<K>]) -> Result<Layout<K>> {
        validate_items(items)?;
        if items.is_empty() {
            return Ok(Layout::empty());
        }

        let first = &items[0];
        let side =
            base_size_for(first.w.max(first.h)).ok_or(AtlasError::GrowthImpossible {
                width: first.w,
                height: first.h,
            })?;
        let mut canvas_w = side;
        let mut canvas_h = side;

        let mut placements: Vec<Placement<K>> = Vec::with_capacity(items.len());
        placements.push(Placement {
            key: first.key.clone(),
            frame: Rect::new(0, 0, first.w, first.h),
        });

        let mut registry = NodeRegistry::default();
        registry.insert(AlignmentNode {
            x: first.w,
            y: 0,
            allowance: first.h as i64,
        });
        registry.insert(AlignmentNode {
            x: 0,
            y: first.h,
            allowance: 0,
        });

        // Explicit per-run growth toggle; starts by widening.
        let mut grow = GrowDirection::Wider;

        for item in &items[1..] {
            let scan = registry.scan(item.w, item.h, canvas_w, canvas_h);
            let target = match scan.valid {
                Some(y) => y,
                None => match grow {
                    GrowDirection::Wider => {
                        canvas_w *= 2;
                        trace!(canvas_w, canvas_h, "grow wider");
                        grow = GrowDirection::Taller;
                        scan.rightmost
                    }
                    GrowDirection::Taller => {
                        canvas_h *= 2;
                        trace!(canvas_w, canvas_h, "grow taller");
                        if let Some(lowest) = registry.get(scan.lowest) {
                            registry
                                .set_allowance(lowest.y, canvas_h as i64 - lowest.y as i64);
                        }
                        grow = GrowDirection::Wider;
                        scan.lowest
                    }
                },
            };

            let (x, y) = registry.place(target, item.w, item.h);
            trace!(x, y, w = item.w, h = item.h, "place");
            placements.push(Placement {
                key: item.key.clone(),
                frame: Rect::new(x, y, item.w, item.h),
            });
        }

        Ok(Layout {
            width: canvas_w,
            height: canvas_h,
            placements,
        })
    }
}
