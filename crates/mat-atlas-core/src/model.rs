use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    /// Returns true if `self` and `r` share any pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        let ax2 = self.x + self.w;
        let ay2 = self.y + self.h;
        let bx2 = r.x + r.w;
        let by2 = r.y + r.h;
        !(self.x >= bx2 || r.x >= ax2 || self.y >= by2 || r.y >= ay2)
    }
}

/// An input rectangle to place: opaque key plus pixel dimensions.
///
/// Dimensions must be positive; the packers reject zero-size items up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackItem<K = String> {
    /// User-specified key (e.g., material name or image path).
    pub key: K,
    pub w: u32,
    pub h: u32,
}

impl<K> PackItem<K> {
    pub fn new(key: K, w: u32, h: u32) -> Self {
        Self { key, w, h }
    }
}

/// A placed rectangle within the atlas canvas.
///
/// Width and height are copied from the input item; no rotation is ever
/// performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement<K = String> {
    pub key: K,
    pub frame: Rect,
}

/// Result of one packing run: every placement plus the canvas extent they
/// were packed into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<K = String> {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement<K>>,
}

impl<K> Layout<K> {
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            placements: Vec::new(),
        }
    }

    /// Computes packing statistics for this layout.
    pub fn stats(&self) -> LayoutStats {
        let canvas_area = (self.width as u64) * (self.height as u64);
        let used_area: u64 = self
            .placements
            .iter()
            .map(|p| (p.frame.w as u64) * (p.frame.h as u64))
            .sum();
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        LayoutStats {
            num_placements: self.placements.len(),
            canvas_area,
            used_area,
            occupancy,
        }
    }
}

/// Normalized `[0,1]` texture-coordinate rectangle within the final atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UvRect {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

/// Statistics about packing efficiency of a single layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Number of rectangles placed.
    pub num_placements: usize,
    /// Canvas area in pixels (width * height).
    pub canvas_area: u64,
    /// Area covered by placements (sum of frame width * height).
    pub used_area: u64,
    /// Occupancy ratio: used_area / canvas_area (0.0 to 1.0).
    /// Higher is better (less wasted space).
    pub occupancy: f64,
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Placements: {}, Occupancy: {:.2}%, Canvas Area: {} px², Used Area: {} px²",
            self.num_placements,
            self.occupancy * 100.0,
            self.canvas_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }
}
