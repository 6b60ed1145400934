use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Packing strategies.
///
/// Both solve the same placement problem with different heuristics; callers
/// and tests can swap them without branching on the implementation type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackStrategy {
    /// Growing binary tree of free regions (first-fit, split on use, grow
    /// right or down preserving a near-square aspect). Good default.
    GrowingTree,
    /// Flat list of per-row alignment nodes with vertical allowances; canvas
    /// doubles alternately in width and height. Tighter for sets of many
    /// same-height, row-friendly images.
    AlignmentRows,
}

impl FromStr for PackStrategy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tree" | "growing_tree" => Ok(Self::GrowingTree),
            "rows" | "alignment_rows" => Ok(Self::AlignmentRows),
            _ => Err(()),
        }
    }
}

/// How the packed bounding size becomes the emitted canvas size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// Round each dimension up to the nearest power of two independently.
    PowerOfTwo,
    /// Make width = height = max(bounding size).
    Quadratic,
    /// Pass the bounding size through unchanged.
    Automatic,
    /// Scale proportionally to fit within the configured max width/height,
    /// preserving aspect ratio.
    Custom,
    /// Force exactly the configured width/height regardless of content
    /// aspect.
    StrictCustom,
}

impl FromStr for SizeMode {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pow2" | "power_of_two" => Ok(Self::PowerOfTwo),
            "quad" | "quadratic" => Ok(Self::Quadratic),
            "auto" | "automatic" => Ok(Self::Automatic),
            "custom" => Ok(Self::Custom),
            "strict" | "strict_custom" => Ok(Self::StrictCustom),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Which packer places the rectangles.
    #[serde(default = "default_strategy")]
    pub strategy: PackStrategy,
    /// How the packed bounding size becomes the emitted size.
    #[serde(default = "default_size_mode")]
    pub size_mode: SizeMode,
    /// Target dimensions for `Custom` / `StrictCustom`.
    #[serde(default)]
    pub custom_size: Option<(u32, u32)>,
    /// Pixels of breathing room around each texture. Added as `2*gap` to both
    /// dimensions before packing and subtracted when reporting UV rects.
    #[serde(default)]
    pub gap: u32,
    /// Pack independent categories on rayon workers when the `parallel`
    /// feature is enabled.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            size_mode: default_size_mode(),
            custom_size: None,
            gap: 0,
            parallel: false,
        }
    }
}

fn default_strategy() -> PackStrategy {
    PackStrategy::GrowingTree
}
fn default_size_mode() -> SizeMode {
    SizeMode::Automatic
}

/// Gap values above this would let padded dimensions overflow u32 on
/// degenerate inputs.
const MAX_GAP: u32 = 8192;

impl AtlasConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - A custom size mode is selected without custom dimensions
    /// - Custom dimensions are zero
    /// - The gap is unreasonably large
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if matches!(self.size_mode, SizeMode::Custom | SizeMode::StrictCustom) {
            match self.custom_size {
                None => {
                    return Err(AtlasError::InvalidConfig(format!(
                        "size mode {:?} requires custom_size",
                        self.size_mode
                    )));
                }
                Some((w, h)) if w == 0 || h == 0 => {
                    return Err(AtlasError::InvalidConfig(format!(
                        "custom_size must be positive, got {}x{}",
                        w, h
                    )));
                }
                Some(_) => {}
            }
        }

        if self.gap > MAX_GAP {
            return Err(AtlasError::InvalidConfig(format!(
                "gap ({}) exceeds the supported maximum of {}",
                self.gap, MAX_GAP
            )));
        }

        Ok(())
    }

    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}

/// Builder for `AtlasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    pub fn strategy(mut self, v: PackStrategy) -> Self {
        self.cfg.strategy = v;
        self
    }
    pub fn size_mode(mut self, v: SizeMode) -> Self {
        self.cfg.size_mode = v;
        self
    }
    pub fn custom_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.custom_size = Some((w, h));
        self
    }
    pub fn gap(mut self, v: u32) -> Self {
        self.cfg.gap = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}
