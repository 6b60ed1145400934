use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    /// An input rectangle had a zero dimension. Deterministic: retrying the
    /// same run will always fail again.
    #[error("invalid rectangle at index {index}: {width}x{height}")]
    InvalidRectangle {
        index: usize,
        width: u32,
        height: u32,
    },
    /// The packer could not establish a valid growth direction. Guarded as a
    /// fatal internal-invariant violation, never silently swallowed.
    #[error("packer cannot grow the canvas to fit {width}x{height}")]
    GrowthImpossible { width: u32, height: u32 },
    /// The adjusted output size exceeds the absolute pixel ceiling.
    /// User-facing and recoverable: pick a smaller custom size or merge
    /// fewer textures.
    #[error("the output image size of {width}x{height}px exceeds the {limit}px limit")]
    OutputTooLarge { width: u32, height: u32, limit: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
