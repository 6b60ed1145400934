//! Multi-category workflow: several independent atlases out of one request.

use tracing::{error, info};

use crate::config::AtlasConfig;
use crate::error::AtlasError;
use crate::pipeline::{InputImage, PackOutput, pack_images};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One independently packed group of textures (e.g. all "body" materials).
pub struct Category {
    pub name: String,
    pub inputs: Vec<InputImage>,
}

/// A successfully packed category.
pub struct CategoryAtlas {
    pub name: String,
    pub output: PackOutput,
}

/// A failed category, reported alongside its siblings' successes.
pub struct CategoryFailure {
    pub name: String,
    pub error: AtlasError,
}

pub struct BatchOutput {
    pub atlases: Vec<CategoryAtlas>,
    pub failures: Vec<CategoryFailure>,
}

impl BatchOutput {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Packs every category with a fully isolated run.
///
/// One category failing (invalid rectangle, oversize output) never aborts
/// its siblings; failures accumulate and are reported together. Runs share
/// no mutable state, so with the `parallel` feature and `cfg.parallel` set
/// they execute on rayon workers without locking.
pub fn pack_batch(categories: Vec<Category>, cfg: &AtlasConfig) -> BatchOutput {
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let results: Vec<(String, crate::error::Result<PackOutput>)> = categories
                .into_par_iter()
                .map(|cat| {
                    let Category { name, inputs } = cat;
                    let res = pack_images(inputs, cfg);
                    (name, res)
                })
                .collect();
            return split_results(results);
        }
    }

    let results: Vec<(String, crate::error::Result<PackOutput>)> = categories
        .into_iter()
        .map(|cat| {
            let Category { name, inputs } = cat;
            let res = pack_images(inputs, cfg);
            (name, res)
        })
        .collect();
    split_results(results)
}

fn split_results(results: Vec<(String, crate::error::Result<PackOutput>)>) -> BatchOutput {
    let mut atlases = Vec::new();
    let mut failures = Vec::new();
    for (name, res) in results {
        match res {
            Ok(output) => {
                info!(
                    category = %name,
                    width = output.width,
                    height = output.height,
                    "category packed"
                );
                atlases.push(CategoryAtlas { name, output });
            }
            Err(err) => {
                error!(category = %name, error = %err, "category failed");
                failures.push(CategoryFailure { name, error: err });
            }
        }
    }
    BatchOutput { atlases, failures }
}
