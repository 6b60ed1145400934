use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use walkdir::WalkDir;

use mat_atlas_core::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "mat-atlas",
    about = "Merge folders of material textures into atlases",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack each input directory into an atlas (PNG + JSON metadata)
    Pack(PackArgs),
    /// Layout-only: compute placements and UV rects, write JSON, no PNGs
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input directories; each becomes an independently packed category
    #[arg(required = true, help_heading = "Input/Output")]
    inputs: Vec<PathBuf>,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name, used when a single input directory is given
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides packing options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Packing
    /// Packing strategy: tree | rows
    #[arg(long, value_parser = ["tree", "rows"], default_value = "tree", help_heading = "Packing")]
    strategy: String,
    /// Size mode: pow2 | quadratic | auto | custom | strict
    #[arg(long, default_value = "auto", help_heading = "Packing")]
    size_mode: String,
    /// Max atlas width for custom/strict size modes
    #[arg(long, help_heading = "Packing")]
    max_width: Option<u32>,
    /// Max atlas height for custom/strict size modes
    #[arg(long, help_heading = "Packing")]
    max_height: Option<u32>,
    /// Gap in pixels around each texture
    #[arg(long, default_value_t = 0, help_heading = "Packing")]
    gap: u32,
    /// Pack categories in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet, false),
        Commands::Layout(args) => run_pack(args, false, true),
    }
}

fn run_pack(args: &PackArgs, show_progress: bool, layout_only: bool) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;

    let cfg = build_config(args)?;

    let mut categories: Vec<Category> = Vec::new();
    for dir in &args.inputs {
        let paths = gather_paths(dir, &args.include, &args.exclude)?;
        let inputs = load_images_with_progress(&paths, show_progress)?;
        let name = category_name(dir, args);
        info!(category = %name, count = inputs.len(), "loaded input images");
        categories.push(Category { name, inputs });
    }

    if layout_only {
        return run_layout_only(categories, &cfg, &args.out_dir);
    }

    let total = categories.len();
    let batch = pack_batch(categories, &cfg);

    for atlas in &batch.atlases {
        let png_path = args.out_dir.join(format!("{}.png", atlas.name));
        atlas
            .output
            .rgba
            .save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        let stats = atlas.output.layout.stats();
        info!(?png_path, stats = %stats.summary(), "atlas written");

        write_metadata(
            &args.out_dir,
            &atlas.name,
            atlas.output.width,
            atlas.output.height,
            &atlas.output.layout,
            &atlas.output.uvs,
        )?;
    }

    if !batch.is_ok() {
        for failure in &batch.failures {
            error!(category = %failure.name, error = %failure.error, "category failed");
        }
        anyhow::bail!("{} of {} categories failed", batch.failures.len(), total);
    }
    Ok(())
}

fn run_layout_only(
    categories: Vec<Category>,
    cfg: &AtlasConfig,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let total = categories.len();
    let mut failed = 0usize;
    for cat in categories {
        let sized: Vec<(String, u32, u32)> = cat
            .inputs
            .iter()
            .map(|inp| {
                let (w, h) = inp.image.to_rgba8().dimensions();
                (inp.key.clone(), w, h)
            })
            .collect();
        match pack_layout(sized, cfg) {
            Ok(out) => {
                write_metadata(out_dir, &cat.name, out.width, out.height, &out.layout, &out.uvs)?;
                info!(category = %cat.name, width = out.width, height = out.height, "layout written");
            }
            Err(err) => {
                error!(category = %cat.name, error = %err, "category failed");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} of {} categories failed", failed, total);
    }
    Ok(())
}

#[derive(Serialize)]
struct MetaFrame<'a> {
    key: &'a str,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    uv: UvRect,
}

#[derive(Serialize)]
struct AtlasMetadata<'a> {
    name: &'a str,
    width: u32,
    height: u32,
    frames: Vec<MetaFrame<'a>>,
}

fn write_metadata(
    out_dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    layout: &Layout,
    uvs: &[UvFrame],
) -> anyhow::Result<()> {
    // Placements and UV frames come out of the pipeline in the same order.
    let frames: Vec<MetaFrame> = layout
        .placements
        .iter()
        .zip(uvs.iter())
        .map(|(p, u)| MetaFrame {
            key: &p.key,
            x: p.frame.x,
            y: p.frame.y,
            w: p.frame.w,
            h: p.frame.h,
            uv: u.uv,
        })
        .collect();
    let meta = AtlasMetadata {
        name,
        width,
        height,
        frames,
    };
    let json_path = out_dir.join(format!("{}.json", name));
    let json = serde_json::to_string_pretty(&meta)?;
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, "metadata written");
    Ok(())
}

fn category_name(dir: &Path, args: &PackArgs) -> String {
    if args.inputs.len() == 1 {
        return args.name.clone();
    }
    dir.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("atlas")
        .to_string()
}

fn build_config(args: &PackArgs) -> anyhow::Result<AtlasConfig> {
    let strategy: PackStrategy = args
        .strategy
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown strategy: {}", args.strategy))?;
    let size_mode: SizeMode = args
        .size_mode
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown size mode: {}", args.size_mode))?;
    let custom_size = match (args.max_width, args.max_height) {
        (Some(w), Some(h)) => Some((w, h)),
        (None, None) => None,
        _ => anyhow::bail!("--max-width and --max-height must be given together"),
    };
    let mut cfg = AtlasConfig {
        strategy,
        size_mode,
        custom_size,
        gap: args.gap,
        parallel: args.parallel,
    };

    // Config file, when given, wins over the flags.
    if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_atlas_config(cfg);
    }

    cfg.validate()?;
    Ok(cfg)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_glob_set(include)?;
    let exc_set = build_glob_set(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    // Directory walk order is platform-dependent; sort so runs are
    // reproducible.
    list.sort();
    Ok(list)
}

fn build_glob_set(patterns: &[String]) -> anyhow::Result<Option<globset::GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

fn load_images_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(img) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push(InputImage { key, image: img });
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    strategy: Option<String>,
    size_mode: Option<String>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    gap: Option<u32>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_atlas_config(self, mut cfg: AtlasConfig) -> AtlasConfig {
        if let Some(v) = self.strategy {
            cfg.strategy = v.parse().unwrap_or(cfg.strategy);
        }
        if let Some(v) = self.size_mode {
            cfg.size_mode = v.parse().unwrap_or(cfg.size_mode);
        }
        if let (Some(w), Some(h)) = (self.max_width, self.max_height) {
            cfg.custom_size = Some((w, h));
        }
        if let Some(v) = self.gap {
            cfg.gap = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        cfg
    }
}
