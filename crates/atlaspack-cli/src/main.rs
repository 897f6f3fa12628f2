use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use atlaspack_core::prelude::*;
use atlaspack_core::{to_json_array, to_json_hash, to_json_list};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use image::RgbaImage;
use tracing::{info, warn};

mod compositing;
mod inputs;
mod profiles;

use profiles::Profile;

#[derive(Parser, Debug)]
#[command(
    name = "atlaspack",
    about = "Pack folders of images into fixed-size atlas pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
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
    /// Pack images into atlas pages (PNG pages + JSON manifest)
    Pack(PackArgs),
    /// Layout-only: read image sizes and write the manifest, no PNGs
    Layout(PackArgs),
    /// List, show or create profile files
    Profiles(ProfilesArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum MetadataFormat {
    /// Flat list of placements
    List,
    /// Pages with their placements
    Array,
    /// Placements keyed by item id
    Hash,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input directories (replace the profile's directories when given)
    #[arg(help_heading = "Input/Output")]
    inputs: Vec<PathBuf>,
    /// Output directory [default: out]
    #[arg(short, long, help_heading = "Input/Output")]
    out_dir: Option<PathBuf>,
    /// Atlas base name: pages are <name><page>.png, manifest is <name>.json [default: Atlas]
    #[arg(short, long, help_heading = "Input/Output")]
    name: Option<String>,
    /// Profile file (YAML or JSON list of profiles)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Profile id or index inside --config [default: 0]
    #[arg(long, requires = "config", help_heading = "Input/Output")]
    profile: Option<String>,
    /// File name glob, e.g. "*.png" [default: *]
    #[arg(long, help_heading = "Input/Output")]
    filter: Option<String>,
    /// Descend into subdirectories [default: false]
    #[arg(long, action = ArgAction::Set, help_heading = "Input/Output")]
    recursive: Option<bool>,

    // Layout
    /// Page width [default: 4096]
    #[arg(long, help_heading = "Layout")]
    width: Option<u32>,
    /// Page height [default: 4096]
    #[arg(long, help_heading = "Layout")]
    height: Option<u32>,
    /// Allow 90° rotation [default: true]
    #[arg(long, action = ArgAction::Set, help_heading = "Layout")]
    allow_rotation: Option<bool>,
    /// MaxRects heuristic: bssf|blsf|baf|bl|cp [default: bssf]
    #[arg(long, help_heading = "Layout")]
    heuristic: Option<String>,
    /// Fail when more pages than this would be needed
    #[arg(long, help_heading = "Layout")]
    max_pages: Option<usize>,
    /// Fail when packing runs longer than this (0 disables)
    #[arg(long, help_heading = "Layout")]
    time_budget_ms: Option<u64>,

    // Export
    /// Manifest shape
    #[arg(long, value_enum, default_value_t = MetadataFormat::List, help_heading = "Export")]
    metadata: MetadataFormat,
    /// Remove the pages listed in an earlier <name>.json, and that manifest, first.
    /// Names ending in a digit share page file names with other atlases
    /// (Atlas1 page 0 and Atlas page 10 are both Atlas10.png)
    #[arg(long, default_value_t = false, help_heading = "Export")]
    clean: bool,
    /// Drop images larger than a page (with a warning) instead of failing
    #[arg(long, default_value_t = false, help_heading = "Export")]
    skip_unplaceable: bool,
    /// Pack and report without writing any file
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct ProfilesArgs {
    /// Profile file (YAML or JSON)
    file: PathBuf,
    /// Print one profile (id or index) as YAML
    #[arg(long, conflicts_with = "init")]
    show: Option<String>,
    /// Write a file holding one default profile
    #[arg(long, default_value_t = false)]
    init: bool,
    /// Let --init overwrite an existing file
    #[arg(long, default_value_t = false, requires = "init")]
    force: bool,
}

/// Effective settings of one run: profile values with command-line overrides applied.
#[derive(Debug, Clone)]
struct Job {
    directories: Vec<PathBuf>,
    out_dir: PathBuf,
    name: String,
    filter: String,
    recursive: bool,
    cfg: BinPackConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Pack(args) => run_pack(args, false, show_progress),
        Commands::Layout(args) => run_pack(args, true, show_progress),
        Commands::Profiles(args) => run_profiles(args),
    }
}

fn run_pack(args: &PackArgs, layout_only: bool, show_progress: bool) -> anyhow::Result<()> {
    let job = resolve_job(args)?;
    info!(
        dirs = ?job.directories,
        bin = %format!("{}x{}", job.cfg.bin_width, job.cfg.bin_height),
        heuristic = %job.cfg.heuristic,
        rotation = job.cfg.allow_rotation,
        "resolved job"
    );

    let sources = inputs::gather_sources(&job.directories, &job.filter, job.recursive)?;
    if sources.is_empty() {
        warn!(filter = %job.filter, "no images found");
    } else {
        info!(count = sources.len(), "found images");
    }

    let (items, images) = if layout_only {
        let sized = inputs::load_all(sources, show_progress, "reading", inputs::read_dimensions);
        let items: Vec<Item> = sized
            .into_iter()
            .map(|(src, (w, h))| Item::new(src.id, w, h))
            .collect();
        (items, None)
    } else {
        let decoded = inputs::load_all(sources, show_progress, "loading", inputs::load_rgba);
        let mut items = Vec::with_capacity(decoded.len());
        let mut images = HashMap::with_capacity(decoded.len());
        for (src, img) in decoded {
            let (w, h) = img.dimensions();
            items.push(Item::new(src.id.clone(), w, h));
            images.insert(src.id, img);
        }
        (items, Some(images))
    };

    let items = if args.skip_unplaceable {
        let (keep, rejected) = partition_placeable(items, &job.cfg);
        for r in &rejected {
            warn!(image = %r, "skipping image larger than the page");
        }
        keep
    } else {
        items
    };

    let atlas = pack(items, job.cfg.clone()).context("packing failed")?;
    info!("{}", atlas.stats().summary());

    if args.dry_run {
        return Ok(());
    }
    if job.name.ends_with(|c: char| c.is_ascii_digit()) {
        warn!(
            name = %job.name,
            "atlas name ends in a digit; its page files can collide with another atlas"
        );
    }
    fs::create_dir_all(&job.out_dir)
        .with_context(|| format!("create {}", job.out_dir.display()))?;
    if args.clean {
        clean_outputs(&job.out_dir, &job.name)?;
    }
    if let Some(images) = &images {
        write_pages(&atlas, images, &job)?;
    }
    write_manifest(&atlas, args.metadata, &job)
}

fn resolve_job(args: &PackArgs) -> anyhow::Result<Job> {
    let base = match &args.config {
        Some(path) => {
            let list = profiles::load_profiles(path)?;
            let selector = args.profile.as_deref().unwrap_or("0");
            profiles::select(&list, selector)?.clone()
        }
        None => Profile::default(),
    };
    apply_overrides(base, args)
}

fn apply_overrides(mut p: Profile, args: &PackArgs) -> anyhow::Result<Job> {
    if !args.inputs.is_empty() {
        p.directories = args.inputs.clone();
    }
    if let Some(v) = &args.out_dir {
        p.output = v.clone();
    }
    if let Some(v) = &args.name {
        p.name = v.clone();
    }
    if let Some(v) = &args.filter {
        p.file_filter = v.clone();
    }
    if let Some(v) = args.recursive {
        p.include_subdirectories = v;
    }
    if let Some(v) = args.width {
        p.atlas_width = v;
    }
    if let Some(v) = args.height {
        p.atlas_height = v;
    }
    if let Some(v) = args.allow_rotation {
        p.allow_rotation = v;
    }
    if let Some(v) = &args.heuristic {
        p.heuristic = v.clone();
    }

    if p.directories.is_empty() {
        bail!("no input directories: pass them as arguments or set `directories` in the profile");
    }
    if p.name.trim().is_empty() {
        bail!("atlas name must not be empty");
    }

    let mut cfg = p.bin_config()?;
    cfg.max_pages = args.max_pages;
    cfg.time_budget_ms = args.time_budget_ms;
    cfg.validate()?;

    Ok(Job {
        directories: p.directories,
        out_dir: p.output,
        name: p.name,
        filter: p.file_filter,
        recursive: p.include_subdirectories,
        cfg,
    })
}

fn write_pages(
    atlas: &Atlas,
    images: &HashMap<String, RgbaImage>,
    job: &Job,
) -> anyhow::Result<()> {
    for page in &atlas.pages {
        let mut canvas = RgbaImage::new(page.width, page.height);
        for pl in &page.placements {
            let src = images
                .get(&pl.id)
                .with_context(|| format!("no pixels loaded for {}", pl.id))?;
            compositing::blit_placement(src, &mut canvas, pl);
        }
        let path = job.out_dir.join(format!("{}{}.png", job.name, page.id));
        canvas
            .save(&path)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), placements = page.placements.len(), "wrote page");
    }
    Ok(())
}

fn write_manifest(atlas: &Atlas, format: MetadataFormat, job: &Job) -> anyhow::Result<()> {
    let value = match format {
        MetadataFormat::List => to_json_list(atlas),
        MetadataFormat::Array => to_json_array(atlas),
        MetadataFormat::Hash => to_json_hash(atlas),
    };
    let path = job.out_dir.join(format!("{}.json", job.name));
    fs::write(&path, serde_json::to_string_pretty(&value)?)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote manifest");
    Ok(())
}

/// Deletes the manifest `<name>.json` of an earlier run and the pages it
/// recorded. Without a manifest nothing is removed, since `<name><page>.png`
/// alone cannot tell `Atlas1` page 0 from `Atlas` page 10.
fn clean_outputs(out_dir: &Path, name: &str) -> anyhow::Result<()> {
    let manifest = out_dir.join(format!("{name}.json"));
    if !manifest.is_file() {
        warn!(path = %manifest.display(), "no earlier manifest, nothing to clean");
        return Ok(());
    }
    let text = fs::read_to_string(&manifest)
        .with_context(|| format!("read {}", manifest.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse {}", manifest.display()))?;
    let pages = max_page_index(&value).map_or(0, |i| i + 1);
    for page in 0..pages {
        let path = out_dir.join(format!("{name}{page}.png"));
        if path.is_file() {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
            info!(path = %path.display(), "removed old page");
        }
    }
    fs::remove_file(&manifest).with_context(|| format!("remove {}", manifest.display()))?;
    Ok(())
}

/// Highest `pageIndex` anywhere in a manifest of any `--metadata` shape.
fn max_page_index(v: &serde_json::Value) -> Option<u64> {
    use serde_json::Value;
    match v {
        Value::Object(map) => {
            let own = map.get("pageIndex").and_then(Value::as_u64);
            map.values().filter_map(max_page_index).chain(own).max()
        }
        Value::Array(items) => items.iter().filter_map(max_page_index).max(),
        _ => None,
    }
}

fn run_profiles(args: &ProfilesArgs) -> anyhow::Result<()> {
    if args.init {
        if args.file.exists() && !args.force {
            bail!(
                "{} already exists (pass --force to overwrite)",
                args.file.display()
            );
        }
        profiles::save_profiles(&args.file, &[Profile::default()])?;
        info!(path = %args.file.display(), "wrote default profile");
        return Ok(());
    }

    let list = profiles::load_profiles(&args.file)?;
    if let Some(selector) = &args.show {
        let p = profiles::select(&list, selector)?;
        print!("{}", serde_yaml::to_string(p)?);
        return Ok(());
    }
    for (i, p) in list.iter().enumerate() {
        println!(
            "{i}\t{}\t{}x{}\t{}\t-> {}",
            p.id,
            p.atlas_width,
            p.atlas_height,
            p.heuristic,
            p.output.display()
        );
    }
    Ok(())
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
