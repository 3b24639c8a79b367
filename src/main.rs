// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use patch_extractor::utils::logging::{self, format_error, format_info, format_summary};
use patch_extractor::{Config, PairingMode, PatchPipeline};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "patch_extractor")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(
    about = "Patch extractor. Extract patches from a set of images (and from their associated masks, optionally) and save them.",
    long_about = None
)]
struct Cli {
    /// Path to input images
    #[arg(short = 'i', long = "input_imgs_path", value_name = "DIR")]
    input_imgs_path: PathBuf,

    /// Path to image masks
    #[arg(short = 'm', long = "input_masks_path", value_name = "DIR")]
    input_masks_path: Option<PathBuf>,

    /// Number of patches to be extracted (all patches when omitted)
    #[arg(short = 'N', long = "n_patches", value_name = "NUM")]
    n_patches: Option<usize>,

    /// Patches size will be: (patch_size, patch_size)
    #[arg(short = 's', long = "patch_size", value_name = "PIXELS")]
    patch_size: u32,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    /// Seed for patch location sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Defect fraction above which a patch is labeled KO
    #[arg(long, value_name = "FRACTION")]
    threshold: Option<f64>,

    /// How images are matched to masks: position or stem
    #[arg(long, value_name = "MODE")]
    pairing: Option<PairingMode>,

    /// Write manifest.json next to the image patches
    #[arg(long, action = ArgAction::SetTrue)]
    manifest: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    if let Err(e) = run(cli) {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    println!(
        "{}",
        format_info(&format!(
            "seed {} | patch size {} | patches per image {}",
            config.extraction.seed,
            cli.patch_size,
            config
                .extraction
                .n_patches
                .map_or_else(|| "all".to_string(), |n| n.to_string())
        ))
    );

    let pipeline = PatchPipeline::new(config, cli.patch_size)
        .context("Invalid extraction settings")?
        .with_progress(cli.color);

    let report = pipeline
        .run(&cli.input_imgs_path, cli.input_masks_path.as_deref())
        .context("Patch extraction failed")?;

    println!("{}", format_summary(&report.stats));
    println!("Image patches: {}", report.image_output_dir.display());
    if let Some(dir) = &report.mask_output_dir {
        println!("Mask patches:  {}", dir.display());
    }
    if let Some(path) = &report.manifest_path {
        println!("Manifest:      {}", path.display());
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    info!("Loading configuration from: {}", cli.config.display());

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    if let Some(n) = cli.n_patches {
        config.extraction.n_patches = Some(n);
    }
    if let Some(seed) = cli.seed {
        config.extraction.seed = seed;
    }
    if let Some(threshold) = cli.threshold {
        config.labeling.defect_threshold = threshold;
    }
    if let Some(pairing) = cli.pairing {
        config.scanner.pairing = pairing;
    }
    if cli.manifest {
        config.output.write_manifest = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
