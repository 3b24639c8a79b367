// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Seed shared by image and mask sampling so patches at the same index line up.
pub const DEFAULT_SEED: u64 = 44;

/// A mask patch is defective when strictly more than this fraction of it is foreground.
pub const DEFAULT_DEFECT_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub labeling: LabelingConfig,
    pub scanner: ScannerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub seed: u64,
    /// `None` extracts every possible patch.
    #[serde(default)]
    pub n_patches: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LabelingConfig {
    pub defect_threshold: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    pub image_extensions: Vec<String>,
    #[serde(default)]
    pub pairing: PairingMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub dir_suffix: String,
    #[serde(default)]
    pub write_manifest: bool,
}

/// How images are matched to masks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// i-th image with i-th mask of the sorted listings.
    #[default]
    Position,
    /// Image and mask share the same file stem.
    Stem,
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingMode::Position => write!(f, "position"),
            PairingMode::Stem => write!(f, "stem"),
        }
    }
}

impl FromStr for PairingMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "position" => Ok(PairingMode::Position),
            "stem" => Ok(PairingMode::Stem),
            other => Err(PipelineError::Config(format!(
                "unknown pairing mode '{}' (expected 'position' or 'stem')",
                other
            ))),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let mut builder = config::Config::builder()
            .set_default("extraction.seed", defaults.extraction.seed)
            .and_then(|b| {
                b.set_default(
                    "labeling.defect_threshold",
                    defaults.labeling.defect_threshold,
                )
            })
            .and_then(|b| {
                b.set_default(
                    "scanner.image_extensions",
                    defaults.scanner.image_extensions.clone(),
                )
            })
            .and_then(|b| b.set_default("output.dir_suffix", defaults.output.dir_suffix.clone()))
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PATCH_EXTRACTOR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            extraction: ExtractionConfig {
                seed: DEFAULT_SEED,
                n_patches: None,
            },
            labeling: LabelingConfig {
                defect_threshold: DEFAULT_DEFECT_THRESHOLD,
            },
            scanner: ScannerConfig {
                image_extensions: ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "gif", "webp"]
                    .iter()
                    .map(|ext| ext.to_string())
                    .collect(),
                pairing: PairingMode::Position,
            },
            output: OutputConfig {
                dir_suffix: "_patch".to_string(),
                write_manifest: false,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_threshold(self.labeling.defect_threshold)?;

        if let Some(count) = self.extraction.n_patches {
            Validator::validate_patch_count(count)?;
        }

        if self.output.dir_suffix.is_empty() {
            return Err(PipelineError::Config(
                "dir_suffix must not be empty".to_string(),
            ));
        }

        if self.scanner.image_extensions.is_empty() {
            return Err(PipelineError::Config(
                "image_extensions must list at least one extension".to_string(),
            ));
        }

        Ok(())
    }
}
