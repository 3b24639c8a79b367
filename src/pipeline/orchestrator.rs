// file: src/pipeline/orchestrator.rs
// description: coordinates directory scanning, patch extraction, labeling and writing
// reference: one sequential pass over every image (and its mask)

use crate::config::Config;
use crate::dataset::{
    ImageScanner, LoadedImage, ScannedFile, SourcePair, format_file_list, pair_sources,
};
use crate::error::{PipelineError, Result};
use crate::output::{
    ManifestEntry, PatchManifest, ensure_output_dir, output_dir_for, patch_file_name,
};
use crate::patch::{DefectLabel, Patch, PatchExtractor, PatchSampler, defect_fraction};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::utils::Validator;
use image::{DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: PipelineStats,
    pub image_output_dir: PathBuf,
    pub mask_output_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
}

pub struct PatchPipeline {
    config: Config,
    scanner: ImageScanner,
    extractor: PatchExtractor,
    progress: ProgressMode,
}

#[derive(Debug, Clone, Copy)]
enum ProgressMode {
    Hidden,
    Visible { colored: bool },
}

enum WorkItem {
    Image(ScannedFile),
    Pair(SourcePair),
}

struct OutputDirs {
    images: PathBuf,
    masks: Option<PathBuf>,
}

impl PatchPipeline {
    pub fn new(config: Config, patch_size: u32) -> Result<Self> {
        config.validate()?;
        Validator::validate_patch_size(patch_size)?;

        let sampler = PatchSampler::new(config.extraction.seed);
        let extractor = PatchExtractor::new(sampler, patch_size, config.extraction.n_patches);
        let scanner = ImageScanner::new(config.scanner.clone());

        Ok(Self {
            config,
            scanner,
            extractor,
            progress: ProgressMode::Hidden,
        })
    }

    pub fn with_progress(mut self, colored: bool) -> Self {
        self.progress = ProgressMode::Visible { colored };
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, images_dir: &Path, masks_dir: Option<&Path>) -> Result<RunReport> {
        info!(
            "Starting patch extraction (size {}, seed {})",
            self.extractor.size(),
            self.config.extraction.seed
        );

        let images = self.scanner.scan_directory(images_dir)?;
        println!(
            "Detected {} images from folder --> {}",
            images.len(),
            display_absolute(images_dir)
        );
        debug!("Images: {}", format_file_list(&images));

        let work = match masks_dir {
            None => {
                println!("No mask path has been specified...");
                images.into_iter().map(WorkItem::Image).collect::<Vec<_>>()
            }
            Some(masks_dir) => {
                Validator::validate_distinct_dirs(images_dir, masks_dir)?;
                let masks = self.scanner.scan_directory(masks_dir)?;
                println!(
                    "Detected {} masks from folder --> {}",
                    masks.len(),
                    display_absolute(masks_dir)
                );
                debug!("Masks: {}", format_file_list(&masks));
                pair_sources(&images, &masks, self.config.scanner.pairing)?
                    .into_iter()
                    .map(WorkItem::Pair)
                    .collect()
            }
        };

        if work.is_empty() {
            warn!("No images found in {}", images_dir.display());
        }

        self.preflight(&work)?;

        let dirs = OutputDirs {
            images: output_dir_for(images_dir, &self.config.output.dir_suffix)?,
            masks: masks_dir
                .map(|dir| output_dir_for(dir, &self.config.output.dir_suffix))
                .transpose()?,
        };
        ensure_output_dir(&dirs.images)?;
        if let Some(dir) = &dirs.masks {
            ensure_output_dir(dir)?;
        }

        let mut manifest = self.config.output.write_manifest.then(|| {
            PatchManifest::new(
                self.config.extraction.seed,
                self.extractor.size(),
                masks_dir.map(|_| self.config.labeling.defect_threshold),
            )
        });

        let tracker = match self.progress {
            ProgressMode::Hidden => ProgressTracker::hidden(work.len()),
            ProgressMode::Visible { colored } => ProgressTracker::with_color(work.len(), colored),
        };

        for item in &work {
            match item {
                WorkItem::Image(image) => {
                    tracker.set_message(image.file_name.clone());
                    self.process_image(image, &dirs, &tracker, manifest.as_mut())?;
                }
                WorkItem::Pair(pair) => {
                    tracker.set_message(pair.image.file_name.clone());
                    self.process_pair(pair, &dirs, &tracker, manifest.as_mut())?;
                }
            }
            tracker.inc_images_processed();
        }

        tracker.finish();

        let manifest_path = manifest
            .map(|manifest| manifest.write_to(&dirs.images))
            .transpose()?;

        let stats = tracker.get_stats();
        info!(
            "Wrote {} patches from {} images in {:.2}s",
            stats.patches_written,
            stats.images_processed,
            stats.duration.as_secs_f64()
        );

        Ok(RunReport {
            stats,
            image_output_dir: dirs.images,
            mask_output_dir: dirs.masks,
            manifest_path,
        })
    }

    /// Reads only the headers of every source; nothing is written unless all
    /// pairs match and every source fits a patch.
    fn preflight(&self, work: &[WorkItem]) -> Result<()> {
        for item in work {
            match item {
                WorkItem::Image(image) => {
                    let (width, height) = read_dimensions(&image.path)?;
                    self.extractor.check_fits(&image.path, width, height)?;
                }
                WorkItem::Pair(pair) => {
                    let (image_width, image_height) = read_dimensions(&pair.image.path)?;
                    let (mask_width, mask_height) = read_dimensions(&pair.mask.path)?;

                    if (image_width, image_height) != (mask_width, mask_height) {
                        return Err(PipelineError::DimensionMismatch {
                            image: pair.image.path.clone(),
                            mask: pair.mask.path.clone(),
                            image_width,
                            image_height,
                            mask_width,
                            mask_height,
                        });
                    }
                    self.extractor
                        .check_fits(&pair.image.path, image_width, image_height)?;
                }
            }
        }

        debug!("Preflight passed for {} sources", work.len());
        Ok(())
    }

    fn process_image(
        &self,
        image: &ScannedFile,
        dirs: &OutputDirs,
        tracker: &ProgressTracker,
        mut manifest: Option<&mut PatchManifest>,
    ) -> Result<()> {
        let loaded = LoadedImage::load(image)?;
        let patches = self.extractor.extract(&loaded)?;

        for patch in &patches {
            let file_name = patch_file_name(&image.stem, patch.index, None);
            write_patch(patch, &dirs.images.join(&file_name))?;
            tracker.add_patch(None);

            if let Some(manifest) = manifest.as_deref_mut() {
                manifest.push(ManifestEntry {
                    source_image: image.file_name.clone(),
                    source_mask: None,
                    index: patch.index,
                    offset: patch.offset,
                    image_file: file_name,
                    mask_file: None,
                    label: None,
                    defect_fraction: None,
                });
            }
        }

        debug!("{}: {} patches written", image.file_name, patches.len());
        Ok(())
    }

    fn process_pair(
        &self,
        pair: &SourcePair,
        dirs: &OutputDirs,
        tracker: &ProgressTracker,
        mut manifest: Option<&mut PatchManifest>,
    ) -> Result<()> {
        let mask_dir = dirs.masks.as_ref().ok_or_else(|| {
            PipelineError::Validation("Mask output directory was not created".to_string())
        })?;

        let image = LoadedImage::load(&pair.image)?;
        let mask = LoadedImage::load(&pair.mask)?;

        let image_patches = self.extractor.extract(&image)?;
        let mask_patches = self.extractor.extract(&mask)?;
        let threshold = self.config.labeling.defect_threshold;

        for (image_patch, mask_patch) in image_patches.iter().zip(&mask_patches) {
            debug_assert_eq!(image_patch.offset, mask_patch.offset);

            let fraction = defect_fraction(&mask_patch.pixels);
            let label = DefectLabel::classify(fraction, threshold);

            let image_file = patch_file_name(&pair.image.stem, image_patch.index, Some(label));
            let mask_file = patch_file_name(&pair.mask.stem, mask_patch.index, Some(label));

            write_patch(image_patch, &dirs.images.join(&image_file))?;
            write_patch(mask_patch, &mask_dir.join(&mask_file))?;
            tracker.add_patch(Some(label));

            if let Some(manifest) = manifest.as_deref_mut() {
                manifest.push(ManifestEntry {
                    source_image: pair.image.file_name.clone(),
                    source_mask: Some(pair.mask.file_name.clone()),
                    index: image_patch.index,
                    offset: image_patch.offset,
                    image_file,
                    mask_file: Some(mask_file),
                    label: Some(label),
                    defect_fraction: Some(fraction),
                });
            }
        }

        debug!(
            "{} / {}: {} labeled patch pairs written",
            pair.image.file_name,
            pair.mask.file_name,
            image_patches.len()
        );
        Ok(())
    }
}

fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|source| PipelineError::Image {
        path: path.to_path_buf(),
        source,
    })
}

fn write_patch(patch: &Patch, path: &Path) -> Result<()> {
    // the PNG encoder has no float pixel formats
    let pixels: Cow<'_, DynamicImage> = match &patch.pixels {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(patch.pixels.to_rgba16()))
        }
        other => Cow::Borrowed(other),
    };

    pixels
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| PipelineError::Image {
            path: path.to_path_buf(),
            source,
        })
}

fn display_absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
