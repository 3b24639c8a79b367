// file: src/dataset/loader.rs
// description: decodes scanned files into pixel grids
// reference: https://docs.rs/image

use crate::dataset::scanner::ScannedFile;
use crate::error::{PipelineError, Result};
use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// A decoded image (or mask) together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: ScannedFile,
    pub pixels: DynamicImage,
}

impl LoadedImage {
    pub fn load(source: &ScannedFile) -> Result<Self> {
        let pixels = image::open(&source.path).map_err(|e| PipelineError::Image {
            path: source.path.clone(),
            source: e,
        })?;

        debug!(
            "Loaded {} ({}x{}, {:?})",
            source.file_name,
            pixels.width(),
            pixels.height(),
            pixels.color()
        );

        Ok(Self {
            source: source.clone(),
            pixels,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}
