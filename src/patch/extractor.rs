// file: src/patch/extractor.rs
// description: crops square patches out of decoded images at sampled offsets
// reference: https://docs.rs/image

use crate::dataset::LoadedImage;
use crate::error::{PipelineError, Result};
use crate::patch::sampler::{PatchOffset, PatchSampler};
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Patch {
    pub index: usize,
    pub offset: PatchOffset,
    pub pixels: DynamicImage,
}

pub struct PatchExtractor {
    sampler: PatchSampler,
    size: u32,
    max_patches: Option<usize>,
}

impl PatchExtractor {
    pub fn new(sampler: PatchSampler, size: u32, max_patches: Option<usize>) -> Self {
        Self {
            sampler,
            size,
            max_patches,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Fails unless a `size`x`size` window fits inside `width`x`height`.
    pub fn check_fits(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        if self.size == 0 {
            return Err(PipelineError::Validation(
                "Patch size must be greater than 0".to_string(),
            ));
        }

        if self.size > width || self.size > height {
            return Err(PipelineError::PatchTooLarge {
                path: path.to_path_buf(),
                size: self.size,
                width,
                height,
            });
        }
        Ok(())
    }

    pub fn extract(&self, source: &LoadedImage) -> Result<Vec<Patch>> {
        let (width, height) = source.dimensions();
        self.check_fits(&source.source.path, width, height)?;

        let offsets = self
            .sampler
            .offsets(width, height, self.size, self.max_patches);

        debug!(
            "Extracting {} patches of {}x{} from {}",
            offsets.len(),
            self.size,
            self.size,
            source.source.file_name
        );

        Ok(offsets
            .into_iter()
            .enumerate()
            .map(|(index, offset)| Patch {
                index,
                offset,
                pixels: source
                    .pixels
                    .crop_imm(offset.x, offset.y, self.size, self.size),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ScannedFile;
    use image::{GenericImageView, GrayImage, Luma, Rgb, RgbImage};
    use std::path::PathBuf;

    fn loaded(name: &str, pixels: DynamicImage) -> LoadedImage {
        LoadedImage {
            source: ScannedFile {
                path: PathBuf::from(name),
                file_name: name.to_string(),
                stem: name.split('.').next().unwrap().to_string(),
            },
            pixels,
        }
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma16(image::ImageBuffer::from_fn(width, height, |x, y| {
            Luma([(y * width + x) as u16])
        }))
    }

    #[test]
    fn test_extract_is_deterministic() {
        let extractor = PatchExtractor::new(PatchSampler::new(44), 6, Some(5));
        let source = loaded("g.png", gradient(40, 30));

        let first = extractor.extract(&source).unwrap();
        let second = extractor.extract(&source).unwrap();

        assert_eq!(first.len(), 5);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.offset, b.offset);
            assert_eq!(a.pixels.as_bytes(), b.pixels.as_bytes());
        }
    }

    #[test]
    fn test_patch_content_matches_offset() {
        let extractor = PatchExtractor::new(PatchSampler::new(9), 4, Some(3));
        let source = loaded("g.png", gradient(20, 20));

        for patch in extractor.extract(&source).unwrap() {
            assert_eq!(patch.pixels.dimensions(), (4, 4));
            let expected = patch.offset.y * 20 + patch.offset.x;
            let top_left = patch.pixels.as_luma16().unwrap().get_pixel(0, 0)[0];
            assert_eq!(u32::from(top_left), expected);
        }
    }

    #[test]
    fn test_image_and_mask_patches_align() {
        let extractor = PatchExtractor::new(PatchSampler::new(44), 5, Some(8));
        let image = loaded(
            "img.png",
            DynamicImage::ImageRgb8(RgbImage::from_fn(25, 25, |x, y| {
                Rgb([x as u8, y as u8, 0])
            })),
        );
        let mask = loaded(
            "img.png",
            DynamicImage::ImageLuma8(GrayImage::from_fn(25, 25, |x, y| {
                Luma([(x + y) as u8])
            })),
        );

        let image_patches = extractor.extract(&image).unwrap();
        let mask_patches = extractor.extract(&mask).unwrap();

        for (img, msk) in image_patches.iter().zip(&mask_patches) {
            assert_eq!(img.offset, msk.offset);
            let rgb = img.pixels.as_rgb8().unwrap().get_pixel(0, 0);
            let luma = msk.pixels.as_luma8().unwrap().get_pixel(0, 0);
            assert_eq!(u32::from(rgb[0]) + u32::from(rgb[1]), u32::from(luma[0]));
        }
    }

    #[test]
    fn test_patch_too_large() {
        let extractor = PatchExtractor::new(PatchSampler::new(44), 30, Some(1));
        let source = loaded("small.png", gradient(20, 40));

        let result = extractor.extract(&source);
        assert!(matches!(
            result,
            Err(PipelineError::PatchTooLarge { width: 20, height: 40, .. })
        ));
    }

    #[test]
    fn test_check_fits_without_decoding() {
        let extractor = PatchExtractor::new(PatchSampler::new(44), 16, Some(1));
        assert!(extractor.check_fits(Path::new("a.png"), 16, 16).is_ok());
        assert!(matches!(
            extractor.check_fits(Path::new("a.png"), 16, 15),
            Err(PipelineError::PatchTooLarge { height: 15, .. })
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let extractor = PatchExtractor::new(PatchSampler::new(44), 0, Some(1));
        let source = loaded("g.png", gradient(10, 10));
        assert!(extractor.extract(&source).is_err());
    }
}
