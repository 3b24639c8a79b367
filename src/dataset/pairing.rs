// file: src/dataset/pairing.rs
// description: matches image listings to mask listings
// reference: positional pairing with an opt-in file-stem mode

use crate::config::PairingMode;
use crate::dataset::scanner::ScannedFile;
use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SourcePair {
    pub image: ScannedFile,
    pub mask: ScannedFile,
}

pub fn pair_sources(
    images: &[ScannedFile],
    masks: &[ScannedFile],
    mode: PairingMode,
) -> Result<Vec<SourcePair>> {
    if images.len() != masks.len() {
        return Err(PipelineError::CountMismatch {
            images: images.len(),
            masks: masks.len(),
        });
    }

    match mode {
        PairingMode::Position => Ok(pair_by_position(images, masks)),
        PairingMode::Stem => pair_by_stem(images, masks),
    }
}

fn pair_by_position(images: &[ScannedFile], masks: &[ScannedFile]) -> Vec<SourcePair> {
    images
        .iter()
        .zip(masks)
        .map(|(image, mask)| {
            if image.stem != mask.stem {
                debug!(
                    "Pairing {} with {} by position",
                    image.file_name, mask.file_name
                );
            }
            SourcePair {
                image: image.clone(),
                mask: mask.clone(),
            }
        })
        .collect()
}

fn pair_by_stem(images: &[ScannedFile], masks: &[ScannedFile]) -> Result<Vec<SourcePair>> {
    let mut by_stem: HashMap<&str, &ScannedFile> = HashMap::with_capacity(masks.len());
    for mask in masks {
        if by_stem.insert(mask.stem.as_str(), mask).is_some() {
            return Err(PipelineError::Pairing(format!(
                "more than one mask with stem '{}'",
                mask.stem
            )));
        }
    }

    images
        .iter()
        .map(|image| -> Result<SourcePair> {
            let mask = by_stem.remove(image.stem.as_str()).ok_or_else(|| {
                warn!("No mask found for {}", image.file_name);
                PipelineError::Pairing(format!("no mask with stem '{}'", image.stem))
            })?;
            Ok(SourcePair {
                image: image.clone(),
                mask: mask.clone(),
            })
        })
        .collect()
}
