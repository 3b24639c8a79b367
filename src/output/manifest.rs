// file: src/output/manifest.rs
// description: json manifest describing every patch written in a run

use crate::error::{PipelineError, Result};
use crate::patch::{DefectLabel, PatchOffset};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub source_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_mask: Option<String>,
    pub index: usize,
    pub offset: PatchOffset,
    pub image_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<DefectLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_fraction: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PatchManifest {
    pub created_at: String,
    pub seed: u64,
    pub patch_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_threshold: Option<f64>,
    pub total_patches: usize,
    pub patches: Vec<ManifestEntry>,
}

impl PatchManifest {
    pub fn new(seed: u64, patch_size: u32, defect_threshold: Option<f64>) -> Self {
        Self {
            created_at: Utc::now().to_rfc3339(),
            seed,
            patch_size,
            defect_threshold,
            total_patches: 0,
            patches: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.patches.push(entry);
        self.total_patches = self.patches.len();
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;

        info!(
            "Wrote manifest with {} patches to {}",
            self.total_patches,
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_written_as_json() {
        let dir = tempdir().unwrap();
        let mut manifest = PatchManifest::new(44, 10, Some(0.01));
        manifest.push(ManifestEntry {
            source_image: "a.png".to_string(),
            source_mask: Some("a.png".to_string()),
            index: 0,
            offset: PatchOffset { x: 3, y: 7 },
            image_file: "a_PATCH_0_KO.png".to_string(),
            mask_file: Some("a_PATCH_0_KO.png".to_string()),
            label: Some(DefectLabel::Ko),
            defect_fraction: Some(0.5),
        });

        let path = manifest.write_to(dir.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["seed"], 44);
        assert_eq!(value["total_patches"], 1);
        assert_eq!(value["patches"][0]["label"], "KO");
        assert_eq!(value["patches"][0]["offset"]["y"], 7);
    }

    #[test]
    fn test_unlabeled_entry_omits_mask_fields() {
        let entry = ManifestEntry {
            source_image: "b.png".to_string(),
            source_mask: None,
            index: 1,
            offset: PatchOffset { x: 0, y: 0 },
            image_file: "b_PATCH_1.png".to_string(),
            mask_file: None,
            label: None,
            defect_fraction: None,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("label").is_none());
        assert!(value.get("mask_file").is_none());
    }
}
