// file: src/dataset/scanner.rs
// description: Flat directory listing of image and mask files with extension filtering
// reference: https://docs.rs/walkdir

use crate::config::ScannerConfig;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct ImageScanner {
    config: ScannerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub stem: String,
}

impl ImageScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Lists the image files directly inside `root`, sorted by file name.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                PipelineError::Validation(format!(
                    "Cannot list directory {}: {}",
                    root.display(),
                    e
                ))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();

            if file_name.starts_with('.') {
                debug!("Skipping hidden file: {}", path.display());
                continue;
            }

            if !self.has_image_extension(path) {
                debug!("Skipping non-image file: {}", path.display());
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.clone());

            files.push(ScannedFile {
                path: path.to_path_buf(),
                file_name,
                stem,
            });
        }

        info!("Found {} image files", files.len());
        Ok(files)
    }

    fn has_image_extension(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        self.config
            .image_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// File names as a bracketed, comma-separated list.
pub fn format_file_list(files: &[ScannedFile]) -> String {
    let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> ImageScanner {
        ImageScanner::new(Config::default_config().scanner)
    }

    #[test]
    fn test_scan_directory_sorted() {
        let temp = TempDir::new().unwrap();
        for name in ["c.png", "a.png", "b.JPG"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }

        let files = scanner().scan_directory(temp.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.JPG", "c.png"]);
        assert_eq!(files[1].stem, "b");
    }

    #[test]
    fn test_skips_hidden_non_image_and_nested() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden.png"), b"x").unwrap();
        fs::write(temp.path().join("notes.txt"), b"x").unwrap();
        fs::write(temp.path().join("keep.png"), b"x").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/inner.png"), b"x").unwrap();

        let files = scanner().scan_directory(temp.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "keep.png");
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let result = scanner().scan_directory(&temp.path().join("absent"));
        assert!(result.is_err());
    }

    #[test]
    fn test_stem_keeps_inner_dots() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("part.v2.png"), b"x").unwrap();

        let files = scanner().scan_directory(temp.path()).unwrap();
        assert_eq!(files[0].stem, "part.v2");
    }

    #[test]
    fn test_format_file_list() {
        let temp = TempDir::new().unwrap();
        for name in ["b.png", "a.png"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }

        let files = scanner().scan_directory(temp.path()).unwrap();
        assert_eq!(format_file_list(&files), "[a.png, b.png]");
        assert_eq!(format_file_list(&[]), "[]");
    }
}
