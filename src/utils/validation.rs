// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_patch_size(size: u32) -> Result<()> {
        if size == 0 {
            return Err(PipelineError::Validation(
                "Patch size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_patch_count(count: usize) -> Result<()> {
        if count == 0 {
            return Err(PipelineError::Validation(
                "Number of patches must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_threshold(threshold: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PipelineError::Validation(format!(
                "Defect threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// Input and mask directories must differ, or their outputs would collide.
    pub fn validate_distinct_dirs(images: &Path, masks: &Path) -> Result<()> {
        let same = match (images.canonicalize(), masks.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => images == masks,
        };

        if same {
            return Err(PipelineError::Validation(format!(
                "Image and mask directories must differ: {}",
                images.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_validate_patch_size_and_count() {
        assert!(Validator::validate_patch_size(16).is_ok());
        assert!(Validator::validate_patch_size(0).is_err());
        assert!(Validator::validate_patch_count(1).is_ok());
        assert!(Validator::validate_patch_count(0).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(Validator::validate_threshold(0.0).is_ok());
        assert!(Validator::validate_threshold(0.01).is_ok());
        assert!(Validator::validate_threshold(1.0).is_ok());
        assert!(Validator::validate_threshold(-0.1).is_err());
        assert!(Validator::validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_distinct_dirs() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();

        assert!(Validator::validate_distinct_dirs(&a, &b).is_ok());
        assert!(Validator::validate_distinct_dirs(&a, &temp.path().join("b/../a")).is_err());
    }
}
