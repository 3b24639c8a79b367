// file: src/output/naming.rs
// description: output directory and patch file naming

use crate::error::{PipelineError, Result};
use crate::patch::DefectLabel;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<parent>/<dirname><suffix>` for an input directory, resolved against the
/// current directory so `.` and `..` name a real sibling.
pub fn output_dir_for(input_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let resolve_error = |source: std::io::Error| PipelineError::FileOperation {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut resolved = std::path::absolute(input_dir).map_err(resolve_error)?;
    if resolved.file_name().is_none() && resolved.parent().is_some() {
        // a trailing `..` has no name until it is resolved on disk
        resolved = fs::canonicalize(&resolved).map_err(resolve_error)?;
    }

    let (Some(name), Some(parent)) = (resolved.file_name(), resolved.parent()) else {
        return Err(PipelineError::Validation(format!(
            "Cannot derive an output directory from {}",
            input_dir.display()
        )));
    };

    let mut dir_name = name.to_os_string();
    dir_name.push(suffix);
    Ok(parent.join(dir_name))
}

/// Creates the directory if needed; an existing one is reused.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        debug!("Reusing output directory {}", dir.display());
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|source| PipelineError::FileOperation {
        path: dir.to_path_buf(),
        source,
    })
}

/// `<stem>_PATCH_<index>.png`, or `<stem>_PATCH_<index>_<OK|KO>.png` when labeled.
pub fn patch_file_name(stem: &str, index: usize, label: Option<DefectLabel>) -> String {
    match label {
        Some(label) => format!("{}_PATCH_{}_{}.png", stem, index, label),
        None => format!("{}_PATCH_{}.png", stem, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_is_sibling() {
        let dir = output_dir_for(Path::new("/data/train/imgs"), "_patch").unwrap();
        assert_eq!(dir, PathBuf::from("/data/train/imgs_patch"));
    }

    #[test]
    fn test_output_dir_trailing_slash() {
        let dir = output_dir_for(Path::new("data/masks/"), "_patch").unwrap();
        assert_eq!(dir, std::path::absolute("data/masks_patch").unwrap());
    }

    #[test]
    fn test_output_dir_relative_single_component() {
        let dir = output_dir_for(Path::new("imgs"), "_patch").unwrap();
        assert_eq!(dir, std::path::absolute("imgs_patch").unwrap());
    }

    #[test]
    fn test_output_dir_current_directory() {
        let cwd = std::env::current_dir().unwrap();
        let mut expected = cwd.file_name().unwrap().to_os_string();
        expected.push("_patch");

        let dir = output_dir_for(Path::new("."), "_patch").unwrap();
        assert_eq!(dir, cwd.parent().unwrap().join(expected));
    }

    #[test]
    fn test_output_dir_parent_reference() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("scans").join("nested");
        fs::create_dir_all(&inner).unwrap();

        let dir = output_dir_for(&inner.join(".."), "_patch").unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        assert_eq!(dir, root.join("scans_patch"));
    }

    #[test]
    fn test_output_dir_root_is_error() {
        assert!(output_dir_for(Path::new("/"), "_patch").is_err());
    }

    #[test]
    fn test_ensure_output_dir_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out_patch");

        ensure_output_dir(&dir).unwrap();
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_patch_file_names() {
        assert_eq!(patch_file_name("scan_01", 3, None), "scan_01_PATCH_3.png");
        assert_eq!(
            patch_file_name("scan_01", 0, Some(DefectLabel::Ko)),
            "scan_01_PATCH_0_KO.png"
        );
        assert_eq!(
            patch_file_name("scan_01", 12, Some(DefectLabel::Ok)),
            "scan_01_PATCH_12_OK.png"
        );
    }
}
