// file: src/output/mod.rs
// description: output layout and run manifest exports
// reference: Internal module structure

pub mod manifest;
pub mod naming;

pub use manifest::{MANIFEST_FILE_NAME, ManifestEntry, PatchManifest};
pub use naming::{ensure_output_dir, output_dir_for, patch_file_name};
