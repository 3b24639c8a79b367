// file: src/patch/mod.rs
// description: patch sampling, extraction and labeling exports
// reference: Internal module structure

pub mod extractor;
pub mod label;
pub mod sampler;

pub use extractor::{Patch, PatchExtractor};
pub use label::{DefectLabel, defect_fraction};
pub use sampler::{PatchOffset, PatchSampler};
