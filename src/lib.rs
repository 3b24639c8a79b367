// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod patch;
pub mod pipeline;
pub mod utils;

pub use config::{
    Config, ExtractionConfig, LabelingConfig, OutputConfig, PairingMode, ScannerConfig,
};
pub use dataset::{ImageScanner, LoadedImage, ScannedFile, SourcePair};
pub use error::{PipelineError, Result};
pub use output::{ManifestEntry, PatchManifest};
pub use patch::{DefectLabel, Patch, PatchExtractor, PatchOffset, PatchSampler};
pub use pipeline::{PatchPipeline, PipelineStats, ProgressTracker, RunReport};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _sampler = PatchSampler::new(config.extraction.seed);
        assert!(PatchPipeline::new(config, 16).is_ok());
    }
}
