// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image codec error for {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Patch size {size} exceeds image dimensions {width}x{height} of {path}")]
    PatchTooLarge {
        path: PathBuf,
        size: u32,
        width: u32,
        height: u32,
    },

    #[error("Found {images} images but {masks} masks")]
    CountMismatch { images: usize, masks: usize },

    #[error(
        "Mask {mask} is {mask_width}x{mask_height} but image {image} is {image_width}x{image_height}"
    )]
    DimensionMismatch {
        image: PathBuf,
        mask: PathBuf,
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Pairing error: {0}")]
    Pairing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
