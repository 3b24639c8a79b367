// file: src/dataset/mod.rs
// description: input discovery, decoding and image/mask pairing
// reference: Internal module structure

pub mod loader;
pub mod pairing;
pub mod scanner;

pub use loader::LoadedImage;
pub use pairing::{SourcePair, pair_sources};
pub use scanner::{ImageScanner, ScannedFile, format_file_list};
