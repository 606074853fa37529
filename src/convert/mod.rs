//! Record convention converter module
//!
//! Detects the convention of record files, converts them to the opposite
//! convention and writes them into a mirrored target tree.

pub mod batch;
pub mod converter;
pub mod detect;
pub mod paths;

pub use batch::{BatchReport, SkippedFile, convert_all};
pub use converter::{ConversionError, ConversionJob, Converter};
pub use detect::{classify, detect_convention, resolve_convention};
pub use paths::{SourceRoot, map_target_path};
