//! Record Format Converter - batch conversion of embedded JSON conventions
//!
//! Record files carry a `definition` and a list of `dataCollections` whose
//! `data` fields hold embedded documents, either as JSON-encoded strings (the
//! old convention) or as JSON values (the new convention). This crate
//! provides:
//! - Convention detection for single files and whole batches
//! - Per-file conversion to the opposite convention
//! - Target path mapping that mirrors the source tree
//! - A batch driver that isolates per-file failures
//! - TOML and environment based configuration

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod models;

pub use config::{ConfigError, ConvertConfig, ResolvedConfig};
pub use convert::{
    BatchReport, ConversionError, ConversionJob, Converter, SkippedFile, SourceRoot, convert_all,
    detect_convention, map_target_path, resolve_convention,
};
pub use models::{Convention, EmbeddedJson, Record, RecordError};
