//! Per-file record converter
//!
//! Re-validates a file's convention against the batch expectation, flips its
//! embedded fields to the opposite convention and writes the result under the
//! target root.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use super::detect::classify;
use super::paths::{SourceRoot, map_target_path};
use crate::models::{Convention, Record, describe};

/// Error converting a single file. Never fatal to a batch.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error(
        "Real format \"{}\" does not match expected format \"{expected}\": {path}",
        describe(*.actual)
    )]
    Mismatch {
        path: PathBuf,
        expected: Convention,
        actual: Option<Convention>,
    },
    #[error("Malformed record {0}: {1}")]
    MalformedInput(PathBuf, String),
    #[error("IO error on {0}: {1}")]
    IoError(PathBuf, String),
    #[error("Cannot map {0} under source {1}")]
    PathMapping(PathBuf, PathBuf),
}

impl ConversionError {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ConversionError::Mismatch { .. })
    }
}

/// One file to convert and the convention it is expected to be in
#[derive(Debug, Clone)]
pub struct ConversionJob<'a> {
    pub source_file: &'a Path,
    pub expected: Convention,
}

impl<'a> ConversionJob<'a> {
    pub fn new(source_file: &'a Path, expected: Convention) -> Self {
        Self {
            source_file,
            expected,
        }
    }
}

/// Converts files from one source root into one target root
pub struct Converter<'a> {
    source: &'a SourceRoot,
    target: &'a Path,
    pretty: bool,
}

impl<'a> Converter<'a> {
    pub fn new(source: &'a SourceRoot, target: &'a Path) -> Self {
        Self {
            source,
            target,
            pretty: false,
        }
    }

    /// Write indented JSON instead of compact JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Convert one file and return the path it was written to
    ///
    /// Nothing is written unless the file's detected convention matches
    /// `job.expected` and every embedded field converts cleanly.
    pub fn convert(&self, job: &ConversionJob<'_>) -> Result<PathBuf, ConversionError> {
        let path = job.source_file;
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConversionError::IoError(path.to_path_buf(), e.to_string()))?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| ConversionError::MalformedInput(path.to_path_buf(), e.to_string()))?;

        let actual = classify(&document);
        if actual != Some(job.expected) {
            return Err(ConversionError::Mismatch {
                path: path.to_path_buf(),
                expected: job.expected,
                actual,
            });
        }

        let record: Record = serde_json::from_value(document)
            .map_err(|e| ConversionError::MalformedInput(path.to_path_buf(), e.to_string()))?;
        let converted = record
            .convert_from(job.expected)
            .map_err(|e| ConversionError::MalformedInput(path.to_path_buf(), e.to_string()))?;

        let target_file = map_target_path(self.source, path, self.target)?;
        if let Some(parent) = target_file.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConversionError::IoError(parent.to_path_buf(), e.to_string()))?;
        }

        let output = if self.pretty {
            serde_json::to_string_pretty(&converted)
        } else {
            serde_json::to_string(&converted)
        }
        .map_err(|e| ConversionError::MalformedInput(path.to_path_buf(), e.to_string()))?;

        std::fs::write(&target_file, output)
            .map_err(|e| ConversionError::IoError(target_file.clone(), e.to_string()))?;

        info!(
            "Converted {} with {} format to {}",
            path.display(),
            job.expected,
            target_file.display()
        );
        Ok(target_file)
    }
}
