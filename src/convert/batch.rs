//! Batch conversion
//!
//! Runs the converter over every discovered source file. A failing file is
//! logged and recorded, and the batch moves on to the next one.

use std::path::PathBuf;

use tracing::{info, warn};

use super::converter::{ConversionError, ConversionJob, Converter};
use crate::config::{ConfigError, ResolvedConfig};
use crate::models::Convention;

/// A source file that was not converted
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: ConversionError,
}

/// Outcome of a batch run
#[derive(Debug)]
pub struct BatchReport {
    pub convention: Convention,
    pub target: PathBuf,
    /// Target paths written, in source order
    pub converted: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    /// Files skipped because their convention differed from the batch convention
    pub fn mismatched(&self) -> impl Iterator<Item = &SkippedFile> {
        self.skipped.iter().filter(|s| s.error.is_mismatch())
    }

    /// Files skipped for any other reason
    pub fn failed(&self) -> impl Iterator<Item = &SkippedFile> {
        self.skipped.iter().filter(|s| !s.error.is_mismatch())
    }
}

/// Convert every source file of a resolved configuration
///
/// Only failure to create the target root is fatal; per-file errors end up in
/// [`BatchReport::skipped`].
pub fn convert_all(config: &ResolvedConfig) -> Result<BatchReport, ConfigError> {
    std::fs::create_dir_all(&config.target)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", config.target.display(), e)))?;

    let converter = Converter::new(&config.source, &config.target).with_pretty(config.pretty);
    let mut report = BatchReport {
        convention: config.convention,
        target: config.target.clone(),
        converted: Vec::new(),
        skipped: Vec::new(),
    };

    for file in &config.source_files {
        match converter.convert(&ConversionJob::new(file, config.convention)) {
            Ok(target_file) => report.converted.push(target_file),
            Err(error) => {
                warn!("Failed to convert file {}: {}", file.display(), error);
                report.skipped.push(SkippedFile {
                    path: file.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "Finished converting {} format files to {}: {} converted, {} skipped",
        config.convention,
        config.target.display(),
        report.converted.len(),
        report.skipped.len()
    );
    Ok(report)
}
