//! Convert command implementation

use crate::cli::error::CliError;
use crate::config::ConvertConfig;
use crate::convert::{BatchReport, convert_all};
use std::path::{Path, PathBuf};

/// Arguments for the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub source: Option<PathBuf>,
    pub format: Option<String>,
    pub target: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Explicit config file. `record-convert.toml` in the working directory otherwise.
    pub config: Option<PathBuf>,
    pub pretty: bool,
}

/// Build the effective configuration: config file, then environment, then flags
pub fn load_config(args: &ConvertArgs, working_dir: &Path) -> Result<ConvertConfig, CliError> {
    let mut config = match &args.config {
        Some(path) if !path.exists() => return Err(CliError::FileNotFound(path.clone())),
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::load_default(working_dir)?,
    };
    config.apply_env_overrides();

    Ok(config.merge(ConvertConfig {
        source: args.source.clone(),
        format: args.format.clone(),
        target: args.target.clone(),
        output_dir: args.output_dir.clone(),
        pretty: args.pretty,
    }))
}

/// Handle the convert command
pub fn handle_convert(args: &ConvertArgs) -> Result<BatchReport, CliError> {
    let config = load_config(args, Path::new("."))?;
    let resolved = config.resolve()?;
    let report = convert_all(&resolved)?;

    println!(
        "Converted {} of {} {} format files to {}",
        report.converted.len(),
        resolved.source_files.len(),
        report.convention,
        report.target.display()
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.path.display(), skipped.error);
    }

    Ok(report)
}
