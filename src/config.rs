//! Conversion configuration
//!
//! Handles parsing of `record-convert.toml` configuration files, environment
//! variable overrides, and resolution of the raw settings into a fully
//! populated [`ResolvedConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::convert::detect::resolve_convention;
use crate::convert::paths::SourceRoot;
use crate::models::Convention;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = "record-convert.toml";

/// Parent directory of auto-numbered targets
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Prefix of auto-numbered target directories (`converted_1`, `converted_2`, ...)
pub const DEFAULT_TARGET_PREFIX: &str = "converted_";

/// Environment variable for the source file or directory
pub const ENV_SOURCE: &str = "RECORD_CONVERT_SOURCE";

/// Environment variable for the source format (`old` or `new`)
pub const ENV_FORMAT: &str = "RECORD_CONVERT_FORMAT";

/// Environment variable for the target directory
pub const ENV_TARGET: &str = "RECORD_CONVERT_TARGET";

/// Environment variable for the parent of auto-numbered targets
pub const ENV_OUTPUT_DIR: &str = "RECORD_CONVERT_OUTPUT_DIR";

/// Environment variable enabling pretty-printed output
pub const ENV_PRETTY: &str = "RECORD_CONVERT_PRETTY";

/// Fatal configuration error. Aborts the run before any file is converted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No source specified")]
    MissingSource,
    #[error("Source {0} does not exist")]
    SourceNotFound(PathBuf),
    #[error("No source file found for configured source {0}")]
    NoSourceFiles(PathBuf),
    #[error("Failed to detect format from source files")]
    UndetectableFormat,
    #[error("Target {0} exists and is not a directory")]
    TargetNotDirectory(PathBuf),
    #[error("Config file error: {0}")]
    ConfigFile(String),
    #[error("IO error: {0}")]
    IoError(String),
}

/// Raw conversion settings, as read from a config file, the environment or the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// File or directory to convert
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Source format, `old` or `new`. Detected from the files when absent or invalid.
    #[serde(default)]
    pub format: Option<String>,

    /// Target directory. Must be absent or empty to be used as-is.
    #[serde(default)]
    pub target: Option<PathBuf>,

    /// Parent of auto-numbered target directories
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Pretty-print converted files
    #[serde(default)]
    pub pretty: bool,
}

/// Fully resolved, immutable settings for one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub source: SourceRoot,
    pub source_files: Vec<PathBuf>,
    pub target: PathBuf,
    pub convention: Convention,
    pub pretty: bool,
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ConfigFile(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load `record-convert.toml` from `dir`, falling back to defaults if not found
    pub fn load_default(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ConfigFile(format!("Failed to parse config: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(ENV_SOURCE) {
            self.source = Some(PathBuf::from(source));
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = Some(format);
        }
        if let Some(target) = lookup(ENV_TARGET) {
            self.target = Some(PathBuf::from(target));
        }
        if let Some(output_dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = Some(PathBuf::from(output_dir));
        }
        if let Some(pretty) = lookup(ENV_PRETTY)
            && let Ok(pretty) = pretty.parse::<bool>()
        {
            self.pretty = pretty;
        }
    }

    /// Layer `overrides` on top of this configuration
    pub fn merge(self, overrides: ConvertConfig) -> Self {
        Self {
            source: overrides.source.or(self.source),
            format: overrides.format.or(self.format),
            target: overrides.target.or(self.target),
            output_dir: overrides.output_dir.or(self.output_dir),
            pretty: self.pretty || overrides.pretty,
        }
    }

    /// Validate the settings and fill in every default
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        debug!("Resolving config {:?}", self);

        let source_path = self.source.ok_or(ConfigError::MissingSource)?;
        if !source_path.exists() {
            return Err(ConfigError::SourceNotFound(source_path));
        }
        let source = SourceRoot::from_path(&source_path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", source_path.display(), e)))?;

        let source_files = source.discover_files();
        if source_files.is_empty() {
            return Err(ConfigError::NoSourceFiles(source_path));
        }
        info!(
            "Detected {} source files to convert under {}",
            source_files.len(),
            source_path.display()
        );

        let convention = resolve_format(self.format.as_deref(), &source_files)?;

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let target = resolve_target(self.target.as_deref(), &output_dir)?;

        Ok(ResolvedConfig {
            source,
            source_files,
            target,
            convention,
            pretty: self.pretty,
        })
    }
}

/// Use the configured format when valid, otherwise detect it from the files
fn resolve_format(format: Option<&str>, files: &[PathBuf]) -> Result<Convention, ConfigError> {
    match format {
        None => warn!("No format specified"),
        Some(format) => match format.parse::<Convention>() {
            Ok(convention) => return Ok(convention),
            Err(e) => warn!("Specified format is invalid: {}", e),
        },
    }

    info!("Detecting format from source files");
    let convention = resolve_convention(files).ok_or(ConfigError::UndetectableFormat)?;
    info!("Using detected format \"{}\"", convention);
    Ok(convention)
}

/// Use the configured target when it is absent or empty, otherwise pick a fresh default
fn resolve_target(target: Option<&Path>, output_dir: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(target) = target {
        if !target.exists() {
            return Ok(target.to_path_buf());
        }
        if !target.is_dir() {
            return Err(ConfigError::TargetNotDirectory(target.to_path_buf()));
        }

        let mut entries = std::fs::read_dir(target)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", target.display(), e)))?;
        if entries.next().is_none() {
            return Ok(target.to_path_buf());
        }
        warn!("Specified target folder {} is not empty", target.display());
    } else {
        warn!("No target specified");
    }

    let target = next_default_target(output_dir);
    info!("Using target {} instead", target.display());
    Ok(target)
}

/// First `converted_<N>` under `output_dir` that does not exist yet, counting from 1
pub fn next_default_target(output_dir: &Path) -> PathBuf {
    let mut index: u64 = 1;
    loop {
        let candidate = output_dir.join(format!("{}{}", DEFAULT_TARGET_PREFIX, index));
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Record converter configuration

# File or directory to convert
source = "records"

# Source format: "old" (embedded JSON strings) or "new" (inline JSON values).
# Detected from the source files when omitted.
# format = "old"

# Target directory. When omitted or not empty, output/converted_<N> is used.
# target = "converted"

# Parent directory for auto-numbered targets
output_dir = "output"

# Pretty-print converted files
pretty = false
"#
}
