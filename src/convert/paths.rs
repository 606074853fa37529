//! Source discovery and target path mapping
//!
//! A source is either a single file, which maps to `target/<file name>`, or a
//! directory, whose files keep their relative path under the target.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::converter::ConversionError;

/// Root of the files to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRoot {
    File(PathBuf),
    Directory(PathBuf),
}

impl SourceRoot {
    /// Inspect `path` on disk. Symlinks are followed.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        if metadata.is_dir() {
            Ok(SourceRoot::Directory(path))
        } else {
            Ok(SourceRoot::File(path))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SourceRoot::File(path) | SourceRoot::Directory(path) => path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, SourceRoot::File(_))
    }

    /// List every regular file under the source, in file name order per directory
    pub fn discover_files(&self) -> Vec<PathBuf> {
        match self {
            SourceRoot::File(path) => vec![path.clone()],
            SourceRoot::Directory(root) => WalkDir::new(root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect(),
        }
    }
}

/// Compute where `source_file` is written under `target_root`
pub fn map_target_path(
    source: &SourceRoot,
    source_file: &Path,
    target_root: &Path,
) -> Result<PathBuf, ConversionError> {
    let relative = match source {
        SourceRoot::File(_) => source_file.file_name().map(Path::new),
        SourceRoot::Directory(root) => source_file
            .strip_prefix(root)
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty()),
    };

    relative
        .map(|relative| target_root.join(relative))
        .ok_or_else(|| {
            ConversionError::PathMapping(source_file.to_path_buf(), source.path().to_path_buf())
        })
}
