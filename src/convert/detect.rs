//! Convention detection
//!
//! Classifies a record file as old, new or undetermined, and resolves a
//! batch-wide convention from the first file that yields a verdict.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::models::Convention;

/// Classify an already parsed document
///
/// A document whose `definition` is missing or empty (`null`, `""`, `false`
/// or zero) is not a record. A string `definition` marks the old convention;
/// anything else is new.
pub fn classify(document: &Value) -> Option<Convention> {
    match document.get("definition") {
        None => None,
        Some(definition) if is_empty_definition(definition) => None,
        Some(Value::String(_)) => Some(Convention::Old),
        Some(_) => Some(Convention::New),
    }
}

fn is_empty_definition(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Detect the convention of a file on disk
///
/// Read and parse failures are reported as undetermined (`None`).
pub fn detect_convention(path: &Path) -> Option<Convention> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let document: Value = match serde_json::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            debug!("{} is not a JSON file: {}", path.display(), e);
            return None;
        }
    };

    let convention = classify(&document);
    match convention {
        Some(c) => debug!("Detected {} format for {}", c, path.display()),
        None => debug!("{} is not a recognized record", path.display()),
    }
    convention
}

/// Resolve a convention from candidate files
///
/// Returns the first verdict in order, or `None` when no file is a record.
pub fn resolve_convention<P: AsRef<Path>>(files: &[P]) -> Option<Convention> {
    files
        .iter()
        .find_map(|file| detect_convention(file.as_ref()))
}
