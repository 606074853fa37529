//! Detect command implementation

use crate::cli::error::CliError;
use crate::convert::{SourceRoot, detect_convention};
use crate::models::{Convention, describe};
use std::path::PathBuf;

/// Arguments for the detect command
#[derive(Debug, Clone)]
pub struct DetectArgs {
    pub inputs: Vec<PathBuf>,
}

/// Handle the detect command
///
/// Prints the convention of every file under the inputs, then the convention a
/// conversion run would infer from them.
pub fn handle_detect(args: &DetectArgs) -> Result<Option<Convention>, CliError> {
    if args.inputs.is_empty() {
        return Err(CliError::InvalidArgument(
            "At least one file or directory is required".to_string(),
        ));
    }

    let mut resolved = None;
    for input in &args.inputs {
        let source = SourceRoot::from_path(input).map_err(|e| CliError::from_io(input, e))?;
        for file in source.discover_files() {
            let convention = detect_convention(&file);
            println!("{}: {}", file.display(), describe(convention));
            resolved = resolved.or(convention);
        }
    }

    println!("Resolved format: {}", describe(resolved));
    Ok(resolved)
}
