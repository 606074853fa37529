//! Enums for record conventions
//!
//! A record embeds sub-documents in one of two conventions. Files that match
//! neither are "undetermined", which is modelled as `Option<Convention>::None`
//! rather than a third variant.

use serde::{Deserialize, Serialize};

/// Serialization convention of the embedded sub-documents of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// `definition` and every collection `data` hold JSON-encoded strings
    Old,
    /// `definition` and every collection `data` hold JSON values directly
    New,
}

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::Old => "old",
            Convention::New => "new",
        }
    }

    /// The convention a record ends up in after conversion
    pub fn opposite(&self) -> Self {
        match self {
            Convention::Old => Convention::New,
            Convention::New => Convention::Old,
        }
    }
}

/// Display helper for detection results
pub fn describe(convention: Option<Convention>) -> &'static str {
    convention.map_or("undetermined", |c| c.as_str())
}

impl std::str::FromStr for Convention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "old" => Ok(Convention::Old),
            "new" => Ok(Convention::New),
            _ => Err(format!("Unknown format: {}. Use 'old' or 'new'.", s)),
        }
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
