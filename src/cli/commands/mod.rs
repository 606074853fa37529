//! CLI command implementations

pub mod convert;
pub mod detect;
