//! Command line interface for the record converter

pub mod commands;
pub mod error;
