//! Models module
//!
//! Defines the record shape shared by both conventions and the convention enum.

pub mod enums;
pub mod record;

pub use enums::{Convention, describe};
pub use record::{EmbeddedJson, Record, RecordError};
