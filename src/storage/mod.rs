//! Storage helpers for snapkeep
//!
//! Atomic writes for the settings file and staged writes for archives.

pub mod file_io;

pub use file_io::{read_json, write_json_atomic, StagedFile};
