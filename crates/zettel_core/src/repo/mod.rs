//! Directory access layer.
//!
//! # Responsibility
//! - Define the contract through which core logic sees the notes directory.
//! - Isolate globbing, timestamps and file reads from listing/allocation.
//!
//! # Invariants
//! - Callers receive snapshots (name lists, keys); no handle is retained.

pub mod note_dir;
