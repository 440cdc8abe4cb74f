//! Note domain model.
//!
//! # Responsibility
//! - Define the identifier algebra and its allocation rule.
//! - Encode and decode note filenames.
//!
//! # Invariants
//! - Every note is addressed by its identifier; the filename is the record.
//! - Model code is pure and never touches the filesystem.

pub mod filename;
pub mod generator;
pub mod identifier;
pub mod record;
