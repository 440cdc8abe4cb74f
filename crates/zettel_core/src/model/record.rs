//! Note record built for one listing pass.
//!
//! # Invariants
//! - Records are ephemeral; the filename is the durable representation.
//! - `identifier` always parses; malformed names never become records.

use crate::model::filename::{classify_tags_and_description, decompose_filename};
use crate::model::identifier::{parse_identifier, Identifier, IdentifierError};
use serde::{Deserialize, Serialize};

/// One decomposed note filename plus its listing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Sort key: date, priority code, header tags or the missing-key marker.
    pub key: String,
    /// Parsed identifier, serialized in its compact string form.
    pub identifier: Identifier,
    /// Space-joined uppercase tags.
    pub tags: String,
    /// Space-joined description words.
    pub description: String,
}

impl NoteRecord {
    /// Decomposes one `(key, filename)` pair.
    ///
    /// # Errors
    /// - Returns `Malformed` when the filename's identifier does not parse.
    pub fn from_keyed_name(
        key: impl Into<String>,
        filename: &str,
    ) -> Result<Self, IdentifierError> {
        let (identifier, text) = decompose_filename(filename);
        let identifier = parse_identifier(identifier)?;
        let (tags, description) = classify_tags_and_description(text);
        Ok(Self {
            key: key.into(),
            identifier,
            tags,
            description,
        })
    }
}
