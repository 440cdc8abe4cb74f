//! Core domain logic for Zettel note outlines.
//! This crate owns identifier allocation, filename decoding and listings.

pub mod listing;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use listing::arrange::{
    arrange, decompose, sort_records, ArrangeOptions, GroupBy, KeyedFile, Order, SortMode,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::filename::{
    classify_tags_and_description, compose_filename, dash_separated, decompose_filename,
    select_identifier,
};
pub use model::generator::next_identifier;
pub use model::identifier::{
    increment_segment, next_level_seed, parse_identifier, segment_at_depth, Identifier,
    IdentifierError, Segment,
};
pub use model::record::NoteRecord;
pub use repo::note_dir::{DirError, DirResult, FsNoteDirectory, NoteDirectory};
pub use service::note_service::{
    ListQuery, ListView, NoteService, NoteServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
