//! Note use-case service.
//!
//! # Responsibility
//! - Allocate identifiers and filenames for new notes.
//! - Rename a note to another identifier at the same depth.
//! - Produce the four outline views (identifier, last modified, priority,
//!   header tags).
//!
//! # Invariants
//! - Allocation only counts identifiers that lie below the parent.
//! - Renames never change nesting depth and never overwrite a file.
//! - Listings are best-effort: unreadable keys and malformed names are
//!   skipped, not fatal.

use crate::listing::arrange::{
    arrange, decompose, sort_records, ArrangeOptions, GroupBy, KeyedFile, Order, SortMode,
    MISSING_KEY,
};
use crate::model::filename::{
    compose_filename, select_identifier, select_text, DELIM, NOTE_SUFFIX,
};
use crate::model::generator::next_identifier;
use crate::model::identifier::{
    parse_identifier, Identifier, IdentifierError, ROOT_MARKER,
};
use crate::model::record::NoteRecord;
use crate::repo::note_dir::{DirError, NoteDirectory, PRIORITY_LEN};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Width of `%m-%d` date keys.
const DATE_KEY_LEN: usize = 5;

/// Result type used by note service operations.
pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Identifier could not be parsed or extended.
    Identifier(IdentifierError),
    /// Rename target is not acceptable for the source note.
    InvalidRename {
        source: String,
        target: String,
        reason: String,
    },
    /// Directory access failure.
    Dir(DirError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(err) => write!(f, "{err}"),
            Self::InvalidRename {
                source,
                target,
                reason,
            } => write!(f, "cannot rename `{source}` to `{target}`: {reason}"),
            Self::Dir(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Identifier(err) => Some(err),
            Self::InvalidRename { .. } => None,
            Self::Dir(err) => Some(err),
        }
    }
}

impl From<IdentifierError> for NoteServiceError {
    fn from(value: IdentifierError) -> Self {
        Self::Identifier(value)
    }
}

impl From<DirError> for NoteServiceError {
    fn from(value: DirError) -> Self {
        Self::Dir(value)
    }
}

/// Outline view: where keys come from and how the batch is arranged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Identifier order, grouped by top-level entry, keyed by date.
    ByIdentifier,
    /// Date order, grouped by date.
    ByLastModified,
    /// Priority marker order, grouped by priority.
    ByPriority,
    /// Header tag order; notes lacking any of the given tags are left out.
    ByHeaderTags(Vec<String>),
}

impl ListView {
    fn sort_mode(&self) -> SortMode {
        match self {
            Self::ByIdentifier => SortMode::ByIdentifier,
            Self::ByLastModified | Self::ByPriority | Self::ByHeaderTags(_) => SortMode::ByKey,
        }
    }

    fn arrange_options(&self, order: Order) -> ArrangeOptions {
        let (group_by, pad_by_depth, min_key_width) = match self {
            Self::ByIdentifier => (GroupBy::IdentifierRoot, true, DATE_KEY_LEN),
            Self::ByLastModified => (GroupBy::Key, true, DATE_KEY_LEN),
            Self::ByPriority => (GroupBy::Key, false, PRIORITY_LEN),
            Self::ByHeaderTags(_) => (GroupBy::Key, true, 0),
        };
        ArrangeOptions {
            group_by,
            pad_by_depth,
            min_key_width,
            order,
        }
    }
}

/// Listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Filename prefix; `None` lists every note.
    pub prefix: Option<String>,
    pub view: ListView,
    pub order: Order,
}

impl ListQuery {
    pub fn new(view: ListView) -> Self {
        Self {
            prefix: None,
            view,
            order: Order::Forward,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
}

/// Note service facade over a directory implementation.
pub struct NoteService<D: NoteDirectory> {
    dir: D,
}

impl<D: NoteDirectory> NoteService<D> {
    /// Creates a service using the provided directory implementation.
    pub fn new(dir: D) -> Self {
        Self { dir }
    }

    /// Computes the next child identifier under `parent`.
    ///
    /// `parent` may be `/`, a bare identifier, or a full note filename.
    pub fn next_identifier(&self, parent: &str) -> ServiceResult<Identifier> {
        let parent = Identifier::parse_parent(select_identifier(parent))?;
        let existing = self.namespace(&parent)?;
        let identifier = next_identifier(&parent, &existing)?;
        debug!(
            "event=next_identifier module=service status=ok parent={parent} existing={} identifier={identifier}",
            existing.len()
        );
        Ok(identifier)
    }

    /// Returns a filename for a new note under `parent`, titled by `words`.
    pub fn generate_filename<S: AsRef<str>>(
        &self,
        parent: &str,
        words: &[S],
    ) -> ServiceResult<String> {
        let identifier = self.next_identifier(parent)?;
        Ok(compose_filename(&identifier.to_string(), words))
    }

    /// Renames `filename` to carry `target` as identifier, keeping its text.
    ///
    /// Returns the new filename.
    ///
    /// # Errors
    /// - `InvalidRename` when `target` is `/`, sits at another depth than the
    ///   source identifier, or names an existing file.
    /// - `Identifier` when either identifier is malformed.
    pub fn rename_note(&self, filename: &str, target: &str) -> ServiceResult<String> {
        let invalid = |reason: String| NoteServiceError::InvalidRename {
            source: filename.to_string(),
            target: target.to_string(),
            reason,
        };

        if target == ROOT_MARKER {
            return Err(invalid("target is the root marker".to_string()));
        }
        let target_id = parse_identifier(target)?;
        let source_id = parse_identifier(select_identifier(filename))?;
        if target_id.depth() != source_id.depth() {
            return Err(invalid(format!(
                "target depth {} differs from source depth {}",
                target_id.depth(),
                source_id.depth()
            )));
        }

        let renamed = match select_text(filename) {
            "" => format!("{target_id}{NOTE_SUFFIX}"),
            text => format!("{target_id}{DELIM}{text}{NOTE_SUFFIX}"),
        };
        if renamed == filename {
            return Ok(renamed);
        }
        if self.dir.exists(&renamed) {
            return Err(invalid(format!("`{renamed}` already exists")));
        }

        self.dir.rename(filename, &renamed)?;
        info!("event=rename_note module=service status=ok from={filename} to={renamed}");
        Ok(renamed)
    }

    /// Returns the sorted records behind one outline view.
    pub fn list_records(&self, query: &ListQuery) -> ServiceResult<Vec<NoteRecord>> {
        let pattern = listing_pattern(query.prefix.as_deref());
        let names = self.dir.list_names(&pattern)?;
        let keyed: Vec<KeyedFile> = names
            .into_iter()
            .filter_map(|name| {
                self.key_for(&name, &query.view)
                    .map(|key| KeyedFile::new(key, name))
            })
            .collect();

        let mut records = decompose(&keyed);
        sort_records(&mut records, query.view.sort_mode());
        debug!(
            "event=list_records module=service status=ok pattern={pattern} records={}",
            records.len()
        );
        Ok(records)
    }

    /// Renders one outline view as aligned text.
    pub fn list_arranged(&self, query: &ListQuery) -> ServiceResult<String> {
        let records = self.list_records(query)?;
        Ok(arrange(&records, &query.view.arrange_options(query.order)))
    }

    /// Key for one name, or `None` when the name is filtered out.
    fn key_for(&self, name: &str, view: &ListView) -> Option<String> {
        match view {
            ListView::ByIdentifier | ListView::ByLastModified => {
                match self.dir.last_modified_key(name) {
                    Ok(key) => Some(key),
                    Err(err) => {
                        warn!("event=last_modified module=service status=skip name={name} error={err}");
                        Some(MISSING_KEY.to_string())
                    }
                }
            }
            ListView::ByPriority => Some(
                self.dir
                    .priority_key(name)
                    .unwrap_or_else(|| MISSING_KEY.to_string()),
            ),
            ListView::ByHeaderTags(required) => match self.dir.header_tags_key(name, required) {
                Some(key) => Some(key),
                None if required.is_empty() => Some(MISSING_KEY.to_string()),
                None => None,
            },
        }
    }

    /// Identifiers already allocated at or below `parent`.
    fn namespace(&self, parent: &Identifier) -> ServiceResult<Vec<Identifier>> {
        let names = self.dir.list_names(&namespace_pattern(parent))?;
        Ok(names
            .iter()
            .filter_map(|name| parse_identifier(select_identifier(name)).ok())
            .filter(|identifier| identifier.starts_with(parent))
            .collect())
    }
}

/// Glob for notes whose name starts with `prefix`.
fn listing_pattern(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{}*{NOTE_SUFFIX}", glob::Pattern::escape(prefix)),
        None => format!("*{NOTE_SUFFIX}"),
    }
}

/// Glob narrowing the directory to candidates below `parent`.
fn namespace_pattern(parent: &Identifier) -> String {
    if parent.is_root() {
        format!("[0-9]*{NOTE_SUFFIX}")
    } else {
        listing_pattern(Some(&parent.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{listing_pattern, namespace_pattern};
    use crate::model::identifier::{parse_identifier, Identifier};

    #[test]
    fn patterns_cover_prefix_and_root() {
        assert_eq!(listing_pattern(None), "*.md");
        assert_eq!(listing_pattern(Some("1a")), "1a*.md");
        assert_eq!(listing_pattern(Some("[x]")), "[[]x[]]*.md");
        assert_eq!(namespace_pattern(&Identifier::root()), "[0-9]*.md");
        assert_eq!(
            namespace_pattern(&parse_identifier("12b").unwrap()),
            "12b*.md"
        );
    }
}
