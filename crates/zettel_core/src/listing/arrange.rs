//! Sorting, grouping and column-aligned rendering of note listings.
//!
//! # Responsibility
//! - Turn `(key, filename)` pairs into sorted note records.
//! - Render a batch as an outline with batch-wide column widths.
//!
//! # Invariants
//! - Column widths are computed over the whole batch, never per group.
//! - A blank line is emitted only between two records, never first.
//! - Reverse order flips the rendered lines; grouping is not recomputed.

use crate::model::record::NoteRecord;
use log::warn;
use std::cmp::Ordering;

/// Filler for a key column that repeats the previous key.
pub const KEY_FILLER: char = '\u{a0}';
/// Key used when no key could be extracted for a file.
pub const MISSING_KEY: &str = "\u{a0}";
/// Marker printed between the indentation and the identifier.
const IDENTIFIER_MARK: char = '`';

/// Raw listing input as produced by the directory adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedFile {
    pub key: String,
    pub filename: String,
}

impl KeyedFile {
    pub fn new(key: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            filename: filename.into(),
        }
    }
}

/// Primary rank used when sorting records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Rank by identifier, ties broken by key.
    ByIdentifier,
    /// Rank by key, ties broken by identifier.
    ByKey,
}

/// Which change between neighbouring records starts a new visual group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    None,
    Key,
    /// First identifier segment.
    IdentifierRoot,
}

/// Line order of the final rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Forward,
    Reverse,
}

/// Formatting switches for [`arrange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrangeOptions {
    pub group_by: GroupBy,
    /// Indent identifiers and descriptions by nesting depth.
    pub pad_by_depth: bool,
    /// Lower bound for the key column width.
    pub min_key_width: usize,
    pub order: Order,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self {
            group_by: GroupBy::None,
            pad_by_depth: true,
            min_key_width: 0,
            order: Order::Forward,
        }
    }
}

/// Decomposes pairs into records, skipping names without a valid identifier.
pub fn decompose(files: &[KeyedFile]) -> Vec<NoteRecord> {
    files
        .iter()
        .filter_map(
            |file| match NoteRecord::from_keyed_name(file.key.as_str(), &file.filename) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        "event=decompose module=listing status=skip filename={} error={err}",
                        file.filename
                    );
                    None
                }
            },
        )
        .collect()
}

/// Sorts records in place; the sort is stable.
pub fn sort_records(records: &mut [NoteRecord], mode: SortMode) {
    records.sort_by(|left, right| rank(left, right, mode));
}

fn rank(left: &NoteRecord, right: &NoteRecord, mode: SortMode) -> Ordering {
    let by_key = left.key.cmp(&right.key);
    let by_identifier = left.identifier.cmp(&right.identifier);
    match mode {
        SortMode::ByKey => by_key.then(by_identifier),
        SortMode::ByIdentifier => by_identifier.then(by_key),
    }
}

/// Renders sorted records as aligned outline text.
pub fn arrange(records: &[NoteRecord], options: &ArrangeOptions) -> String {
    let widths = ColumnWidths::measure(records, options.min_key_width);
    let mut lines: Vec<String> = Vec::with_capacity(records.len());
    let mut previous: Option<&NoteRecord> = None;

    for record in records {
        if let Some(previous) = previous {
            if starts_group(previous, record, options.group_by) {
                lines.push(String::new());
            }
        }
        let repeats_key = previous.is_some_and(|previous| previous.key == record.key);
        lines.push(render_line(record, repeats_key, &widths, options.pad_by_depth));
        previous = Some(record);
    }

    if options.order == Order::Reverse {
        lines.reverse();
    }
    lines.join("\n")
}

fn starts_group(previous: &NoteRecord, current: &NoteRecord, group_by: GroupBy) -> bool {
    match group_by {
        GroupBy::None => false,
        GroupBy::Key => previous.key != current.key,
        GroupBy::IdentifierRoot => previous.identifier.first() != current.identifier.first(),
    }
}

/// Alignment anchors shared by every line of one batch.
struct ColumnWidths {
    key: usize,
    /// Widest identifier, counting its indentation.
    identifier: usize,
    tags: usize,
}

impl ColumnWidths {
    fn measure(records: &[NoteRecord], min_key_width: usize) -> Self {
        let widest = |width: fn(&NoteRecord) -> usize| records.iter().map(width).max().unwrap_or(0);
        Self {
            key: widest(|record| char_len(&record.key)).max(min_key_width),
            identifier: widest(|record| {
                record.identifier.depth() + char_len(&record.identifier.to_string())
            }),
            tags: widest(|record| char_len(&record.tags)),
        }
    }
}

fn render_line(
    record: &NoteRecord,
    repeats_key: bool,
    widths: &ColumnWidths,
    pad_by_depth: bool,
) -> String {
    let identifier = record.identifier.to_string();
    let indent = if pad_by_depth {
        record.identifier.depth()
    } else {
        1
    };

    let mut line = String::new();
    if repeats_key {
        line.push(KEY_FILLER);
        push_spaces(&mut line, widths.key.saturating_sub(1));
    } else {
        line.push_str(&record.key);
        push_spaces(&mut line, widths.key.saturating_sub(char_len(&record.key)));
    }

    push_spaces(&mut line, indent);
    line.push(IDENTIFIER_MARK);
    line.push_str(&identifier);
    push_spaces(
        &mut line,
        (widths.identifier + 1).saturating_sub(indent + char_len(&identifier)),
    );

    line.push_str(&record.tags);
    push_spaces(
        &mut line,
        indent + widths.tags.saturating_sub(char_len(&record.tags)),
    );
    line.push_str(&record.description);
    line
}

fn push_spaces(line: &mut String, count: usize) {
    line.extend(std::iter::repeat(' ').take(count));
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::{arrange, decompose, sort_records, ArrangeOptions, KeyedFile, SortMode};

    #[test]
    fn decompose_skips_malformed_identifiers() {
        let records = decompose(&[
            KeyedFile::new("06-20", "1-foo.md"),
            KeyedFile::new("06-20", "README.md"),
            KeyedFile::new("06-21", "1a-TAG-bar.md"),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].identifier.to_string(), "1a");
        assert_eq!(records[1].tags, "TAG");
        assert_eq!(records[1].description, "bar");
    }

    #[test]
    fn identifier_sort_breaks_ties_by_key() {
        let mut records = decompose(&[
            KeyedFile::new("b", "2-x.md"),
            KeyedFile::new("b", "1-y.md"),
            KeyedFile::new("a", "1-z.md"),
        ]);
        sort_records(&mut records, SortMode::ByIdentifier);
        let keys: Vec<&str> = records.iter().map(|record| record.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "b"]);
        assert_eq!(records[2].identifier.to_string(), "2");
    }

    #[test]
    fn empty_batch_renders_nothing() {
        assert_eq!(arrange(&[], &ArrangeOptions::default()), "");
    }
}
