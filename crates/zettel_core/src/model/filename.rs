//! Note filename codec.
//!
//! A note filename has the shape
//! `<identifier>-<TAG>-<TAG>-<description words>.md`, e.g.
//! `12a1-TAG1-TAG2-a-short-description.md`.
//!
//! # Invariants
//! - The identifier is the text before the first `-`.
//! - Tags are the leading run of uppercase words; the first other word
//!   switches to description for the rest of the name.

/// Separator between identifier, tags and description words.
pub const DELIM: char = '-';
/// Suffix of every note file.
pub const NOTE_SUFFIX: &str = ".md";

/// Returns the identifier part of a filename, identifier or `/`.
pub fn select_identifier(name: &str) -> &str {
    match name.split_once(DELIM) {
        Some((identifier, _)) => identifier,
        None => name.strip_suffix(NOTE_SUFFIX).unwrap_or(name),
    }
}

/// Returns everything between the identifier and the `.md` suffix.
pub fn select_text(name: &str) -> &str {
    let stem = name.strip_suffix(NOTE_SUFFIX).unwrap_or(name);
    stem.split_once(DELIM).map(|(_, text)| text).unwrap_or("")
}

/// Splits a filename into `(identifier, tag_text)`.
pub fn decompose_filename(name: &str) -> (&str, &str) {
    (select_identifier(name), select_text(name))
}

/// Splits dash-joined text into space-joined `(tags, description)`.
pub fn classify_tags_and_description(text: &str) -> (String, String) {
    let mut tags = Vec::new();
    let mut description = Vec::new();
    let mut reading_tags = true;
    for word in text.split(DELIM) {
        if !is_tag_word(word) {
            reading_tags = false;
        }
        if reading_tags {
            tags.push(word);
        } else {
            description.push(word);
        }
    }
    (tags.join(" "), description.join(" "))
}

/// A tag word has at least one uppercase character and no lowercase one.
fn is_tag_word(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Joins free-text parts into one dash-separated run.
///
/// Both `["foo BAR"]` and `["foo", "BAR"]` give `foo-BAR`.
pub fn dash_separated<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .flat_map(|part| part.as_ref().split_whitespace())
        .collect::<Vec<_>>()
        .join("-")
}

/// Builds `<identifier>-<dash separated parts>.md`.
pub fn compose_filename<S: AsRef<str>>(identifier: &str, parts: &[S]) -> String {
    format!(
        "{identifier}{DELIM}{}{NOTE_SUFFIX}",
        dash_separated(parts)
    )
}
