//! Note directory contracts and filesystem implementation.
//!
//! # Responsibility
//! - List note filenames matching a glob relative to the notes directory.
//! - Supply per-file keys: last-modified date, priority marker, header tags.
//! - Perform the single `rename` used by the rename use-case.
//!
//! # Invariants
//! - Names are plain file names, never paths; results are sorted.
//! - Header scans read at most `HEADER_DEPTH` lines.
//! - A failed read yields "no key" and a warning, never a batch failure.

use chrono::{DateTime, Local};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Number of leading lines searched for header markers.
pub const HEADER_DEPTH: usize = 3;
/// Characters of a priority line kept as its key, `P` included.
pub const PRIORITY_LEN: usize = 2;
/// `strftime` format of last-modified keys.
pub const DATE_KEY_FORMAT: &str = "%m-%d";

static PRIORITY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^P").expect("valid priority regex"));
static TAGS_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tags:(.*)$").expect("valid tags regex"));
static TAG_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("valid tag split regex"));

/// Result type used by note directory operations.
pub type DirResult<T> = Result<T, DirError>;

/// Errors from note directory operations.
#[derive(Debug)]
pub enum DirError {
    /// Filesystem call failed for `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Glob pattern could not be compiled.
    InvalidPattern { pattern: String, message: String },
    /// Notes directory path cannot be used inside a glob pattern.
    NonUtf8Path(PathBuf),
}

impl Display for DirError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid name pattern `{pattern}`: {message}")
            }
            Self::NonUtf8Path(path) => {
                write!(f, "notes directory is not valid UTF-8: {}", path.display())
            }
        }
    }
}

impl Error for DirError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidPattern { .. } => None,
            Self::NonUtf8Path(_) => None,
        }
    }
}

/// Read access to a flat directory of note files, plus rename.
pub trait NoteDirectory {
    /// Lists file names matching a glob `pattern`, sorted.
    fn list_names(&self, pattern: &str) -> DirResult<Vec<String>>;
    /// Returns the file's modification date formatted as `%m-%d`.
    fn last_modified_key(&self, name: &str) -> DirResult<String>;
    /// Returns up to `depth` leading lines, without line terminators.
    fn header_lines(&self, name: &str, depth: usize) -> DirResult<Vec<String>>;
    /// Returns whether a file with this name exists.
    fn exists(&self, name: &str) -> bool;
    /// Renames one file inside the directory.
    fn rename(&self, from: &str, to: &str) -> DirResult<()>;

    /// Priority code from the first header line starting with `P`.
    fn priority_key(&self, name: &str) -> Option<String> {
        let lines = scan_header(self, name)?;
        extract_priority(lines.as_slice())
    }

    /// Sorted header tags, present only when every `required` tag is set.
    fn header_tags_key(&self, name: &str, required: &[String]) -> Option<String> {
        let lines = scan_header(self, name)?;
        extract_header_tags(lines.as_slice(), required)
    }
}

fn scan_header<D: NoteDirectory + ?Sized>(dir: &D, name: &str) -> Option<Vec<String>> {
    match dir.header_lines(name, HEADER_DEPTH) {
        Ok(lines) => Some(lines),
        Err(err) => {
            warn!("event=header_scan module=repo status=skip name={name} error={err}");
            None
        }
    }
}

/// Extracts the priority code (`P1`, `P2`, ..) from header lines.
pub fn extract_priority<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .find(|line| PRIORITY_LINE_RE.is_match(line))
        .map(|line| line.chars().take(PRIORITY_LEN).collect())
}

/// Extracts the `tags:` header as a sorted, de-duplicated, space-joined key.
///
/// Returns `None` when no tags line exists or a `required` tag is missing.
pub fn extract_header_tags<S: AsRef<str>>(lines: &[S], required: &[String]) -> Option<String> {
    let captured = lines
        .iter()
        .find_map(|line| TAGS_LINE_RE.captures(line.as_ref()))?;
    let tags: BTreeSet<&str> = TAG_SPLIT_RE
        .split(captured.get(1).map_or("", |value| value.as_str()))
        .filter(|tag| !tag.is_empty())
        .collect();

    if required.iter().any(|tag| !tags.contains(tag.as_str())) {
        return None;
    }
    Some(tags.into_iter().collect::<Vec<_>>().join(" "))
}

/// Filesystem-backed note directory.
#[derive(Debug, Clone)]
pub struct FsNoteDirectory {
    root: PathBuf,
}

impl FsNoteDirectory {
    /// Creates an adapter over `root`; the directory is not touched yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl NoteDirectory for FsNoteDirectory {
    fn list_names(&self, pattern: &str) -> DirResult<Vec<String>> {
        let root = self
            .root
            .to_str()
            .ok_or_else(|| DirError::NonUtf8Path(self.root.clone()))?;
        let full_pattern = format!("{}/{pattern}", glob::Pattern::escape(root));

        let entries = glob::glob(&full_pattern).map_err(|err| DirError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!("event=list_names module=repo status=skip error={err}");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn last_modified_key(&self, name: &str) -> DirResult<String> {
        let path = self.path_of(name);
        let modified = path
            .metadata()
            .and_then(|metadata| metadata.modified())
            .map_err(|source| DirError::Io {
                path: path.clone(),
                source,
            })?;
        let local: DateTime<Local> = modified.into();
        Ok(local.format(DATE_KEY_FORMAT).to_string())
    }

    fn header_lines(&self, name: &str, depth: usize) -> DirResult<Vec<String>> {
        let path = self.path_of(name);
        let io_error = |source| DirError::Io {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).map_err(io_error)?;
        BufReader::new(file)
            .lines()
            .take(depth)
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_of(name).exists()
    }

    fn rename(&self, from: &str, to: &str) -> DirResult<()> {
        let source_path = self.path_of(from);
        std::fs::rename(&source_path, self.path_of(to)).map_err(|source| DirError::Io {
            path: source_path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_header_tags, extract_priority};

    #[test]
    fn priority_takes_first_p_line_prefix() {
        assert_eq!(
            extract_priority(&["# title", "P1 urgent", "P3"]),
            Some("P1".to_string())
        );
        assert_eq!(extract_priority(&["# title", "body"]), None);
        assert_eq!(extract_priority(&["P"]), Some("P".to_string()));
    }

    #[test]
    fn header_tags_are_sorted_and_filtered() {
        let lines = ["# title", "tags: work, idea work  draft"];
        assert_eq!(
            extract_header_tags(&lines, &[]),
            Some("draft idea work".to_string())
        );
        assert_eq!(
            extract_header_tags(&lines, &["idea".to_string()]),
            Some("draft idea work".to_string())
        );
        assert_eq!(extract_header_tags(&lines, &["home".to_string()]), None);
        assert_eq!(extract_header_tags(&["no header"], &[]), None);
    }
}
