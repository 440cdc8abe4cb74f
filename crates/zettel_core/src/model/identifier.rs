//! Hierarchical note identifier algebra.
//!
//! # Responsibility
//! - Parse identifiers such as `12a1` into alternating segments.
//! - Render segments back into their compact string form.
//! - Provide the per-depth primitives used for identifier allocation.
//!
//! # Invariants
//! - Segments alternate in kind, starting with `Numeric` at depth 0.
//! - Ordering is lexicographic over segments; a prefix sorts before any
//!   identifier extending it.
//! - `parse(render(id)) == id` for every parsed identifier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Marker used by callers to address the top of the outline.
pub const ROOT_MARKER: &str = "/";

static IDENTIFIER_GRAMMAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:[a-z]+[0-9]+)*[a-z]*$").expect("valid identifier regex"));
static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+|[a-z]+").expect("valid segment regex"));

/// Errors from identifier parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Input does not decompose into alternating numeric/letter segments.
    Malformed(String),
    /// Numeric segment cannot be incremented without overflow.
    Exhausted(String),
}

impl Display for IdentifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed identifier: `{value}`"),
            Self::Exhausted(value) => write!(f, "identifier segment exhausted: `{value}`"),
        }
    }
}

impl Error for IdentifierError {}

/// One component of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Digit run, compared numerically.
    Numeric(u64),
    /// Lowercase letter run, compared lexicographically.
    Letters(String),
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(left), Self::Numeric(right)) => left.cmp(right),
            (Self::Letters(left), Self::Letters(right)) => left.cmp(right),
            // Never hit for well-formed siblings; keeps the order total.
            (Self::Numeric(_), Self::Letters(_)) => Ordering::Less,
            (Self::Letters(_), Self::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Letters(value) => f.write_str(value),
        }
    }
}

/// Parsed hierarchical identifier.
///
/// The empty sequence is the root parent and renders as `/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Identifier(Vec<Segment>);

impl Identifier {
    /// Returns the root parent (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses `/` as root and anything else with [`parse_identifier`].
    pub fn parse_parent(value: &str) -> Result<Self, IdentifierError> {
        if value == ROOT_MARKER {
            Ok(Self::root())
        } else {
            parse_identifier(value)
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Nesting depth, equal to the number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level segment, used to group an outline by root entry.
    pub fn first(&self) -> Option<&Segment> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Returns whether `self` lies at or below `ancestor` in the outline.
    pub fn starts_with(&self, ancestor: &Identifier) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Returns a child identifier with `segment` appended.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return f.write_str(ROOT_MARKER);
        }
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_identifier(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::parse_parent(value.as_str())
    }
}

/// Parses an identifier such as `12a1` into `[12, "a", 1]`.
///
/// # Errors
/// - Returns `Malformed` for empty input, characters outside `[0-9a-z]`,
///   a leading letter run, or a numeric run that is zero, has a leading
///   zero, or exceeds `u64`.
pub fn parse_identifier(value: &str) -> Result<Identifier, IdentifierError> {
    if !IDENTIFIER_GRAMMAR_RE.is_match(value) {
        return Err(IdentifierError::Malformed(value.to_string()));
    }

    SEGMENT_RE
        .find_iter(value)
        .map(|run| parse_segment(run.as_str(), value))
        .collect::<Result<Vec<_>, _>>()
        .map(Identifier)
}

fn parse_segment(run: &str, whole: &str) -> Result<Segment, IdentifierError> {
    if !run.as_bytes()[0].is_ascii_digit() {
        return Ok(Segment::Letters(run.to_string()));
    }
    // Numeric segments are positive; leading zeros would not round-trip.
    if run.starts_with('0') {
        return Err(IdentifierError::Malformed(whole.to_string()));
    }
    run.parse::<u64>()
        .map(Segment::Numeric)
        .map_err(|_| IdentifierError::Malformed(whole.to_string()))
}

/// Returns the largest segment found at `depth` among `identifiers`.
///
/// Identifiers too shallow to have a segment at `depth` are ignored;
/// `None` means no identifier reaches that depth.
pub fn segment_at_depth<'a, I>(identifiers: I, depth: usize) -> Option<&'a Segment>
where
    I: IntoIterator<Item = &'a Identifier>,
{
    identifiers
        .into_iter()
        .filter_map(|identifier| identifier.segments().get(depth))
        .max()
}

/// Returns the successor of one segment.
///
/// Letter runs never carry leftward: a trailing `z` grows the run instead,
/// giving `a, b, .., z, za, zb, .., zz, zza, ..`.
///
/// # Errors
/// - Returns `Exhausted` when a numeric segment is already `u64::MAX`.
pub fn increment_segment(segment: &Segment) -> Result<Segment, IdentifierError> {
    match segment {
        Segment::Numeric(value) => value
            .checked_add(1)
            .map(Segment::Numeric)
            .ok_or_else(|| IdentifierError::Exhausted(value.to_string())),
        Segment::Letters(value) => {
            let mut next = value.clone();
            match next.pop() {
                Some('z') => {
                    next.push('z');
                    next.push('a');
                }
                Some(last) => next.push(char::from_u32(u32::from(last) + 1).unwrap_or(last)),
                None => next.push('a'),
            }
            Ok(Segment::Letters(next))
        }
    }
}

/// First segment for a parent that has no children yet.
///
/// Root and letter-ended parents start numbering at `1`; integer-ended
/// parents start lettering at `a`.
pub fn next_level_seed(parent: &Identifier) -> Segment {
    match parent.last() {
        Some(Segment::Numeric(_)) => Segment::Letters("a".to_string()),
        Some(Segment::Letters(_)) | None => Segment::Numeric(1),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        increment_segment, next_level_seed, parse_identifier, segment_at_depth, Identifier,
        IdentifierError, Segment,
    };

    fn num(value: u64) -> Segment {
        Segment::Numeric(value)
    }

    fn letters(value: &str) -> Segment {
        Segment::Letters(value.to_string())
    }

    fn ids(values: &[&str]) -> Vec<Identifier> {
        values
            .iter()
            .map(|value| parse_identifier(value).unwrap())
            .collect()
    }

    #[test]
    fn parse_splits_alternating_runs() {
        assert_eq!(parse_identifier("1").unwrap().segments(), &[num(1)]);
        assert_eq!(parse_identifier("12").unwrap().segments(), &[num(12)]);
        assert_eq!(
            parse_identifier("1a2").unwrap().segments(),
            &[num(1), letters("a"), num(2)]
        );
        assert_eq!(
            parse_identifier("1za2").unwrap().segments(),
            &[num(1), letters("za"), num(2)]
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for value in [
            "", "a1", "1A", "1-a", "1a 2", "0", "1a0", "01", "/", "99999999999999999999999",
        ] {
            assert_eq!(
                parse_identifier(value),
                Err(IdentifierError::Malformed(value.to_string())),
                "`{value}` should be rejected"
            );
        }
    }

    #[test]
    fn render_round_trips_and_root_renders_as_marker() {
        for value in ["1", "12a1", "3zza10b"] {
            assert_eq!(parse_identifier(value).unwrap().to_string(), value);
        }
        assert_eq!(Identifier::root().to_string(), "/");
        assert_eq!(Identifier::parse_parent("/").unwrap(), Identifier::root());
    }

    #[test]
    fn ordering_is_numeric_and_prefix_first() {
        let mut sorted = ids(&["10", "2", "1a", "1", "1b", "1a1"]);
        sorted.sort();
        let rendered: Vec<String> = sorted.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1", "1a", "1a1", "1b", "2", "10"]);
    }

    #[test]
    fn segment_at_depth_picks_maximum_reaching_depth() {
        let all = ids(&["1", "1a", "1a2", "1b1b"]);
        assert_eq!(segment_at_depth(&ids(&["1"]), 1), None);
        assert_eq!(segment_at_depth(&ids(&[]), 4), None);
        assert_eq!(segment_at_depth(&ids(&["1"]), 0), Some(&num(1)));
        assert_eq!(segment_at_depth(&all, 0), Some(&num(1)));
        assert_eq!(segment_at_depth(&all, 1), Some(&letters("b")));
        assert_eq!(segment_at_depth(&all, 2), Some(&num(2)));
        assert_eq!(segment_at_depth(&all, 3), Some(&letters("b")));
        assert_eq!(segment_at_depth(&all, 4), None);
    }

    #[test]
    fn increment_appends_after_z_instead_of_carrying() {
        assert_eq!(increment_segment(&num(1)).unwrap(), num(2));
        assert_eq!(increment_segment(&letters("a")).unwrap(), letters("b"));
        assert_eq!(increment_segment(&letters("z")).unwrap(), letters("za"));
        assert_eq!(increment_segment(&letters("za")).unwrap(), letters("zb"));
        assert_eq!(increment_segment(&letters("zz")).unwrap(), letters("zza"));
        assert!(matches!(
            increment_segment(&num(u64::MAX)),
            Err(IdentifierError::Exhausted(_))
        ));
    }

    #[test]
    fn increment_is_strictly_increasing() {
        let mut current = letters("a");
        for _ in 0..80 {
            let next = increment_segment(&current).unwrap();
            assert!(next > current, "{next} should sort after {current}");
            current = next;
        }
        let mut number = num(8);
        for _ in 0..5 {
            let next = increment_segment(&number).unwrap();
            assert!(next > number);
            number = next;
        }
    }

    #[test]
    fn next_level_seed_alternates_kind() {
        assert_eq!(next_level_seed(&Identifier::root()), num(1));
        assert_eq!(next_level_seed(&parse_identifier("10").unwrap()), letters("a"));
        assert_eq!(next_level_seed(&parse_identifier("10b").unwrap()), num(1));
    }
}
