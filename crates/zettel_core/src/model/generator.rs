//! Next-identifier allocation.
//!
//! # Invariants
//! - Allocation is monotonic: the new segment is greater than every
//!   existing segment at the child depth.
//! - No filesystem access; callers scope `existing` to the parent's
//!   namespace.

use crate::model::identifier::{
    increment_segment, next_level_seed, segment_at_depth, Identifier, IdentifierError,
};

/// Computes the next free child identifier of `parent`.
///
/// `existing` should hold every identifier already allocated at or below
/// `parent`. Identifiers outside that namespace are not detected and will
/// skew the result.
///
/// # Errors
/// - Returns `Exhausted` when the numeric tail cannot be incremented.
pub fn next_identifier(
    parent: &Identifier,
    existing: &[Identifier],
) -> Result<Identifier, IdentifierError> {
    let segment = match segment_at_depth(existing, parent.depth()) {
        Some(tail) => increment_segment(tail)?,
        None => next_level_seed(parent),
    };
    Ok(parent.child(segment))
}
