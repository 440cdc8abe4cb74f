//! Listing and arrangement engine.
//!
//! # Responsibility
//! - Sort decomposed notes by identifier or by an external key.
//! - Render batches as aligned, grouped outline text.

pub mod arrange;
