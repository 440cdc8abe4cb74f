//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate directory access, allocation and listing into use-cases.
//! - Keep the CLI decoupled from globbing and file reads.

pub mod note_service;
