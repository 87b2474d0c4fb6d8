//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define the single persisted record (`Note`) and its identifier.
//! - Keep wire naming compatible with the stored JSON blob.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod note;
