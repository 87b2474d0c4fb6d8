//! In-memory search and list projection.
//!
//! # Responsibility
//! - Derive the filtered, rendered notes list from the note store.
//! - Keep preview shaping inside core so every host renders the same rows.

pub mod projection;
