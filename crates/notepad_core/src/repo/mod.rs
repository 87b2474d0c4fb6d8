//! Storage layer for the note list.
//!
//! # Responsibility
//! - Define the key-value backend contract the app persists through.
//! - Own the canonical note list and its blob encoding.
//!
//! # Invariants
//! - The whole list lives under a single key; there is no sharding.
//! - Read failures degrade to an empty list; write failures are returned.

pub mod kv;
pub mod note_store;
