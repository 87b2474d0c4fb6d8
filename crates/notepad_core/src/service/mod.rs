//! Editing session services.
//!
//! # Responsibility
//! - Own the current-note controller and the command set that drives it.
//! - Keep hosts decoupled from storage and surface details.

pub mod autosave;
pub mod clock;
pub mod command;
pub mod session;
pub mod status;
