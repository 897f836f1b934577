//! Prelude module for calendar_range crate.
//!
//! Re-exports the derive macros used across the crate.

pub use derive_more::Display;
