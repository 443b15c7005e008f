//! Shared infrastructure utilities for Canvass.
//!
//! Cross-cutting helpers that multiple Canvass crates need but that don't
//! belong in the domain-pure `canvass-types` crate.

mod atomic_write;

pub use atomic_write::{AtomicWriteOptions, atomic_write, atomic_write_with_options};
