#![deny(unsafe_code)]
//! Chownyard: race-safe recursive ownership changes.
//!
//! Safety model highlights:
//! - When an ownership filter is in effect, every change goes through a handle: open the entry relative to its parent directory (O_NOFOLLOW unless dereferencing) → fstat → compare {dev, ino} with what was observed → re-check the filter against the live owner → fchown → close.
//! - Recursive walks are pre-order with children in byte-lexicographic order; children are observed relative to a verified parent handle.
//! - Per-entry failures are recorded and the walk continues; only root protection aborts a run.
//! - `unsafe` is denied; the one exception is a checked close(2) so close failures are not lost.

pub mod adapters;
pub mod api;
pub mod constants;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
