//! Shared crate-wide constants for Chownyard.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Subsystem label stamped on every emitted fact.
pub const SUBSYSTEM: &str = "chownyard";

/// Path whose identity is protected when `RootProtection::Preserve` is active.
pub const FS_ROOT: &str = "/";

/// UUIDv5 namespace tag for deterministic request IDs.
/// The same roots, spec and filter always hash to the same `request_id`.
pub const NS_TAG: &str = "https://chownyard/run";
