//! Deterministic UUIDv5 identifiers for run requests.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that
//! `request_id` is reproducible across runs for the same roots, spec and filter.
use std::fmt::Write;
use std::path::PathBuf;

use uuid::Uuid;

use super::ownership::{OwnershipFilter, OwnershipSpec};
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

fn opt(v: Option<u32>) -> String {
    v.map_or_else(|| "-".to_string(), |id| id.to_string())
}

/// Compute a deterministic UUIDv5 for a request: roots in order, then spec and filter.
#[must_use]
pub fn request_id(roots: &[PathBuf], spec: &OwnershipSpec, filter: &OwnershipFilter) -> Uuid {
    let mut s = String::new();
    for r in roots {
        s.push_str(&r.to_string_lossy());
        s.push('\n');
    }
    // Ignore formatting errors as writing to a String cannot fail
    let _ = write!(
        s,
        "to={}:{};from={}:{}",
        opt(spec.owner),
        opt(spec.group),
        opt(filter.owner),
        opt(filter.group)
    );
    Uuid::new_v5(&namespace(), s.as_bytes())
}
