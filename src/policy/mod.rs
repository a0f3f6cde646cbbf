//! Run configuration.
//!
//! The `policy` module centralizes the knobs that govern a run: traversal and
//! symlink handling, root protection and diagnostic verbosity. Consumers
//! construct a [`Policy`](crate::policy::Policy) via `Policy::default()` or
//! `hardened_preset()` and customize fields before creating a
//! [`Chownyard`](crate::Chownyard) instance.
//!
//! Submodules:
//! - `config`: policy struct, presets and validation
//! - `types`: the enums the policy is made of

pub mod config;
pub mod types;

pub use config::Policy;
