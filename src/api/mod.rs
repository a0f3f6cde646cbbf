// Facade for API module; delegates to submodules under src/api/

use std::path::{Path, PathBuf};

use crate::adapters::IdentityResolver;
use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::Policy;
use crate::types::{OwnershipFilter, OwnershipSpec, RunReport};

mod builder;
pub mod errors;
mod run;

pub use builder::ApiBuilder;

pub struct Chownyard<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    resolver: Option<Box<dyn IdentityResolver>>, // names in reporter lines; numeric ids when absent
}

impl<E: FactsEmitter, A: AuditSink> Chownyard<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy) -> Self {
        Self {
            facts,
            audit,
            policy,
            resolver: None,
        }
    }

    #[must_use]
    pub fn with_identity_resolver(mut self, resolver: Box<dyn IdentityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Change ownership of `root` (and, when recursive, everything below it).
    ///
    /// Per-entry problems are recorded in the report and make `ok` false; they
    /// never stop the walk.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an inconsistent policy, `RootProtected` when a
    /// recursive run reaches `/` with root protection enabled.
    pub fn run(
        &self,
        root: &Path,
        spec: &OwnershipSpec,
        filter: &OwnershipFilter,
    ) -> Result<RunReport, errors::ApiError> {
        run::run(self, &[root.to_path_buf()], spec, filter)
    }

    /// Like [`run`](Self::run) for several roots, visited in the given order,
    /// with a single aggregated report.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run). A root-protection violation on any root aborts the whole call.
    pub fn run_all(
        &self,
        roots: &[PathBuf],
        spec: &OwnershipSpec,
        filter: &OwnershipFilter,
    ) -> Result<RunReport, errors::ApiError> {
        run::run(self, roots, spec, filter)
    }
}
