use serde::Serialize;

use crate::api::errors::ApiError;

use super::types::{Dereference, RootProtection, TraversalPolicy, Verbosity};

/// Policy governs traversal, symlink handling, root protection and reporting for a run.
///
/// Constructed once by the caller and never mutated while a run is in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub traversal: TraversalPolicy,
    pub recursive: bool,
    pub dereference: Dereference,
    pub root_protection: RootProtection,
    pub verbosity: Verbosity,
}

impl Policy {
    /// Construct a Policy with root protection enabled.
    ///
    /// Enables:
    /// - `root_protection = Preserve` (a recursive run reaching `/` aborts with no further changes)
    ///
    /// # Example
    /// ```rust
    /// use chownyard::policy::Policy;
    /// use chownyard::policy::types::RootProtection;
    ///
    /// let mut policy = Policy::hardened_preset();
    /// policy.recursive = true;
    /// assert_eq!(policy.root_protection, RootProtection::Preserve);
    /// assert!(policy.validate().is_ok());
    /// ```
    #[must_use]
    pub fn hardened_preset() -> Self {
        let mut p = Self::default();
        p.apply_hardened_preset();
        p
    }

    /// Mutate this Policy to apply the hardened preset; see `hardened_preset()`.
    pub fn apply_hardened_preset(&mut self) -> &mut Self {
        self.root_protection = RootProtection::Preserve;
        self
    }

    /// True when changes aimed at a symlink should reach its referent.
    #[must_use]
    pub fn affects_referent(&self) -> bool {
        match self.dereference {
            Dereference::Referent => true,
            Dereference::Link => false,
            Dereference::Unspecified => {
                !(self.recursive && self.traversal == TraversalPolicy::NoFollow)
            }
        }
    }

    /// Reject combinations that cannot be honored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` when an explicit `Dereference::Referent` is
    /// combined with a recursive `NoFollow` traversal.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.recursive
            && self.traversal == TraversalPolicy::NoFollow
            && self.dereference == Dereference::Referent
        {
            return Err(ApiError::InvalidConfig(
                "recursive dereference requires following command-line or all symlinks".into(),
            ));
        }
        Ok(())
    }
}
