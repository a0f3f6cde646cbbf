use crate::adapters::IdentityResolver;
use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::Policy;

/// Builder for constructing a Chownyard with ergonomic chaining.
/// Mirrors `Chownyard::new(...).with_*` but avoids duplication at call sites.
pub struct ApiBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    resolver: Option<Box<dyn IdentityResolver>>,
}

impl<E: FactsEmitter, A: AuditSink> ApiBuilder<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy) -> Self {
        Self {
            facts,
            audit,
            policy,
            resolver: None,
        }
    }

    #[must_use]
    pub fn identity_resolver(mut self, resolver: Box<dyn IdentityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn build(self) -> super::Chownyard<E, A> {
        let api = super::Chownyard::new(self.facts, self.audit, self.policy);
        match self.resolver {
            Some(r) => api.with_identity_resolver(r),
            None => api,
        }
    }
}
