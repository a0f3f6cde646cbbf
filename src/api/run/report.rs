//! Per-entry reporting: one `entry.result` fact for every entry, plus the
//! human-readable lines the policy's verbosity asks for.
use log::Level;
use serde_json::json;

use crate::adapters::IdentityResolver;
use crate::api::errors::{id_str, ErrorId};
use crate::logging::{describe, AuditSink, StageLogger};
use crate::policy::types::Verbosity;
use crate::types::{ChangeOutcome, EntryIdentity, EntryRecord, OwnershipSpec};

pub(crate) struct Reporter<'a> {
    pub slog: &'a StageLogger<'a>,
    pub audit: &'a dyn AuditSink,
    pub verbosity: Verbosity,
    pub resolver: Option<&'a dyn IdentityResolver>,
    pub spec: &'a OwnershipSpec,
}

impl Reporter<'_> {
    fn user(&self, uid: u32) -> String {
        self.resolver
            .and_then(|r| r.uid_to_name(uid))
            .unwrap_or_else(|| uid.to_string())
    }

    fn group(&self, gid: u32) -> String {
        self.resolver
            .and_then(|r| r.gid_to_name(gid))
            .unwrap_or_else(|| gid.to_string())
    }

    pub(crate) fn entry(&self, rec: &EntryRecord, identity: Option<&EntryIdentity>) {
        let mut ev = self
            .slog
            .entry_result()
            .path(rec.path.display().to_string())
            .field("outcome", json!(rec.outcome.as_str()));
        if let Some(before) = rec.before {
            ev = ev.field("before", json!({ "uid": before.uid, "gid": before.gid }));
        }
        if let Some(id) = identity {
            ev = ev.merge(&json!({ "dev": id.dev, "ino": id.ino, "kind": id.kind.as_str() }));
        }
        if let Some(reason) = &rec.reason {
            ev = ev.merge(&json!({
                "reason": reason,
                "error": reason.to_string(),
                "error_id": id_str(ErrorId::for_reason(reason)),
            }));
        }
        if let Some(secondary) = &rec.secondary {
            ev = ev.field("secondary", json!(secondary));
        }
        if rec.is_failure() {
            ev.emit_failure();
        } else {
            ev.emit_success();
        }
        self.lines(rec);
    }

    fn lines(&self, rec: &EntryRecord) {
        if self.verbosity == Verbosity::Silent {
            return;
        }
        if let Some(reason) = &rec.reason {
            let what = if self.spec.owner.is_some() {
                "ownership"
            } else {
                "group"
            };
            self.audit.log(
                Level::Error,
                &format!("changing {what} of '{}': {reason}", rec.path.display()),
            );
        }
        if let Some(secondary) = &rec.secondary {
            self.audit
                .log(Level::Error, &format!("'{}': {secondary}", rec.path.display()));
        }
        let show = match self.verbosity {
            Verbosity::Silent | Verbosity::Normal => false,
            Verbosity::Changes => rec.outcome == ChangeOutcome::Succeeded,
            Verbosity::Verbose => true,
        };
        if !show {
            return;
        }
        let old_owner = rec.before.map(|b| self.user(b.uid));
        let old_group = rec.before.map(|b| self.group(b.gid));
        let new_owner = self.spec.owner.map(|u| self.user(u));
        let new_group = self.spec.group.map(|g| self.group(g));
        let line = describe(
            &rec.path,
            rec.outcome,
            old_owner.as_deref(),
            old_group.as_deref(),
            new_owner.as_deref(),
            new_group.as_deref(),
        );
        self.audit.log(Level::Info, &line);
    }

    pub(crate) fn warn(&self, msg: &str) {
        self.slog.warning().field("message", json!(msg)).emit_warn();
        if self.verbosity != Verbosity::Silent {
            self.audit.log(Level::Warn, msg);
        }
    }
}
