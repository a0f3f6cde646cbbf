//! Run stage: walks the traversal roots and changes ownership entry by entry.
//!
//! Side-effects:
//! - Emits facts for `run.attempt`, one `entry.result` per visited entry, `run.warning`, and `run.result`.
//! - Sends reporter lines to the `AuditSink` according to `Policy::verbosity`.
//! - Aborts with `ApiError::RootProtected` before any mutation when a recursive
//!   root resolves to `/` under `RootProtection::Preserve`; a root reached deeper
//!   in the walk aborts with no further mutation.
use std::path::PathBuf;
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::api::errors::{id_str, ApiError, ErrorId};
use crate::api::Chownyard;
use crate::fs::{observe, root_identity};
use crate::logging::audit::{new_run_id, AuditCtx, AuditMode};
use crate::logging::{now_iso, AuditSink, FactsEmitter, StageLogger};
use crate::policy::types::RootProtection;
use crate::types::ids::request_id;
use crate::types::{ChangeOutcome, OwnershipFilter, OwnershipSpec, RunReport};

mod engine;
mod report;

use engine::{root_warning, Walk};
use report::Reporter;

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &Chownyard<E, A>,
    roots: &[PathBuf],
    spec: &OwnershipSpec,
    filter: &OwnershipFilter,
) -> Result<RunReport, ApiError> {
    let t0 = Instant::now();
    api.policy.validate()?;

    let run_id = new_run_id();
    let tctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        run_id.to_string(),
        request_id(roots, spec, filter).to_string(),
        now_iso(),
        AuditMode::default(),
    );
    let slog = StageLogger::new(&tctx);
    slog.run_attempt()
        .merge(&json!({
            "roots": roots.iter().map(|r| r.display().to_string()).collect::<Vec<_>>(),
            "spec": spec,
            "filter": filter,
            "policy": &api.policy,
        }))
        .emit_success();

    let root = root_identity();
    let reporter = Reporter {
        slog: &slog,
        audit: &api.audit,
        verbosity: api.policy.verbosity,
        resolver: api.resolver.as_deref(),
        spec,
    };
    let mut walk = Walk::new(&api.policy, spec, filter, reporter, root);

    // A recursive run naming `/` is refused before anything is touched.
    if api.policy.recursive && api.policy.root_protection == RootProtection::Preserve {
        let follow = api.policy.traversal.follows_roots();
        if let Some(hit) = roots.iter().find(|r| {
            observe(r, follow)
                .is_ok_and(|o| root.is_some_and(|id| id.same_object(&o.identity)))
        }) {
            return Err(abort(api, &slog, t0, ApiError::RootProtected(hit.display().to_string())));
        }
    }

    for path in roots {
        if let Err(e) = walk.root(path) {
            return Err(abort(api, &slog, t0, e));
        }
    }

    let ok = walk.entries.iter().all(|e| !e.is_failure());
    let report = RunReport {
        ok,
        entries: walk.entries,
        warnings: walk.warnings,
        run_id: Some(run_id),
        duration_ms: elapsed_ms(t0),
    };
    let ev = slog.run_result().merge(&json!({
        "entries": report.entries.len(),
        "succeeded": report.count(ChangeOutcome::Succeeded),
        "failed": report.count(ChangeOutcome::Failed),
        "not_applied": report.count(ChangeOutcome::NotApplied),
        "no_change_requested": report.count(ChangeOutcome::NoChangeRequested),
        "warnings": report.warnings.len(),
        "duration_ms": report.duration_ms,
    }));
    if report.ok {
        ev.emit_success();
    } else {
        ev.emit_failure();
    }
    Ok(report)
}

fn abort<E: FactsEmitter, A: AuditSink>(
    api: &Chownyard<E, A>,
    slog: &StageLogger<'_>,
    t0: Instant,
    err: ApiError,
) -> ApiError {
    if let ApiError::RootProtected(path) = &err {
        api.audit
            .log(Level::Error, &root_warning(std::path::Path::new(path)));
        api.audit
            .log(Level::Error, "use --no-preserve-root to override this failsafe");
    }
    slog.run_result()
        .merge(&json!({
            "error": err.to_string(),
            "error_id": id_str(ErrorId::for_error(&err)),
            "duration_ms": elapsed_ms(t0),
        }))
        .emit_failure();
    err
}

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}
