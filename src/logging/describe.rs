//! Human-readable change lines.
//!
//! The wording depends on the outcome and on which of owner and group were
//! requested. Old names are only shown for the fields that were requested.
use std::path::Path;

use crate::types::ChangeOutcome;

fn user_group(user: Option<&str>, group: Option<&str>) -> Option<String> {
    match (user, group) {
        (Some(u), Some(g)) => Some(format!("{u}:{g}")),
        (Some(u), None) => Some(u.to_string()),
        (None, Some(g)) => Some(g.to_string()),
        (None, None) => None,
    }
}

/// Render one diagnostic line for `path`.
///
/// `new_owner`/`new_group` are `Some` exactly when that field was requested.
/// Never influences control flow.
#[must_use]
pub fn describe(
    path: &Path,
    outcome: ChangeOutcome,
    old_owner: Option<&str>,
    old_group: Option<&str>,
    new_owner: Option<&str>,
    new_group: Option<&str>,
) -> String {
    let file = format!("'{}'", path.display());
    let user = new_owner.is_some();
    let group = new_group.is_some();
    let spec = user_group(new_owner, new_group);
    let old_spec = user_group(
        if user { old_owner } else { None },
        if group { old_group } else { None },
    );
    let what = if user { "ownership" } else { "group" };

    match (outcome, spec) {
        (ChangeOutcome::NotApplied, _) => {
            format!("neither symbolic link {file} nor referent has been changed")
        }
        (ChangeOutcome::Succeeded, Some(spec)) => match old_spec {
            Some(old) => format!("changed {what} of {file} from {old} to {spec}"),
            None => format!("changed {what} of {file} to {spec}"),
        },
        (ChangeOutcome::Succeeded, None) => format!("no change to ownership of {file}"),
        (ChangeOutcome::Failed, Some(spec)) => match old_spec {
            Some(old) => format!("failed to change {what} of {file} from {old} to {spec}"),
            None => format!("failed to change {what} of {file} to {spec}"),
        },
        (ChangeOutcome::Failed, None) => format!("failed to change ownership of {file}"),
        (ChangeOutcome::NoChangeRequested, Some(_)) => match old_spec {
            Some(old) => format!("{what} of {file} retained as {old}"),
            None => format!("{what} of {file} retained"),
        },
        (ChangeOutcome::NoChangeRequested, None) => format!("ownership of {file} retained"),
    }
}
