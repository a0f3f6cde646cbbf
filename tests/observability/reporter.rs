//! Human-readable lines sent to the audit sink, by verbosity.

use log::Level;

use chownyard::adapters::EtcIdentityResolver;
use chownyard::policy::types::Verbosity;
use chownyard::policy::Policy;
use chownyard::types::{OwnershipFilter, OwnershipSpec};

use crate::helpers::{api, is_root, me};

fn policy(verbosity: Verbosity) -> Policy {
    Policy {
        verbosity,
        ..Policy::default()
    }
}

#[test]
fn verbose_reports_every_entry_with_numeric_ids() {
    let td = tempfile::tempdir().unwrap();
    let f = td.path().join("f");
    std::fs::write(&f, b"f").unwrap();
    let who = me(&td);
    let (api, _, audit) = api(policy(Verbosity::Verbose));

    api.run(
        &f,
        &OwnershipSpec::new(Some(who.uid), None),
        &OwnershipFilter::new(Some(who.uid.wrapping_add(1)), None),
    )
    .unwrap();

    assert_eq!(
        audit.messages(),
        vec![format!("ownership of '{}' retained as {}", f.display(), who.uid)]
    );
}

#[test]
fn verbose_uses_resolver_names() {
    let td = tempfile::tempdir().unwrap();
    let f = td.path().join("f");
    std::fs::write(&f, b"f").unwrap();
    let who = me(&td);
    let resolver = EtcIdentityResolver::parse(
        &format!("me:x:{}:{}::/:/bin/sh\n", who.uid, who.gid),
        &format!("mine:x:{}:\n", who.gid),
    );
    let (api, _, audit) = api(policy(Verbosity::Verbose));
    let api = api.with_identity_resolver(Box::new(resolver));

    api.run(
        &f,
        &OwnershipSpec::new(Some(who.uid), Some(who.gid)),
        &OwnershipFilter::default(),
    )
    .unwrap();

    assert_eq!(
        audit.messages(),
        vec![format!("ownership of '{}' retained as me:mine", f.display())]
    );
}

#[test]
fn changes_and_normal_stay_quiet_when_nothing_changed() {
    let td = tempfile::tempdir().unwrap();
    let f = td.path().join("f");
    std::fs::write(&f, b"f").unwrap();
    let who = me(&td);
    for verbosity in [Verbosity::Changes, Verbosity::Normal, Verbosity::Silent] {
        let (api, _, audit) = api(policy(verbosity));
        api.run(&f, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
            .unwrap();
        assert!(audit.messages().is_empty(), "{verbosity:?}");
    }
}

#[test]
fn failures_are_reported_unless_silent() {
    let td = tempfile::tempdir().unwrap();
    let missing = td.path().join("missing");
    let spec = OwnershipSpec::new(None, Some(0));

    let (api, _, audit) = api(policy(Verbosity::Normal));
    api.run(&missing, &spec, &OwnershipFilter::default()).unwrap();
    let lines = audit.lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, Level::Error);
    assert!(lines[0]
        .1
        .starts_with(&format!("changing group of '{}': ", missing.display())));

    let (api, _, audit) = crate::helpers::api(policy(Verbosity::Verbose));
    api.run(&missing, &spec, &OwnershipFilter::default()).unwrap();
    assert_eq!(
        audit.messages().last().unwrap(),
        &format!("failed to change group of '{}' to 0", missing.display())
    );

    let (api, _, audit) = crate::helpers::api(policy(Verbosity::Silent));
    api.run(&missing, &spec, &OwnershipFilter::default()).unwrap();
    assert!(audit.messages().is_empty());
}

#[test]
fn changes_reports_the_previous_owner() {
    let td = tempfile::tempdir().unwrap();
    if !is_root(&td) {
        // only root may give files away
        return;
    }
    let f = td.path().join("f");
    std::fs::write(&f, b"f").unwrap();
    let (api, _, audit) = api(policy(Verbosity::Changes));

    api.run(&f, &OwnershipSpec::new(Some(4242), None), &OwnershipFilter::new(Some(0), None))
        .unwrap();

    assert_eq!(
        audit.messages(),
        vec![format!("changed ownership of '{}' from 0 to 4242", f.display())]
    );
}
