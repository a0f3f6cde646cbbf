//! Symlink handling under each traversal policy.

use std::os::unix::fs::symlink;

use chownyard::policy::types::{Dereference, TraversalPolicy};
use chownyard::policy::Policy;
use chownyard::types::{ChangeOutcome, FailureReason, OwnershipFilter, OwnershipSpec};

use crate::helpers::{api, is_root, me, owner_of, paths, recursive};

fn policy(traversal: TraversalPolicy) -> Policy {
    recursive(Policy {
        traversal,
        ..Policy::default()
    })
}

/// `d/` holding `link -> ../other`, where `other/` holds `inner.txt`.
fn linked_tree(td: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let d = td.path().join("d");
    let other = td.path().join("other");
    std::fs::create_dir(&d).unwrap();
    std::fs::create_dir(&other).unwrap();
    std::fs::write(other.join("inner.txt"), b"i").unwrap();
    symlink("../other", d.join("link")).unwrap();
    (d, other)
}

#[test]
fn no_follow_never_descends_through_links() {
    let td = tempfile::tempdir().unwrap();
    let (d, _) = linked_tree(&td);
    let who = me(&td);
    let (api, _, _) = api(policy(TraversalPolicy::NoFollow));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    assert_eq!(paths(&report), vec![d.clone(), d.join("link")]);
    assert!(report.ok);
}

#[test]
fn follow_all_changes_link_then_referent_and_descendants() {
    let td = tempfile::tempdir().unwrap();
    let (d, other) = linked_tree(&td);
    let other = std::fs::canonicalize(other).unwrap();
    let who = me(&td);
    let (api, _, _) = api(policy(TraversalPolicy::FollowAllSymlinks));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    assert_eq!(
        paths(&report),
        vec![d.clone(), d.join("link"), other.clone(), other.join("inner.txt")]
    );
    assert!(report.ok);
}

#[test]
fn follow_command_line_only_applies_to_roots() {
    let td = tempfile::tempdir().unwrap();
    let (d, other) = linked_tree(&td);
    let root_link = td.path().join("root-link");
    symlink("d", &root_link).unwrap();
    let d_real = std::fs::canonicalize(&d).unwrap();
    let who = me(&td);
    let (api, _, _) = api(policy(TraversalPolicy::FollowCommandLineSymlinks));

    let report = api
        .run(
            &root_link,
            &OwnershipSpec::new(Some(who.uid), None),
            &OwnershipFilter::default(),
        )
        .unwrap();

    assert_eq!(
        paths(&report),
        vec![root_link.clone(), d_real.clone(), d_real.join("link")]
    );
    let inner = std::fs::canonicalize(other).unwrap().join("inner.txt");
    assert!(!paths(&report).contains(&inner));
    assert!(report.ok);
}

#[test]
fn dangling_link_that_must_be_followed_fails() {
    let td = tempfile::tempdir().unwrap();
    let d = td.path().join("d");
    std::fs::create_dir(&d).unwrap();
    symlink("missing", d.join("dangling")).unwrap();
    std::fs::write(d.join("z.txt"), b"z").unwrap();
    let who = me(&td);
    let (api, _, _) = api(policy(TraversalPolicy::FollowAllSymlinks));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    assert!(!report.ok);
    let dangling = &report.entries[1];
    assert_eq!(dangling.path, d.join("dangling"));
    assert!(matches!(dangling.reason, Some(FailureReason::CannotDereference(_))));
    // The walk carried on with the next sibling.
    assert_eq!(report.entries[2].path, d.join("z.txt"));
}

#[test]
fn dangling_link_is_fine_when_links_themselves_change() {
    let td = tempfile::tempdir().unwrap();
    let d = td.path().join("d");
    std::fs::create_dir(&d).unwrap();
    symlink("missing", d.join("dangling")).unwrap();
    let who = me(&td);
    let (api, _, _) = api(policy(TraversalPolicy::NoFollow));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    assert!(report.ok);
    assert!(report.entries[1].outcome.is_ok());
}

#[test]
fn cycle_is_warned_not_failed() {
    let td = tempfile::tempdir().unwrap();
    let d = td.path().join("d");
    std::fs::create_dir(&d).unwrap();
    symlink(".", d.join("loop")).unwrap();
    let who = me(&td);
    let (api, _, _) = api(policy(TraversalPolicy::FollowAllSymlinks));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    assert!(report.ok);
    assert_eq!(paths(&report), vec![d.clone(), d.join("loop")]);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("cycle"));
}

#[test]
fn non_recursive_link_dereference_modes() {
    let td = tempfile::tempdir().unwrap();
    let f = td.path().join("f");
    let l = td.path().join("l");
    std::fs::write(&f, b"f").unwrap();
    symlink("f", &l).unwrap();
    let who = me(&td);
    let spec = OwnershipSpec::new(Some(who.uid), None);

    // Default follows the link to the file.
    let (api, _, _) = api(Policy::default());
    let report = api.run(&l, &spec, &OwnershipFilter::new(Some(who.uid), None)).unwrap();
    assert!(report.ok);
    assert_eq!(report.entries[0].path, l);

    // Link mode changes the link itself; platforms that refuse are NotApplied, not failures.
    let (api, _, _) = crate::helpers::api(Policy {
        dereference: Dereference::Link,
        ..Policy::default()
    });
    let report = api.run(&l, &spec, &OwnershipFilter::default()).unwrap();
    assert!(report.ok);
    assert!(matches!(
        report.entries[0].outcome,
        ChangeOutcome::NoChangeRequested | ChangeOutcome::NotApplied
    ));
}

#[test]
fn follow_all_changes_ownership_of_link_and_referent() {
    let td = tempfile::tempdir().unwrap();
    if !is_root(&td) {
        // only root may give files away
        return;
    }
    let (d, other) = linked_tree(&td);
    let (api, _, _) = api(policy(TraversalPolicy::FollowAllSymlinks));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(4242), None), &OwnershipFilter::default())
        .unwrap();

    assert!(report.ok);
    assert_eq!(report.count(ChangeOutcome::Succeeded), 4);
    for p in [&d, &d.join("link"), &other, &other.join("inner.txt")] {
        assert_eq!(owner_of(p).uid, 4242, "{}", p.display());
    }
}
