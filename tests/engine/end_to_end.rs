//! Recursive walk order and aggregate result.

use chownyard::policy::Policy;
use chownyard::types::{ChangeOutcome, OwnershipFilter, OwnershipSpec};

use crate::helpers::{api, is_root, me, owner_of, paths, recursive};

fn tree(td: &tempfile::TempDir) -> std::path::PathBuf {
    let d = td.path().join("d");
    std::fs::create_dir_all(d.join("c")).unwrap();
    std::fs::write(d.join("b.txt"), b"b").unwrap();
    std::fs::write(d.join("a.txt"), b"a").unwrap();
    std::fs::write(d.join("c/z.txt"), b"z").unwrap();
    d
}

#[test]
fn recursive_run_is_preorder_and_lexicographic() {
    let td = tempfile::tempdir().unwrap();
    let d = tree(&td);
    let who = me(&td);
    let (api, _, _) = api(recursive(Policy::default()));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    assert_eq!(
        paths(&report),
        vec![
            d.clone(),
            d.join("a.txt"),
            d.join("b.txt"),
            d.join("c"),
            d.join("c/z.txt"),
        ]
    );
    assert!(report.ok);
    assert_eq!(report.failures().count(), 0);
    // Already owned by the caller, so nothing differs afterwards.
    assert_eq!(report.count(ChangeOutcome::NoChangeRequested), 5);
    assert_eq!(owner_of(&d.join("c/z.txt")), who);
    assert!(report.run_id.is_some());
}

#[test]
fn non_recursive_run_touches_only_the_root() {
    let td = tempfile::tempdir().unwrap();
    let d = tree(&td);
    let who = me(&td);
    let (api, _, _) = api(Policy::default());

    let report = api
        .run(&d, &OwnershipSpec::new(None, Some(who.gid)), &OwnershipFilter::default())
        .unwrap();

    assert_eq!(paths(&report), vec![d]);
    assert!(report.ok);
    assert_eq!(report.entries[0].before, Some(who));
}

#[test]
fn run_all_aggregates_roots_in_order() {
    let td = tempfile::tempdir().unwrap();
    let x = td.path().join("x");
    let y = td.path().join("y");
    std::fs::write(&x, b"x").unwrap();
    std::fs::write(&y, b"y").unwrap();
    let who = me(&td);
    let (api, _, _) = api(Policy::default());

    let report = api
        .run_all(
            &[y.clone(), x.clone()],
            &OwnershipSpec::new(Some(who.uid), Some(who.gid)),
            &OwnershipFilter::default(),
        )
        .unwrap();

    assert_eq!(paths(&report), vec![y, x]);
    assert!(report.ok);
}

#[test]
fn empty_spec_changes_nothing_but_still_visits() {
    let td = tempfile::tempdir().unwrap();
    let d = tree(&td);
    let (api, _, _) = api(recursive(Policy::default()));

    let report = api
        .run(&d, &OwnershipSpec::default(), &OwnershipFilter::default())
        .unwrap();

    assert_eq!(report.entries.len(), 5);
    assert!(report
        .entries
        .iter()
        .all(|e| e.outcome == ChangeOutcome::NoChangeRequested));
}

#[test]
fn recursive_run_to_another_owner_changes_every_entry() {
    let td = tempfile::tempdir().unwrap();
    if !is_root(&td) {
        // only root may give files away
        return;
    }
    let d = tree(&td);
    let (api, _, _) = api(recursive(Policy::default()));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(4242), Some(4343)), &OwnershipFilter::default())
        .unwrap();

    assert!(report.ok);
    assert_eq!(report.count(ChangeOutcome::Succeeded), 5);
    for p in paths(&report) {
        let now = owner_of(&p);
        assert_eq!((now.uid, now.gid), (4242, 4343), "{}", p.display());
    }
    assert_eq!(report.entries[0].before.map(|b| b.uid), Some(0));
}
