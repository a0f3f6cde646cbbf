//! Structured facts emitted across a run.

use chownyard::constants::SUBSYSTEM;
use chownyard::logging::redact_event;
use chownyard::policy::Policy;
use chownyard::types::{OwnershipFilter, OwnershipSpec};

use crate::helpers::{api, me, recursive};

#[test]
fn run_emits_attempt_entries_and_result_in_order() {
    let td = tempfile::tempdir().unwrap();
    let d = td.path().join("d");
    std::fs::create_dir(&d).unwrap();
    std::fs::write(d.join("a"), b"a").unwrap();
    let who = me(&td);
    let (api, facts, _) = api(recursive(Policy::default()));

    let report = api
        .run(&d, &OwnershipSpec::new(Some(who.uid), None), &OwnershipFilter::default())
        .unwrap();

    let events = facts.events.lock().unwrap().clone();
    let names: Vec<&str> = events.iter().map(|(_, e, _, _)| e.as_str()).collect();
    assert_eq!(names, vec!["run.attempt", "entry.result", "entry.result", "run.result"]);
    assert!(events.iter().all(|(s, _, _, _)| s == SUBSYSTEM));

    let run_id = report.run_id.unwrap().to_string();
    for (_, _, _, f) in &events {
        assert_eq!(f["schema_version"], 1);
        assert_eq!(f["run_id"], run_id.as_str());
        assert!(f["request_id"].is_string());
        assert!(f["ts"].is_string());
    }

    let entry = &events[2].3;
    assert_eq!(entry["path"], d.join("a").display().to_string());
    assert_eq!(entry["outcome"], "no_change_requested");
    assert_eq!(entry["kind"], "file");
    assert_eq!(entry["before"]["uid"], who.uid);

    let (_, _, decision, result) = &events[3];
    assert_eq!(decision, "success");
    assert_eq!(result["entries"], 2);
    assert_eq!(result["failed"], 0);
    assert_eq!(events[0].3["policy"]["recursive"], true);
    assert_eq!(events[0].3["policy"]["traversal"], "no_follow");
}

#[test]
fn request_id_is_stable_and_run_id_is_not() {
    let td = tempfile::tempdir().unwrap();
    let f = td.path().join("f");
    std::fs::write(&f, b"f").unwrap();
    let who = me(&td);
    let spec = OwnershipSpec::new(Some(who.uid), None);
    let (api, facts, _) = api(Policy::default());

    let first = api.run(&f, &spec, &OwnershipFilter::default()).unwrap();
    let second = api.run(&f, &spec, &OwnershipFilter::default()).unwrap();
    assert_ne!(first.run_id, second.run_id);

    let attempts = facts.named("run.attempt");
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["request_id"], attempts[1]["request_id"]);
}

#[test]
fn failed_entry_carries_error_id_and_redacts_cleanly() {
    let td = tempfile::tempdir().unwrap();
    let missing = td.path().join("missing");
    let (api, facts, _) = api(Policy::default());

    let report = api
        .run(&missing, &OwnershipSpec::new(Some(0), None), &OwnershipFilter::default())
        .unwrap();
    assert!(!report.ok);

    let events = facts.events.lock().unwrap().clone();
    let (_, _, decision, entry) = events
        .iter()
        .find(|(_, e, _, _)| e == "entry.result")
        .unwrap()
        .clone();
    assert_eq!(decision, "failure");
    assert_eq!(entry["error_id"], "E_IO");
    let (_, _, decision, _) = events.last().unwrap();
    assert_eq!(decision, "failure");

    let redacted = redact_event(entry);
    assert_eq!(redacted["ts"], "1970-01-01T00:00:00Z");
    assert!(redacted.get("run_id").is_none());
    assert_eq!(redacted["error_id"], "E_IO");
}
