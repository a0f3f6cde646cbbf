use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

#[must_use]
pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Apply redactions to a fact event for comparison and safe logging.
/// Zeroes timestamps to TS_ZERO and removes fields that vary between identical runs.
#[must_use]
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        // run_id is random per run; request_id stays for correlation
        obj.remove("run_id");
        // Identities depend on the filesystem the run happened on
        obj.remove("dev");
        obj.remove("ino");
        if let Some(before) = obj.get_mut("before") {
            if let Some(bobj) = before.as_object_mut() {
                bobj.insert("uid".into(), Value::String("***".into()));
                bobj.insert("gid".into(), Value::String("***".into()));
            }
        }
    }
    v
}
