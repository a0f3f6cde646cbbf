use log::Level;
use serde_json::Value;

/// Receives structured facts, one per stage event.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-readable diagnostic lines.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Discards everything; the default for library use and tests.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Forwards facts and diagnostics to the `log` facade.
///
/// Facts are logged at `debug` under the `chownyard::facts` target as one JSON
/// object per line; diagnostics keep their level under the `chownyard` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl FactsEmitter for LogSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        log::debug!(target: "chownyard::facts", "{subsystem} {event} {decision} {fields}");
    }
}

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "chownyard", level, "{msg}");
    }
}
