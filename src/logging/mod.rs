pub mod audit;
pub mod describe;
pub mod facts;
pub mod redact;

pub use audit::{Decision, EventBuilder, Stage, StageLogger};
pub use describe::describe;
pub use facts::{AuditSink, FactsEmitter, JsonlSink, LogSink};
pub use redact::{now_iso, redact_event, TS_ZERO};
