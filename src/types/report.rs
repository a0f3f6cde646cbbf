use serde::Serialize;
use uuid::Uuid;

use super::outcome::{ChangeOutcome, EntryRecord};

/// Aggregate result of a run over one or more traversal roots.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    /// True iff no visited entry failed.
    pub ok: bool,
    pub entries: Vec<EntryRecord>,
    pub warnings: Vec<String>,
    pub run_id: Option<Uuid>,
    pub duration_ms: u64,
}

impl RunReport {
    /// Number of entries whose outcome equals `outcome`.
    #[must_use]
    pub fn count(&self, outcome: ChangeOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryRecord> {
        self.entries.iter().filter(|e| e.is_failure())
    }
}
