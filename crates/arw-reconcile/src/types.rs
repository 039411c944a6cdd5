use arw_schemas::Record;
use serde::{Deserialize, Serialize};

/// Switches for [`crate::reconcile`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileOptions {
    /// Also report records whose identifier matches but whose name differs.
    /// Off by default; never affects `appeared` / `disappeared`.
    #[serde(default)]
    pub report_name_mismatches: bool,
}

/// Same registration identifier on both sides, different display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NameMismatch {
    pub registration_id: String,
    pub baseline_name: String,
    pub fresh_name: String,
    /// Address of the fresh record, if known.
    pub address: Option<String>,
}

/// Outcome of reconciling a fresh record set against a baseline.
///
/// All record lists hold normalized records and follow the order of the input
/// they were drawn from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub fresh_total: usize,
    pub baseline_total: usize,
    /// Fresh records whose identifier is absent from the baseline.
    pub appeared: Vec<Record>,
    /// Baseline records whose identifier is absent from the fresh set.
    pub disappeared: Vec<Record>,
    /// Empty unless name-mismatch reporting was requested.
    pub renamed: Vec<NameMismatch>,
}

impl ReconcileReport {
    /// No appeared, disappeared or renamed entries.
    pub fn is_clean(&self) -> bool {
        self.appeared.is_empty() && self.disappeared.is_empty() && self.renamed.is_empty()
    }

    pub fn counts(&self) -> ReconcileCounts {
        ReconcileCounts {
            fresh: self.fresh_total,
            baseline: self.baseline_total,
            appeared: self.appeared.len(),
            disappeared: self.disappeared.len(),
            renamed: self.renamed.len(),
        }
    }
}

/// Size summary of a [`ReconcileReport`], for logs and run summaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileCounts {
    pub fresh: usize,
    pub baseline: usize,
    pub appeared: usize,
    pub disappeared: usize,
    pub renamed: usize,
}
