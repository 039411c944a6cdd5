use std::time::Duration;

use arw_registry::{Clock, SearchOutcome, SubjectSearch};
use arw_schemas::{Query, Record};
use serde::Serialize;
use tracing::{info, warn};

/// What happened to one query of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Found { count: usize },
    NoResult { attempts: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryReport {
    /// Address label of the query.
    pub address: String,
    #[serde(flatten)]
    pub outcome: QueryOutcome,
}

/// Records accumulated over a batch plus one report per query, both in
/// query order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub records: Vec<Record>,
    pub queries: Vec<QueryReport>,
}

impl BatchReport {
    pub fn no_result_count(&self) -> usize {
        self.queries
            .iter()
            .filter(|q| matches!(q.outcome, QueryOutcome::NoResult { .. }))
            .count()
    }
}

/// Issue `queries` one at a time, waiting `pacing` between consecutive
/// queries (never after the last).
///
/// A query without result is logged and skipped; it never aborts the batch.
/// Records keep query order and are not deduplicated.
pub fn run_batch<S, C>(source: &mut S, queries: &[Query], clock: &C, pacing: Duration) -> BatchReport
where
    S: SubjectSearch + ?Sized,
    C: Clock + ?Sized,
{
    let mut report = BatchReport::default();

    for (i, query) in queries.iter().enumerate() {
        if i > 0 && !pacing.is_zero() {
            clock.sleep(pacing);
        }

        let address = query.label();
        let outcome = match source.search(query) {
            SearchOutcome::Found { subjects, .. } => {
                let count = subjects.len();
                info!(%address, count, "query done");
                report
                    .records
                    .extend(subjects.into_iter().map(|s| s.into_record(&address)));
                QueryOutcome::Found { count }
            }
            SearchOutcome::NoResult {
                attempts,
                last_failure,
            } => {
                warn!(%address, attempts, %last_failure, "query yielded no result; skipping");
                QueryOutcome::NoResult { attempts }
            }
        };
        report.queries.push(QueryReport { address, outcome });
    }

    info!(
        queries = report.queries.len(),
        records = report.records.len(),
        no_result = report.no_result_count(),
        "batch finished"
    );
    report
}
