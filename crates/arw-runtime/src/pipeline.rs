//! End-to-end run: fresh records, baseline, reconciliation, run directory.
//!
//! Layout of `out_dir` after a run:
//!
//! | File              | Content                                        |
//! |-------------------|------------------------------------------------|
//! | `appeared.csv`    | fresh records absent from the baseline         |
//! | `disappeared.csv` | baseline records absent from the fresh set     |
//! | `fetched.csv`     | the fresh set, re-readable with `--fetched`    |
//! | `renamed.csv`     | name mismatches (only when enabled)            |
//! | `summary.json`    | [`RunSummary`]                                 |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arw_config::AppConfig;
use arw_ingest::{
    load_baseline, write_mismatches, write_records_to_path, TableHeaders,
};
use arw_reconcile::{reconcile, ReconcileCounts, ReconcileReport};
use arw_registry::{Clock, SessionStats, SubjectSearch};
use arw_schemas::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::batch::{run_batch, QueryReport};

pub const SUMMARY_SCHEMA_VERSION: i32 = 1;

/// Where the fresh record set comes from.
pub enum FreshSource<'a, S: ?Sized> {
    /// Run the configured queries against the registry.
    Registry(&'a mut S),
    /// Use records from an earlier export; no network.
    Provided(Vec<Record>),
}

pub struct PipelineArgs<'a> {
    pub config: &'a AppConfig,
    pub config_hash: &'a str,
    pub baseline_path: &'a Path,
    pub out_dir: &'a Path,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactList {
    pub appeared_csv: String,
    pub disappeared_csv: String,
    pub fetched_csv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_csv: Option<String>,
    pub summary_json: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub config_hash: String,
    /// `registry` or `provided`.
    pub fresh_source: String,
    pub counts: ReconcileCounts,
    /// Empty when the fresh set was provided.
    pub queries: Vec<QueryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionStats>,
    pub artifacts: ArtifactList,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub run_dir: PathBuf,
    pub summary_path: PathBuf,
    pub summary: RunSummary,
    pub report: ReconcileReport,
}

/// Write `records` as a fetched export (re-readable by `load_fetched`).
pub fn export_fetched(path: &Path, records: &[Record], config: &AppConfig) -> Result<()> {
    write_records_to_path(path, records, &TableHeaders::fetched(), config.output.delimiter)
        .with_context(|| format!("write fetched export failed: {}", path.display()))
}

pub fn run_pipeline<S, C>(
    args: PipelineArgs<'_>,
    fresh: FreshSource<'_, S>,
    clock: &C,
) -> Result<PipelineResult>
where
    S: SubjectSearch + ?Sized,
    C: Clock + ?Sized,
{
    let cfg = args.config;
    let run_id = Uuid::new_v4();
    info!(%run_id, config_hash = args.config_hash, "run started");

    // Baseline first: a bad path should fail before any network traffic.
    let baseline = load_baseline(args.baseline_path, &cfg.baseline)
        .with_context(|| format!("load baseline failed: {}", args.baseline_path.display()))?;

    let (fresh_source, fresh_records, queries, session) = match fresh {
        FreshSource::Registry(source) => {
            let batch = run_batch(source, &cfg.queries, clock, cfg.batch.pacing());
            ("registry", batch.records, batch.queries, source.stats())
        }
        FreshSource::Provided(records) => ("provided", records, Vec::new(), None),
    };

    let report = reconcile(&fresh_records, &baseline, &cfg.reconcile);
    let counts = report.counts();
    info!(
        fresh = counts.fresh,
        baseline = counts.baseline,
        appeared = counts.appeared,
        disappeared = counts.disappeared,
        renamed = counts.renamed,
        "reconciled"
    );

    let run_dir = args.out_dir.to_path_buf();
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create output dir failed: {}", run_dir.display()))?;

    let headers = cfg.output.headers(&cfg.baseline.id_column);
    let delim = cfg.output.delimiter;

    let artifacts = ArtifactList {
        appeared_csv: "appeared.csv".to_string(),
        disappeared_csv: "disappeared.csv".to_string(),
        fetched_csv: "fetched.csv".to_string(),
        renamed_csv: cfg
            .reconcile
            .report_name_mismatches
            .then(|| "renamed.csv".to_string()),
        summary_json: "summary.json".to_string(),
    };

    write_table(&run_dir.join(&artifacts.appeared_csv), &report.appeared, &headers, delim)?;
    write_table(
        &run_dir.join(&artifacts.disappeared_csv),
        &report.disappeared,
        &headers,
        delim,
    )?;
    export_fetched(&run_dir.join(&artifacts.fetched_csv), &fresh_records, cfg)?;

    if let Some(name) = &artifacts.renamed_csv {
        let path = run_dir.join(name);
        let file = fs::File::create(&path)
            .with_context(|| format!("create failed: {}", path.display()))?;
        write_mismatches(file, &report.renamed, &headers, delim)
            .with_context(|| format!("write failed: {}", path.display()))?;
    }

    let summary = RunSummary {
        schema_version: SUMMARY_SCHEMA_VERSION,
        run_id,
        created_at_utc: clock.now(),
        config_hash: args.config_hash.to_string(),
        fresh_source: fresh_source.to_string(),
        counts,
        queries,
        session,
        artifacts,
    };

    let summary_path = run_dir.join(&summary.artifacts.summary_json);
    let json = serde_json::to_string_pretty(&summary).context("serialize summary failed")?;
    fs::write(&summary_path, format!("{json}\n"))
        .with_context(|| format!("write summary failed: {}", summary_path.display()))?;

    info!(%run_id, dir = %run_dir.display(), "run finished");
    Ok(PipelineResult {
        run_dir,
        summary_path,
        summary,
        report,
    })
}

fn write_table(path: &Path, records: &[Record], headers: &TableHeaders, delim: char) -> Result<()> {
    write_records_to_path(path, records, headers, delim)
        .with_context(|| format!("write failed: {}", path.display()))
}
