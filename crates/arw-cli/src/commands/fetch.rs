use std::path::{Path, PathBuf};

use anyhow::Result;
use arw_registry::SystemClock;
use arw_runtime::{export_fetched, run_batch};
use tracing::{info, warn};

/// `arw fetch`: run every configured query and export what came back.
pub fn run(config_paths: &[PathBuf], out: &Path) -> Result<()> {
    let (loaded, cfg) = super::load_config(config_paths)?;
    if cfg.queries.is_empty() {
        warn!("no queries configured; export will be empty");
    }

    let mut session = super::open_session(&cfg)?;
    let report = run_batch(&mut session, &cfg.queries, &SystemClock, cfg.batch.pacing());
    let stats = session.stats();
    info!(?stats, "session finished");

    export_fetched(out, &report.records, &cfg)?;

    println!("fetch_ok=true config_hash={}", loaded.config_hash);
    println!(
        "queries={} no_result={} records={}",
        report.queries.len(),
        report.no_result_count(),
        report.records.len()
    );
    println!("out={}", out.display());
    Ok(())
}
