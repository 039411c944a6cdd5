use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arw_ingest::load_fetched;
use arw_registry::SystemClock;
use arw_runtime::{run_pipeline, FreshSource, PipelineArgs, SubjectSearch};

pub struct ReconcileCmd<'a> {
    pub config_paths: &'a [PathBuf],
    pub baseline: &'a Path,
    pub fetched: Option<&'a Path>,
    pub out_dir: &'a Path,
    pub name_mismatches: bool,
}

/// `arw reconcile`: full pipeline, offline when `--fetched` is given.
pub fn run(cmd: ReconcileCmd<'_>) -> Result<()> {
    let (loaded, mut cfg) = super::load_config(cmd.config_paths)?;
    if cmd.name_mismatches {
        cfg.reconcile.report_name_mismatches = true;
    }

    let args = PipelineArgs {
        config: &cfg,
        config_hash: &loaded.config_hash,
        baseline_path: cmd.baseline,
        out_dir: cmd.out_dir,
    };

    let res = match cmd.fetched {
        Some(path) => {
            let records = load_fetched(path, cfg.output.delimiter)
                .with_context(|| format!("load fetched export failed: {}", path.display()))?;
            run_pipeline(
                args,
                FreshSource::<dyn SubjectSearch>::Provided(records),
                &SystemClock,
            )?
        }
        None => {
            let mut session = super::open_session(&cfg)?;
            run_pipeline(args, FreshSource::Registry(&mut session), &SystemClock)?
        }
    };

    let c = res.summary.counts;
    println!(
        "reconcile_ok=true run_id={} config_hash={}",
        res.summary.run_id, res.summary.config_hash
    );
    println!(
        "fresh={} baseline={} appeared={} disappeared={} renamed={}",
        c.fresh, c.baseline, c.appeared, c.disappeared, c.renamed
    );
    println!("run_dir={}", res.run_dir.display());
    println!("summary_path={}", res.summary_path.display());
    Ok(())
}
