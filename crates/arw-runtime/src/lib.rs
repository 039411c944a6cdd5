//! arw-runtime
//!
//! Orchestration on top of the library crates:
//! - [`run_batch`] walks the configured queries through a [`SubjectSearch`]
//! - [`run_pipeline`] fetches (or takes an export), reconciles against the
//!   baseline and writes the run directory

mod batch;
mod pipeline;

pub use arw_registry::SubjectSearch;
pub use batch::{run_batch, BatchReport, QueryOutcome, QueryReport};
pub use pipeline::{
    export_fetched, run_pipeline, ArtifactList, FreshSource, PipelineArgs, PipelineResult,
    RunSummary, SUMMARY_SCHEMA_VERSION,
};
