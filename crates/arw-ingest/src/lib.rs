//! arw-ingest
//!
//! CSV boundary of the workspace: reads the baseline dataset and writes the
//! record tables a run produces. No reconciliation logic lives here.

mod baseline;
mod error;
mod export;
mod fold;

pub use baseline::{load_baseline, read_baseline, BaselineFormat};
pub use error::IngestError;
pub use export::{
    load_fetched, read_fetched, write_mismatches, write_records, write_records_to_path,
    OutputFormat, TableHeaders, FETCHED_HEADERS,
};
pub use fold::ascii_fold;
