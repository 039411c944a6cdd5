//! arw-reconcile
//!
//! Registry record reconciliation.
//!
//! - Identifiers are trimmed and zero-padded to 8 digits before any comparison
//! - Appeared = fresh ids missing from the baseline
//! - Disappeared = baseline ids missing from the fresh set
//! - Names never decide membership; name drift is an opt-in third category
//!
//! Deterministic, pure logic. No IO. No registry calls.

mod engine;
mod normalize;
mod types;

pub use engine::{diff, name_mismatches, reconcile};
pub use normalize::{clean_name, normalize, normalize_name, normalize_registration_id};
pub use types::*;
