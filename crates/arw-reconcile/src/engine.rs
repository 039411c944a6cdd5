use std::collections::{BTreeMap, BTreeSet};

use arw_schemas::Record;

use crate::normalize::{clean_name, normalize, normalize_name, normalize_registration_id};
use crate::{NameMismatch, ReconcileOptions, ReconcileReport};

fn id_set(records: &[Record]) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| normalize_registration_id(&r.registration_id))
        .collect()
}

fn missing_from(records: &[Record], other_ids: &BTreeSet<String>) -> Vec<Record> {
    records
        .iter()
        .filter(|r| !other_ids.contains(&normalize_registration_id(&r.registration_id)))
        .cloned()
        .collect()
}

/// Identifier-only set difference: `(appeared, disappeared)`.
///
/// Keys are compared in normalized form, so raw and normalized inputs give the
/// same membership. Returned records are the input records as given, in input
/// order, duplicates kept.
pub fn diff(fresh: &[Record], baseline: &[Record]) -> (Vec<Record>, Vec<Record>) {
    let fresh_ids = id_set(fresh);
    let baseline_ids = id_set(baseline);

    let appeared = missing_from(fresh, &baseline_ids);
    let disappeared = missing_from(baseline, &fresh_ids);
    (appeared, disappeared)
}

/// Pairs sharing an identifier whose names differ after quote stripping,
/// case folding and trimming.
///
/// Ordered by baseline position, then fresh position within the same id.
pub fn name_mismatches(fresh: &[Record], baseline: &[Record]) -> Vec<NameMismatch> {
    let mut fresh_by_id: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for r in fresh {
        fresh_by_id
            .entry(normalize_registration_id(&r.registration_id))
            .or_default()
            .push(r);
    }

    let mut out = Vec::new();
    for b in baseline {
        let id = normalize_registration_id(&b.registration_id);
        let Some(matches) = fresh_by_id.get(&id) else {
            continue;
        };
        let b_clean = clean_name(&normalize_name(&b.name));
        for f in matches {
            if clean_name(&normalize_name(&f.name)) != b_clean {
                out.push(NameMismatch {
                    registration_id: id.clone(),
                    baseline_name: b.name.clone(),
                    fresh_name: f.name.clone(),
                    address: f.address.clone(),
                });
            }
        }
    }
    out
}

/// Normalize both sides, then diff them.
///
/// `renamed` is only populated when `opts.report_name_mismatches` is set.
pub fn reconcile(fresh: &[Record], baseline: &[Record], opts: &ReconcileOptions) -> ReconcileReport {
    let fresh = normalize(fresh);
    let baseline = normalize(baseline);

    let (appeared, disappeared) = diff(&fresh, &baseline);
    let renamed = if opts.report_name_mismatches {
        name_mismatches(&fresh, &baseline)
    } else {
        Vec::new()
    };

    ReconcileReport {
        fresh_total: fresh.len(),
        baseline_total: baseline.len(),
        appeared,
        disappeared,
        renamed,
    }
}
