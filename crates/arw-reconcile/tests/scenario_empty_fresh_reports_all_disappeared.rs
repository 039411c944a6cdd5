//! Scenario: the registry returned nothing, so every baseline company is gone.
//!
//! The disappeared list carries the normalized record (padded id), not the raw
//! baseline row.

use arw_reconcile::*;
use arw_schemas::Record;

#[test]
fn scenario_empty_fresh_set() {
    let baseline = vec![Record::new("1", "X")];
    let fresh: Vec<Record> = Vec::new();

    let r = reconcile(&fresh, &baseline, &ReconcileOptions::default());

    assert!(r.appeared.is_empty());
    assert_eq!(r.disappeared, vec![Record::new("00000001", "X")]);
    assert_eq!(r.counts().baseline, 1);
    assert_eq!(r.counts().fresh, 0);
}

#[test]
fn scenario_empty_baseline_reports_all_appeared_in_fetch_order() {
    let fresh = vec![
        Record::new("2", "B").at("1138/1"),
        Record::new("1", "A").at("1442/1b"),
    ];

    let r = reconcile(&fresh, &[], &ReconcileOptions::default());

    let ids: Vec<&str> = r.appeared.iter().map(|x| x.registration_id.as_str()).collect();
    assert_eq!(ids, vec!["00000002", "00000001"]);
    assert_eq!(r.appeared[0].address.as_deref(), Some("1138/1"));
    assert!(r.disappeared.is_empty());
}
