//! Scenario: a 7-digit baseline id and an 8-digit registry id are the same company.
//!
//! Baseline files exported from spreadsheets lose the leading zero of an IČO.
//! After normalization both sides carry `01234567`, so nothing is reported even
//! though the display names differ.

use arw_reconcile::*;
use arw_schemas::Record;

#[test]
fn scenario_padded_and_unpadded_ids_match() {
    let baseline = vec![Record::new("1234567", "Acme")];
    let fresh = vec![Record::new("01234567", "Acme s.r.o.")];

    let r = reconcile(&fresh, &baseline, &ReconcileOptions::default());

    assert!(r.appeared.is_empty());
    assert!(r.disappeared.is_empty());
    assert!(r.is_clean());
}

#[test]
fn scenario_name_difference_is_not_membership_difference() {
    let baseline = vec![Record::new("06881777", "Old Name")];
    let fresh = vec![Record::new("06881777", "Completely New Name")];

    let (appeared, disappeared) = diff(&normalize(&fresh), &normalize(&baseline));
    assert!(appeared.is_empty(), "names must not drive appeared");
    assert!(disappeared.is_empty(), "names must not drive disappeared");
}
