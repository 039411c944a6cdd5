use arw_schemas::{Record, REGISTRATION_ID_WIDTH};

/// Trim and left-pad with zeros to [`REGISTRATION_ID_WIDTH`].
///
/// Identifiers already at or beyond the width are returned trimmed but
/// otherwise unchanged.
pub fn normalize_registration_id(raw: &str) -> String {
    let t = raw.trim();
    format!("{t:0>width$}", width = REGISTRATION_ID_WIDTH)
}

/// Strip every literal double quote from a display name.
pub fn normalize_name(raw: &str) -> String {
    raw.replace('"', "")
}

/// Comparison form of a name for mismatch detection: case-folded and trimmed.
pub fn clean_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalized copy of `records`; the input is left untouched so callers keep
/// the raw values for display.
pub fn normalize(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|r| Record {
            registration_id: normalize_registration_id(&r.registration_id),
            name: normalize_name(&r.name),
            address: r.address.clone(),
        })
        .collect()
}
