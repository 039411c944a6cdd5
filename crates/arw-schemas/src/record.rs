use serde::{Deserialize, Serialize};

/// Canonical width of a registration identifier (IČO) after zero padding.
pub const REGISTRATION_ID_WIDTH: usize = 8;

/// A company observed at an address, either fetched from the registry or read
/// from the baseline dataset.
///
/// `registration_id` is the comparison key across datasets. It is kept as read
/// here; padding to [`REGISTRATION_ID_WIDTH`] happens in the reconciler's
/// normalization pass so the raw value stays available for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub registration_id: String,
    pub name: String,
    /// Address label of the query that produced this record. Baseline rows
    /// without an address column leave it empty.
    #[serde(default)]
    pub address: Option<String>,
}

impl Record {
    pub fn new(registration_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            registration_id: registration_id.into(),
            name: name.into(),
            address: None,
        }
    }

    pub fn at(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
