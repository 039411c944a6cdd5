//! Record table writers and the re-readable fetched export.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use arw_reconcile::NameMismatch;
use arw_schemas::Record;
use serde::{Deserialize, Serialize};

use crate::baseline::{clean_header, column_index};
use crate::error::{delimiter_byte, IngestError};
use crate::fold::ascii_fold;

/// Header row of the fetched export, in column order.
pub const FETCHED_HEADERS: [&str; 3] = ["ICO", "Name", "Address"];

/// Layout of the tables a run writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputFormat {
    pub delimiter: char,
    /// Identifier header. When unset, the baseline identifier column name
    /// folded to ASCII is used.
    pub id_header: Option<String>,
    pub name_header: String,
    pub address_header: String,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            id_header: None,
            name_header: "Name".to_string(),
            address_header: "Address".to_string(),
        }
    }
}

impl OutputFormat {
    pub fn headers(&self, baseline_id_column: &str) -> TableHeaders {
        TableHeaders {
            id: self
                .id_header
                .clone()
                .unwrap_or_else(|| ascii_fold(baseline_id_column.trim())),
            name: self.name_header.clone(),
            address: self.address_header.clone(),
        }
    }
}

/// Resolved header labels for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeaders {
    pub id: String,
    pub name: String,
    pub address: String,
}

impl TableHeaders {
    /// Labels of the fetched export.
    pub fn fetched() -> Self {
        let [id, name, address] = FETCHED_HEADERS;
        Self {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
        }
    }
}

fn writer<W: Write>(out: W, delimiter: char) -> Result<csv::Writer<W>, IngestError> {
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .from_writer(out))
}

/// Write `records` as an id/name/address table. The header row is written
/// even when `records` is empty.
pub fn write_records<W: Write>(
    out: W,
    records: &[Record],
    headers: &TableHeaders,
    delimiter: char,
) -> Result<(), IngestError> {
    let mut w = writer(out, delimiter)?;
    w.write_record([&headers.id, &headers.name, &headers.address])?;
    for r in records {
        w.write_record([
            r.registration_id.as_str(),
            r.name.as_str(),
            r.address.as_deref().unwrap_or(""),
        ])?;
    }
    w.flush().map_err(|e| IngestError::Io(e.to_string()))
}

pub fn write_records_to_path(
    path: &Path,
    records: &[Record],
    headers: &TableHeaders,
    delimiter: char,
) -> Result<(), IngestError> {
    let file = File::create(path)
        .map_err(|e| IngestError::Io(format!("create '{}': {e}", path.display())))?;
    write_records(file, records, headers, delimiter)
}

/// Write name mismatches: identifier, both names, fresh address.
pub fn write_mismatches<W: Write>(
    out: W,
    mismatches: &[NameMismatch],
    headers: &TableHeaders,
    delimiter: char,
) -> Result<(), IngestError> {
    let baseline_name = format!("Baseline {}", headers.name);
    let fresh_name = format!("Fresh {}", headers.name);

    let mut w = writer(out, delimiter)?;
    w.write_record([&headers.id, &baseline_name, &fresh_name, &headers.address])?;
    for m in mismatches {
        w.write_record([
            m.registration_id.as_str(),
            m.baseline_name.as_str(),
            m.fresh_name.as_str(),
            m.address.as_deref().unwrap_or(""),
        ])?;
    }
    w.flush().map_err(|e| IngestError::Io(e.to_string()))
}

/// Read a table written with [`TableHeaders::fetched`] back into records.
pub fn read_fetched<R: Read>(src: R, delimiter: char) -> Result<Vec<Record>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .flexible(true)
        .from_reader(src);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(clean_header)
        .collect();
    let [id_col, name_col, addr_col] = FETCHED_HEADERS;
    let id_idx = column_index(&headers, id_col)?;
    let name_idx = column_index(&headers, name_col)?;
    let addr_idx = column_index(&headers, addr_col).ok();

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let id = row.get(id_idx).unwrap_or("").trim();
        if id.is_empty() {
            continue;
        }
        let mut rec = Record::new(id, row.get(name_idx).unwrap_or(""));
        if let Some(a) = addr_idx.and_then(|i| row.get(i)).filter(|a| !a.is_empty()) {
            rec = rec.at(a);
        }
        out.push(rec);
    }
    Ok(out)
}

pub fn load_fetched(path: &Path, delimiter: char) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path)
        .map_err(|e| IngestError::Io(format!("open '{}': {e}", path.display())))?;
    read_fetched(file, delimiter)
}
