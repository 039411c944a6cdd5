//! Baseline dataset reader.
//!
//! The baseline is a delimited table with a header row. Only the identifier,
//! name and (optionally) address columns are read; every other column is
//! ignored. Header names are matched after stripping a UTF-8 BOM and
//! surrounding whitespace; a header that only differs by diacritics or case
//! (`ICO` for `IČO`) also matches.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use arw_schemas::Record;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{delimiter_byte, IngestError};
use crate::fold::ascii_fold;

const BOM: char = '\u{feff}';

/// Column layout of the baseline table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BaselineFormat {
    pub delimiter: char,
    pub id_column: String,
    pub name_column: String,
    /// Read into `Record::address` when set.
    pub address_column: Option<String>,
}

impl Default for BaselineFormat {
    fn default() -> Self {
        Self {
            delimiter: ';',
            id_column: "IČO".to_string(),
            name_column: "Název".to_string(),
            address_column: None,
        }
    }
}

/// Read baseline records from `path`.
pub fn load_baseline(path: &Path, format: &BaselineFormat) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path)
        .map_err(|e| IngestError::Io(format!("open '{}': {e}", path.display())))?;
    read_baseline(file, format)
}

/// Read baseline records from any reader.
///
/// Rows whose identifier cell is empty are skipped. Short rows read missing
/// cells as empty.
pub fn read_baseline<R: Read>(src: R, format: &BaselineFormat) -> Result<Vec<Record>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(format.delimiter)?)
        .flexible(true)
        .from_reader(src);

    let headers: Vec<String> = rdr.headers()?.iter().map(clean_header).collect();

    let id_idx = column_index(&headers, &format.id_column)?;
    let name_idx = column_index(&headers, &format.name_column)?;
    let addr_idx = format
        .address_column
        .as_deref()
        .map(|c| column_index(&headers, c))
        .transpose()?;

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for row in rdr.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("");

        let id = cell(id_idx).trim();
        if id.is_empty() {
            skipped += 1;
            continue;
        }

        let mut rec = Record::new(id, cell(name_idx));
        if let Some(i) = addr_idx {
            let a = cell(i).trim();
            if !a.is_empty() {
                rec = rec.at(a);
            }
        }
        out.push(rec);
    }

    debug!(rows = out.len(), skipped, "baseline read");
    Ok(out)
}

pub(crate) fn clean_header(h: &str) -> String {
    h.trim_start_matches(BOM).trim().to_string()
}

/// Exact match first, then a diacritic- and case-insensitive match.
pub(crate) fn column_index(headers: &[String], wanted: &str) -> Result<usize, IngestError> {
    let wanted = wanted.trim();
    if let Some(i) = headers.iter().position(|h| h == wanted) {
        return Ok(i);
    }
    let folded = ascii_fold(wanted);
    headers
        .iter()
        .position(|h| ascii_fold(h).eq_ignore_ascii_case(&folded))
        .ok_or_else(|| IngestError::MissingColumn(wanted.to_string()))
}
