//! Scenario: a baseline exported from a spreadsheet (UTF-8 BOM, `;`
//! delimiter, Czech headers) loads from disk, and tables written from it carry
//! ASCII headers.

use std::fs;
use std::io::Write;

use arw_ingest::*;
use arw_schemas::Record;

const BASELINE: &str = "\u{feff}IČO;Název;Adresa\n\
                        1234567;\"Acme\";1442/1b\n\
                        06881777;Alfa s.r.o.;1138/1\n";

#[test]
fn scenario_bom_baseline_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("baseline.csv");
    fs::File::create(&path)
        .unwrap()
        .write_all(BASELINE.as_bytes())
        .unwrap();

    let recs = load_baseline(&path, &BaselineFormat::default()).unwrap();
    assert_eq!(
        recs,
        vec![
            Record::new("1234567", "Acme"),
            Record::new("06881777", "Alfa s.r.o."),
        ]
    );
}

#[test]
fn scenario_missing_identifier_column_names_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("baseline.csv");
    fs::write(&path, "Firma;Název\nx;y\n").unwrap();

    let err = load_baseline(&path, &BaselineFormat::default()).unwrap_err();
    assert!(err.to_string().contains("IČO"), "got: {err}");
}

#[test]
fn scenario_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_baseline(&dir.path().join("nope.csv"), &BaselineFormat::default()).unwrap_err();
    assert!(matches!(err, IngestError::Io(_)));
}

#[test]
fn scenario_output_headers_are_ascii() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appeared.csv");
    let headers = OutputFormat::default().headers(&BaselineFormat::default().id_column);

    write_records_to_path(&path, &[Record::new("00000001", "X")], &headers, ',').unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let header_line = text.lines().next().unwrap();
    assert_eq!(header_line, "ICO,Name,Address");
    assert!(header_line.is_ascii());
}
