use std::fmt;

/// Errors produced while reading or writing record tables.
#[derive(Debug)]
pub enum IngestError {
    /// Opening, reading or writing a file failed.
    Io(String),
    /// The CSV layer rejected the input or output.
    Csv(String),
    /// The header row lacks a required column.
    MissingColumn(String),
    /// Delimiters must be a single ASCII character.
    InvalidDelimiter(char),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(msg) => write!(f, "io error: {msg}"),
            IngestError::Csv(msg) => write!(f, "csv error: {msg}"),
            IngestError::MissingColumn(col) => {
                write!(f, "csv missing required header column: '{col}'")
            }
            IngestError::InvalidDelimiter(c) => {
                write!(f, "delimiter must be a single ASCII character, got {c:?}")
            }
        }
    }
}

impl std::error::Error for IngestError {}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::Csv(e.to_string())
    }
}

pub(crate) fn delimiter_byte(c: char) -> Result<u8, IngestError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(IngestError::InvalidDelimiter(c))
    }
}
