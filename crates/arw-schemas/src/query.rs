//! Validated address query.
//!
//! A [`Query`] names exactly one building entry in the registry's address
//! model plus the paging window for the search. It is immutable once built:
//! fields are private and every constructor validates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wire::SearchPayload;

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Largest page the registry accepts in a single search.
pub const MAX_PAGE_SIZE: u32 = 1000;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Reasons a query fails construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A numeric field that must be positive was zero.
    NonPositive { field: &'static str },
    /// The orientation suffix is not a single ASCII letter.
    InvalidLetter(String),
    /// A suffix letter was supplied without an orientation number.
    LetterWithoutOrientation,
    /// Page size outside `1..=MAX_PAGE_SIZE`.
    PageSizeOutOfRange(u32),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::NonPositive { field } => write!(f, "query field '{field}' must be > 0"),
            QueryError::InvalidLetter(raw) => write!(
                f,
                "orientation letter must be a single ASCII letter, got '{raw}'"
            ),
            QueryError::LetterWithoutOrientation => {
                write!(f, "orientation letter requires an orientation number")
            }
            QueryError::PageSizeOutOfRange(n) => {
                write!(f, "page size {n} out of range 1..={MAX_PAGE_SIZE}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

fn positive(value: u32, field: &'static str) -> Result<u32, QueryError> {
    if value == 0 {
        Err(QueryError::NonPositive { field })
    } else {
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Building address
// ---------------------------------------------------------------------------

/// Structured building descriptor as the registry models a seat address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingAddress {
    building_number: u32,
    orientation_number: Option<u32>,
    orientation_letter: Option<char>,
    municipality_code: u32,
    district_code: u32,
    street_code: u32,
}

impl BuildingAddress {
    pub fn new(
        building_number: u32,
        municipality_code: u32,
        district_code: u32,
        street_code: u32,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            building_number: positive(building_number, "building_number")?,
            orientation_number: None,
            orientation_letter: None,
            municipality_code: positive(municipality_code, "municipality_code")?,
            district_code: positive(district_code, "district_code")?,
            street_code: positive(street_code, "street_code")?,
        })
    }

    /// Attach the orientation number and its optional suffix letter.
    pub fn with_orientation(mut self, number: u32, letter: Option<char>) -> Result<Self, QueryError> {
        self.orientation_number = Some(positive(number, "orientation_number")?);
        self.orientation_letter = match letter {
            Some(c) if c.is_ascii_alphabetic() => Some(c),
            Some(c) => return Err(QueryError::InvalidLetter(c.to_string())),
            None => None,
        };
        Ok(self)
    }

    pub fn building_number(&self) -> u32 {
        self.building_number
    }

    pub fn orientation_number(&self) -> Option<u32> {
        self.orientation_number
    }

    pub fn orientation_letter(&self) -> Option<char> {
        self.orientation_letter
    }

    pub fn municipality_code(&self) -> u32 {
        self.municipality_code
    }

    pub fn district_code(&self) -> u32 {
        self.district_code
    }

    pub fn street_code(&self) -> u32 {
        self.street_code
    }

    /// Short human label: `1442/1b`, `1138/1`, or just `266`.
    pub fn label(&self) -> String {
        let mut s = self.building_number.to_string();
        if let Some(n) = self.orientation_number {
            s.push('/');
            s.push_str(&n.to_string());
            if let Some(c) = self.orientation_letter {
                s.push(c);
            }
        }
        s
    }
}

impl fmt::Display for BuildingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Config-facing, unvalidated form of a [`Query`].
///
/// This is what YAML configuration deserializes into; [`Query`] is built from
/// it through `TryFrom`, which is where validation happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySpec {
    pub building_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_letter: Option<String>,
    pub municipality_code: u32,
    pub district_code: u32,
    pub street_code: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub ordering: Vec<String>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// One address lookup: building descriptor + paging + ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuerySpec", into = "QuerySpec")]
pub struct Query {
    address: BuildingAddress,
    page_size: u32,
    start: u32,
    ordering: Vec<String>,
}

impl Query {
    /// First page of results with the default page size and no ordering.
    pub fn new(address: BuildingAddress) -> Self {
        Self {
            address,
            page_size: DEFAULT_PAGE_SIZE,
            start: 0,
            ordering: Vec::new(),
        }
    }

    pub fn with_page(mut self, page_size: u32, start: u32) -> Result<Self, QueryError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(QueryError::PageSizeOutOfRange(page_size));
        }
        self.page_size = page_size;
        self.start = start;
        Ok(self)
    }

    pub fn with_ordering(mut self, ordering: Vec<String>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn address(&self) -> &BuildingAddress {
        &self.address
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    /// Address label used as the `address` of every record this query yields.
    pub fn label(&self) -> String {
        self.address.label()
    }

    /// Search endpoint body for this query.
    pub fn payload(&self) -> SearchPayload<'_> {
        SearchPayload::from_query(self)
    }
}

impl TryFrom<QuerySpec> for Query {
    type Error = QueryError;

    fn try_from(spec: QuerySpec) -> Result<Self, Self::Error> {
        let mut address = BuildingAddress::new(
            spec.building_number,
            spec.municipality_code,
            spec.district_code,
            spec.street_code,
        )?;

        let letter = match spec.orientation_letter.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => return Err(QueryError::InvalidLetter(raw.to_string())),
                }
            }
        };

        match (spec.orientation_number, letter) {
            (Some(n), letter) => address = address.with_orientation(n, letter)?,
            (None, Some(_)) => return Err(QueryError::LetterWithoutOrientation),
            (None, None) => {}
        }

        Ok(Query::new(address)
            .with_page(spec.page_size, spec.start)?
            .with_ordering(spec.ordering))
    }
}

impl From<Query> for QuerySpec {
    fn from(q: Query) -> Self {
        QuerySpec {
            building_number: q.address.building_number,
            orientation_number: q.address.orientation_number,
            orientation_letter: q.address.orientation_letter.map(|c| c.to_string()),
            municipality_code: q.address.municipality_code,
            district_code: q.address.district_code,
            street_code: q.address.street_code,
            page_size: q.page_size,
            start: q.start,
            ordering: q.ordering,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> QuerySpec {
        QuerySpec {
            building_number: 1442,
            orientation_number: Some(1),
            orientation_letter: Some("b".to_string()),
            municipality_code: 554782,
            district_code: 500119,
            street_code: 478652,
            page_size: DEFAULT_PAGE_SIZE,
            start: 0,
            ordering: Vec::new(),
        }
    }

    #[test]
    fn label_includes_orientation_and_letter() {
        let q = Query::try_from(spec()).unwrap();
        assert_eq!(q.label(), "1442/1b");
    }

    #[test]
    fn label_without_orientation_is_building_number_only() {
        let addr = BuildingAddress::new(266, 554782, 500119, 730700).unwrap();
        assert_eq!(addr.label(), "266");
    }

    #[test]
    fn zero_codes_are_rejected() {
        let mut s = spec();
        s.street_code = 0;
        assert_eq!(
            Query::try_from(s).unwrap_err(),
            QueryError::NonPositive {
                field: "street_code"
            }
        );
    }

    #[test]
    fn letter_requires_orientation_number() {
        let mut s = spec();
        s.orientation_number = None;
        assert_eq!(
            Query::try_from(s).unwrap_err(),
            QueryError::LetterWithoutOrientation
        );
    }

    #[test]
    fn multi_char_letter_rejected() {
        let mut s = spec();
        s.orientation_letter = Some("ab".to_string());
        assert!(matches!(
            Query::try_from(s),
            Err(QueryError::InvalidLetter(_))
        ));
    }

    #[test]
    fn blank_letter_treated_as_absent() {
        let mut s = spec();
        s.orientation_letter = Some("  ".to_string());
        let q = Query::try_from(s).unwrap();
        assert_eq!(q.address().orientation_letter(), None);
    }

    #[test]
    fn page_size_bounds() {
        let addr = BuildingAddress::new(1, 1, 1, 1).unwrap();
        assert!(Query::new(addr.clone()).with_page(0, 0).is_err());
        assert!(Query::new(addr.clone()).with_page(MAX_PAGE_SIZE + 1, 0).is_err());
        assert!(Query::new(addr).with_page(MAX_PAGE_SIZE, 400).is_ok());
    }

    #[test]
    fn spec_roundtrip_through_yaml_shape() {
        let q = Query::try_from(spec()).unwrap();
        let back: QuerySpec = q.clone().into();
        assert_eq!(Query::try_from(back).unwrap(), q);
    }
}
