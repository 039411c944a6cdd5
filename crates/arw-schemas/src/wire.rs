//! Registry wire shapes for the economic-subject search endpoint.
//!
//! Field names on the wire are Czech; Rust-side names are English and mapped
//! with `serde(rename)`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::query::Query;
use crate::record::Record;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// The `sidlo` (seat) object of a search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatPayload {
    #[serde(rename = "cisloDomovni")]
    pub building_number: u32,
    #[serde(rename = "cisloOrientacni", skip_serializing_if = "Option::is_none")]
    pub orientation_number: Option<u32>,
    #[serde(
        rename = "cisloOrientacniPismeno",
        skip_serializing_if = "Option::is_none"
    )]
    pub orientation_letter: Option<String>,
    #[serde(rename = "kodObce")]
    pub municipality_code: u32,
    #[serde(rename = "kodMestskeCastiObvodu")]
    pub district_code: u32,
    #[serde(rename = "kodUlice")]
    pub street_code: u32,
}

/// Full search request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPayload<'a> {
    #[serde(rename = "sidlo")]
    pub seat: SeatPayload,
    #[serde(rename = "pocet")]
    pub page_size: u32,
    pub start: u32,
    #[serde(rename = "razeni")]
    pub ordering: &'a [String],
}

impl<'a> SearchPayload<'a> {
    pub fn from_query(q: &'a Query) -> Self {
        let addr = q.address();
        SearchPayload {
            seat: SeatPayload {
                building_number: addr.building_number(),
                orientation_number: addr.orientation_number(),
                orientation_letter: addr.orientation_letter().map(|c| c.to_string()),
                municipality_code: addr.municipality_code(),
                district_code: addr.district_code(),
                street_code: addr.street_code(),
            },
            page_size: q.page_size(),
            start: q.start(),
            ordering: q.ordering(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Decoded body of a successful search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "pocetCelkem", default)]
    pub total: Option<u64>,
    #[serde(rename = "ekonomickeSubjekty", default)]
    pub subjects: Vec<Subject>,
}

/// One economic subject in a search response. Only the fields the
/// reconciliation needs are decoded; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subject {
    #[serde(rename = "obchodniJmeno", default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ico: String,
}

impl Subject {
    pub fn into_record(self, address: &str) -> Record {
        Record::new(self.ico, self.name).at(address)
    }
}

// The registry sends `ico` as a string, but older payloads and fixtures carry
// a bare number.
fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

// A subject without a trade name is still a subject.
fn string_or_null<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{BuildingAddress, Query};

    #[test]
    fn payload_matches_registry_shape() {
        let addr = BuildingAddress::new(1442, 554782, 500119, 478652)
            .unwrap()
            .with_orientation(1, Some('b'))
            .unwrap();
        let q = Query::new(addr);

        let v: Value = serde_json::from_str(&q.payload().to_json().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "sidlo": {
                    "cisloDomovni": 1442,
                    "cisloOrientacni": 1,
                    "cisloOrientacniPismeno": "b",
                    "kodObce": 554782,
                    "kodMestskeCastiObvodu": 500119,
                    "kodUlice": 478652
                },
                "pocet": 200,
                "start": 0,
                "razeni": []
            })
        );
    }

    #[test]
    fn payload_omits_absent_orientation() {
        let addr = BuildingAddress::new(266, 554782, 500119, 730700).unwrap();
        let q = Query::new(addr);
        let v: Value = serde_json::from_str(&q.payload().to_json().unwrap()).unwrap();
        let seat = v["sidlo"].as_object().unwrap();
        assert!(!seat.contains_key("cisloOrientacni"));
        assert!(!seat.contains_key("cisloOrientacniPismeno"));
    }

    #[test]
    fn response_decodes_string_and_numeric_ico() {
        let body = r#"{
            "pocetCelkem": 2,
            "ekonomickeSubjekty": [
                {"ico": "06881777", "obchodniJmeno": "Alfa s.r.o.", "dic": "CZ06881777"},
                {"ico": 1234567, "obchodniJmeno": "Beta a.s."}
            ]
        }"#;
        let r: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.total, Some(2));
        assert_eq!(r.subjects[0].ico, "06881777");
        assert_eq!(r.subjects[1].ico, "1234567");
    }

    #[test]
    fn null_or_missing_name_keeps_subject() {
        let body = r#"{"ekonomickeSubjekty": [
            {"ico": "06881777", "obchodniJmeno": "Alfa"},
            {"ico": "27074358", "obchodniJmeno": null},
            {"ico": "25596641"}
        ]}"#;
        let r: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.subjects.len(), 3);
        assert_eq!(r.subjects[1].name, "");
        assert_eq!(r.subjects[1].ico, "27074358");
        assert_eq!(r.subjects[2].name, "");
    }

    #[test]
    fn response_without_subject_list_is_empty() {
        let r: SearchResponse = serde_json::from_str(r#"{"pocetCelkem": 0}"#).unwrap();
        assert!(r.subjects.is_empty());
    }

    #[test]
    fn subject_into_record_carries_address() {
        let s = Subject {
            name: "Alfa".to_string(),
            ico: "1".to_string(),
        };
        let rec = s.into_record("1138/1");
        assert_eq!(rec.address.as_deref(), Some("1138/1"));
        assert_eq!(rec.registration_id, "1");
    }
}
