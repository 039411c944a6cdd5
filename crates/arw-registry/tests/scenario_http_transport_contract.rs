//! Scenario: the reqwest transport talks to a mock registry.
//!
//! - bootstrap extracts the session cookie from `Set-Cookie`
//! - search sends the cookie, browser-like headers and the JSON body
//! - a full session round trip decodes the subject list

use arw_testkit::{subjects_body, ManualClock};
use arw_registry::*;
use arw_schemas::{BuildingAddress, Query};
use httpmock::prelude::*;
use serde_json::json;

fn endpoints(server: &MockServer) -> RegistryEndpoints {
    RegistryEndpoints {
        bootstrap_url: server.url("/ekonomicke-subjekty"),
        search_url: server.url("/rest/ekonomicke-subjekty/vyhledat"),
        request_timeout_secs: 5,
        ..RegistryEndpoints::default()
    }
}

#[test]
fn scenario_bootstrap_reads_named_cookie() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET).path("/ekonomicke-subjekty");
        then.status(200)
            .header("set-cookie", "GN-TOKEN-CSP=tok-abc; Path=/; Secure")
            .body("<html></html>");
    });

    let t = HttpTransport::new(endpoints(&server)).unwrap();
    let reply = t.bootstrap().unwrap();

    m.assert();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.token.as_deref(), Some("tok-abc"));
}

#[test]
fn scenario_search_sends_cookie_headers_and_body() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/ekonomicke-subjekty/vyhledat")
            .header("cookie", "GN-TOKEN-CSP=tok-abc")
            .header("content-type", "application/json")
            .header("accept-language", "en-US")
            .json_body(json!({ "pocet": 1 }));
        then.status(200).body(subjects_body(&[("1", "Alfa")]));
    });

    let t = HttpTransport::new(endpoints(&server)).unwrap();
    let reply = t.search(Some("tok-abc"), r#"{"pocet":1}"#).unwrap();

    m.assert();
    assert!(reply.is_success());
    assert!(reply.body.contains("Alfa"));
}

#[test]
fn scenario_session_round_trip_against_mock() {
    let server = MockServer::start();
    let boot = server.mock(|when, then| {
        when.method(GET).path("/ekonomicke-subjekty");
        then.status(200)
            .header("set-cookie", "GN-TOKEN-CSP=live-token; Path=/");
    });

    let addr = BuildingAddress::new(1442, 554782, 500119, 478652)
        .unwrap()
        .with_orientation(1, Some('b'))
        .unwrap();
    let query = Query::new(addr);
    let expected_body: serde_json::Value =
        serde_json::from_str(&query.payload().to_json().unwrap()).unwrap();

    let search = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/ekonomicke-subjekty/vyhledat")
            .header("cookie", "GN-TOKEN-CSP=live-token")
            .json_body(expected_body);
        then.status(200).body(
            json!({
                "pocetCelkem": 2,
                "ekonomickeSubjekty": [
                    {"ico": "06881777", "obchodniJmeno": "Alfa s.r.o."},
                    {"ico": "27074358", "obchodniJmeno": "Beta a.s."}
                ]
            })
            .to_string(),
        );
    });

    let transport = HttpTransport::new(endpoints(&server)).unwrap();
    let clock = ManualClock::default();
    let mut s = RegistrySession::new(transport, &clock, RetryPolicy::default());
    let out = s.search(&query);

    boot.assert_hits(1);
    search.assert_hits(1);
    match out {
        SearchOutcome::Found {
            subjects, total, ..
        } => {
            assert_eq!(total, Some(2));
            assert_eq!(subjects[1].name, "Beta a.s.");
        }
        other => panic!("expected Found, got {other:?}"),
    }
}

#[test]
fn scenario_unauthorized_status_is_reported_raw() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/ekonomicke-subjekty/vyhledat");
        then.status(401);
    });

    let t = HttpTransport::new(endpoints(&server)).unwrap();
    let reply = t.search(None, "{}").unwrap();
    assert_eq!(reply.status, 401);
}
