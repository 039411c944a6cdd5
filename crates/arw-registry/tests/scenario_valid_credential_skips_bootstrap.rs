//! Scenario: a session holding an unexpired credential searches without
//! bootstrapping; an expired or missing one is renewed exactly once.

use std::time::Duration;

use arw_testkit::{subjects_body, ManualClock, ScriptedTransport};
use arw_registry::*;
use arw_schemas::{BuildingAddress, Query};
use chrono::Duration as Span;

fn query() -> Query {
    Query::new(BuildingAddress::new(266, 554782, 500119, 730700).unwrap())
}

#[test]
fn scenario_valid_credential_used_as_is() {
    let transport = ScriptedTransport::new();
    transport.push_search(SearchReply::new(200, subjects_body(&[("06881777", "Alfa")])));
    let clock = ManualClock::default();
    let cred = Credential::new("held", clock.now() + Span::seconds(600));

    let mut s =
        RegistrySession::new(&transport, &clock, RetryPolicy::default()).with_credential(cred);
    let out = s.search(&query());

    assert_eq!(transport.bootstrap_calls(), 0);
    assert_eq!(transport.sent_tokens(), vec![Some("held".to_string())]);
    assert!(matches!(out, SearchOutcome::Found { attempts: 1, .. }));
}

#[test]
fn scenario_uninitialized_session_bootstraps_once() {
    let transport = ScriptedTransport::new();
    let clock = ManualClock::default();
    let mut s = RegistrySession::new(&transport, &clock, RetryPolicy::default());

    s.search(&query());
    s.search(&query());

    assert_eq!(transport.bootstrap_calls(), 1);
    assert_eq!(transport.search_calls(), 2);
    assert_eq!(s.stats().bootstraps, 1);
}

#[test]
fn scenario_expired_credential_renewed_once() {
    let transport = ScriptedTransport::new();
    let clock = ManualClock::default();
    let stale = Credential::new("stale", clock.now() - Span::seconds(1));

    let mut s =
        RegistrySession::new(&transport, &clock, RetryPolicy::default()).with_credential(stale);
    assert_eq!(s.state(), SessionState::Expired);

    s.search(&query());
    assert_eq!(transport.bootstrap_calls(), 1);
    assert_eq!(transport.sent_tokens(), vec![Some("token-1".to_string())]);
}

#[test]
fn scenario_credential_expires_after_ttl() {
    let transport = ScriptedTransport::new();
    let clock = ManualClock::default();
    let mut s = RegistrySession::new(&transport, &clock, RetryPolicy::default())
        .with_credential_ttl(Duration::from_secs(60));

    s.search(&query());
    clock.advance(Duration::from_secs(60));
    s.search(&query());
    assert_eq!(transport.bootstrap_calls(), 1);

    clock.advance(Duration::from_secs(1));
    s.search(&query());
    assert_eq!(transport.bootstrap_calls(), 2);
    assert_eq!(
        transport.sent_tokens().last().cloned().flatten().as_deref(),
        Some("token-2")
    );
}
