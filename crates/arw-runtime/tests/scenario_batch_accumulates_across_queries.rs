//! Scenario: two queries, the first returning three subjects and the second
//! exhausting its retry budget. The batch processes both, keeps exactly the
//! three records, and never aborts.

use std::time::Duration;

use arw_testkit::{subjects_body, ManualClock, ScriptedTransport};
use arw_registry::{RegistrySession, RetryPolicy, SearchReply};
use arw_runtime::*;
use arw_schemas::{BuildingAddress, Query};

fn queries() -> Vec<Query> {
    vec![
        Query::new(
            BuildingAddress::new(1442, 554782, 500119, 478652)
                .unwrap()
                .with_orientation(1, Some('b'))
                .unwrap(),
        ),
        Query::new(BuildingAddress::new(266, 554782, 500119, 730700).unwrap()),
    ]
}

#[test]
fn scenario_second_query_exhausted_first_kept() {
    let transport = ScriptedTransport::new();
    transport.push_search(SearchReply::new(
        200,
        subjects_body(&[
            ("06881777", "Alfa s.r.o."),
            ("27074358", "Beta a.s."),
            ("1234567", "Gama v.o.s."),
        ]),
    ));
    transport.set_fallback(Ok(SearchReply::new(503, "")));

    let clock = ManualClock::default();
    let mut session = RegistrySession::new(&transport, &clock, RetryPolicy::default());

    let report = run_batch(&mut session, &queries(), &clock, Duration::from_secs(1));

    assert_eq!(report.records.len(), 3);
    assert!(report
        .records
        .iter()
        .all(|r| r.address.as_deref() == Some("1442/1b")));

    assert_eq!(
        report.queries,
        vec![
            QueryReport {
                address: "1442/1b".to_string(),
                outcome: QueryOutcome::Found { count: 3 },
            },
            QueryReport {
                address: "266".to_string(),
                outcome: QueryOutcome::NoResult { attempts: 3 },
            },
        ]
    );

    // 1 + 3 search calls; pacing once, backoff twice.
    assert_eq!(transport.search_calls(), 4);
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(5),
            Duration::from_secs(5)
        ]
    );
}

#[test]
fn scenario_duplicates_across_queries_preserved() {
    let transport = ScriptedTransport::new();
    transport.push_search(SearchReply::new(200, subjects_body(&[("1", "Alfa")])));
    transport.push_search(SearchReply::new(200, subjects_body(&[("1", "Alfa")])));

    let clock = ManualClock::default();
    let mut session = RegistrySession::new(&transport, &clock, RetryPolicy::default());
    let report = run_batch(&mut session, &queries(), &clock, Duration::from_secs(1));

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].address.as_deref(), Some("1442/1b"));
    assert_eq!(report.records[1].address.as_deref(), Some("266"));
    assert_eq!(transport.bootstrap_calls(), 1);
}
