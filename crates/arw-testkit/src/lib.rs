//! arw-testkit
//!
//! Deterministic stand-ins for the registry clock and transport, for scenario
//! tests that drive an `arw_registry::RegistrySession` without a network.
//! Dev-dependency only.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use arw_registry::{BootstrapReply, Clock, RegistryTransport, SearchReply, TransportError};

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// Clock that only moves when told to. `sleep` advances it and is recorded.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default())
    }
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, d: Duration) {
        self.now.set(shift(self.now.get(), d));
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
        self.advance(d);
    }
}

fn shift(t: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(d)
        .ok()
        .and_then(|d| t.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ---------------------------------------------------------------------------
// ScriptedTransport
// ---------------------------------------------------------------------------

/// Transport that replays queued replies and records what was sent.
///
/// With an empty bootstrap queue every bootstrap succeeds with `token-N`
/// (N counting from 1). With an empty search queue the fallback reply is
/// returned: an empty successful result unless changed.
#[derive(Debug)]
pub struct ScriptedTransport {
    bootstraps: RefCell<VecDeque<Result<BootstrapReply, TransportError>>>,
    searches: RefCell<VecDeque<Result<SearchReply, TransportError>>>,
    fallback: RefCell<Result<SearchReply, TransportError>>,
    bootstrap_calls: Cell<u32>,
    sent_tokens: RefCell<Vec<Option<String>>>,
    sent_bodies: RefCell<Vec<String>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            bootstraps: RefCell::new(VecDeque::new()),
            searches: RefCell::new(VecDeque::new()),
            fallback: RefCell::new(Ok(SearchReply::new(200, subjects_body(&[])))),
            bootstrap_calls: Cell::new(0),
            sent_tokens: RefCell::new(Vec::new()),
            sent_bodies: RefCell::new(Vec::new()),
        }
    }

    pub fn push_search(&self, reply: SearchReply) {
        self.searches.borrow_mut().push_back(Ok(reply));
    }

    pub fn push_search_error(&self, err: TransportError) {
        self.searches.borrow_mut().push_back(Err(err));
    }

    pub fn push_bootstrap(&self, reply: Result<BootstrapReply, TransportError>) {
        self.bootstraps.borrow_mut().push_back(reply);
    }

    /// Reply used once the search queue is drained.
    pub fn set_fallback(&self, reply: Result<SearchReply, TransportError>) {
        *self.fallback.borrow_mut() = reply;
    }

    pub fn bootstrap_calls(&self) -> u32 {
        self.bootstrap_calls.get()
    }

    pub fn search_calls(&self) -> usize {
        self.sent_bodies.borrow().len()
    }

    /// Cookie token of every search call, in order.
    pub fn sent_tokens(&self) -> Vec<Option<String>> {
        self.sent_tokens.borrow().clone()
    }

    pub fn sent_bodies(&self) -> Vec<String> {
        self.sent_bodies.borrow().clone()
    }
}

impl RegistryTransport for ScriptedTransport {
    fn bootstrap(&self) -> Result<BootstrapReply, TransportError> {
        let n = self.bootstrap_calls.get() + 1;
        self.bootstrap_calls.set(n);
        self.bootstraps.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(BootstrapReply {
                status: 200,
                token: Some(format!("token-{n}")),
            })
        })
    }

    fn search(&self, token: Option<&str>, body: &str) -> Result<SearchReply, TransportError> {
        self.sent_tokens.borrow_mut().push(token.map(str::to_string));
        self.sent_bodies.borrow_mut().push(body.to_string());
        self.searches
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.fallback.borrow().clone())
    }
}

/// Search response body listing `(ico, name)` pairs.
pub fn subjects_body(subjects: &[(&str, &str)]) -> String {
    let list: Vec<_> = subjects
        .iter()
        .map(|(ico, name)| json!({ "ico": ico, "obchodniJmeno": name }))
        .collect();
    json!({ "pocetCelkem": subjects.len(), "ekonomickeSubjekty": list }).to_string()
}
