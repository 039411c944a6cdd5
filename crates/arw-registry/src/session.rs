//! Session client: credential lifecycle plus retried search.

use std::time::Duration;

use arw_schemas::{Query, SearchResponse, Subject};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::clock::Clock;
use crate::credential::{Credential, SessionState, DEFAULT_CREDENTIAL_TTL_SECS};
use crate::retry::{run_with_retry, AttemptFailure, RetryOutcome, RetryPolicy};
use crate::transport::RegistryTransport;

const HTTP_UNAUTHORIZED: u16 = 401;

// ---------------------------------------------------------------------------
// Outcome and counters
// ---------------------------------------------------------------------------

/// Result of one logical search. Never an error: exhausting the retry budget
/// is reported as `NoResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found {
        subjects: Vec<Subject>,
        /// `pocetCelkem` as reported by the registry, if present.
        total: Option<u64>,
        attempts: u32,
    },
    NoResult {
        attempts: u32,
        last_failure: AttemptFailure,
    },
}

impl SearchOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            SearchOutcome::Found { attempts, .. } | SearchOutcome::NoResult { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Subjects of a successful search; empty for `NoResult`.
    pub fn subjects(&self) -> &[Subject] {
        match self {
            SearchOutcome::Found { subjects, .. } => subjects,
            SearchOutcome::NoResult { .. } => &[],
        }
    }
}

/// Per-session counters, exported in the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Bootstrap requests issued.
    pub bootstraps: u32,
    /// Bootstraps that produced no credential.
    pub bootstrap_failures: u32,
    pub search_attempts: u32,
    pub auth_rejections: u32,
    pub transient_failures: u32,
    /// Logical searches that ended in `NoResult`.
    pub exhausted_searches: u32,
}

/// Anything that can answer a registry query. The batch driver depends on
/// this rather than on a concrete session.
pub trait SubjectSearch {
    fn search(&mut self, query: &Query) -> SearchOutcome;

    /// Session counters, when the implementation keeps any.
    fn stats(&self) -> Option<SessionStats> {
        None
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Holds at most one credential and performs searches under a retry policy.
///
/// Credential handling:
/// - renewed (one bootstrap) before any attempt when absent or expired
/// - discarded on HTTP 401, so the next attempt bootstraps again
/// - a failed bootstrap leaves the session uninitialized; the attempt still
///   goes out without a cookie and fails on its own terms
pub struct RegistrySession<T, C> {
    clock: C,
    policy: RetryPolicy,
    core: SessionCore<T>,
}

struct SessionCore<T> {
    transport: T,
    credential: Option<Credential>,
    ttl: Duration,
    stats: SessionStats,
}

impl<T, C> RegistrySession<T, C>
where
    T: RegistryTransport,
    C: Clock,
{
    pub fn new(transport: T, clock: C, policy: RetryPolicy) -> Self {
        Self {
            clock,
            policy,
            core: SessionCore {
                transport,
                credential: None,
                ttl: Duration::from_secs(DEFAULT_CREDENTIAL_TTL_SECS),
                stats: SessionStats::default(),
            },
        }
    }

    /// Validity window applied to tokens obtained from now on.
    pub fn with_credential_ttl(mut self, ttl: Duration) -> Self {
        self.core.ttl = ttl;
        self
    }

    /// Start from an already known credential.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.core.credential = Some(credential);
        self
    }

    pub fn state(&self) -> SessionState {
        SessionState::of(self.core.credential.as_ref(), self.clock.now())
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.core.credential.as_ref()
    }

    pub fn stats(&self) -> SessionStats {
        self.core.stats
    }

    /// Bootstrap once if the credential is absent or expired. Returns the
    /// state afterwards.
    pub fn ensure_credential(&mut self) -> SessionState {
        let now = self.clock.now();
        self.core.ensure(now);
        SessionState::of(self.core.credential.as_ref(), now)
    }

    /// Run one logical search with credential renewal and retries.
    pub fn search(&mut self, query: &Query) -> SearchOutcome {
        let span = info_span!("registry_search", address = %query.label());
        let _guard = span.enter();

        let body = match query.payload().to_json() {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "search payload could not be encoded");
                self.core.stats.exhausted_searches += 1;
                return SearchOutcome::NoResult {
                    attempts: 0,
                    last_failure: AttemptFailure::Transient(format!("payload encode: {e}")),
                };
            }
        };

        let clock = &self.clock;
        let core = &mut self.core;
        let outcome = run_with_retry(&self.policy, clock, |attempt| {
            core.attempt(clock, &body, attempt)
        });

        match outcome {
            RetryOutcome::Succeeded { value, attempts } => {
                info!(
                    attempts,
                    subjects = value.subjects.len(),
                    total = ?value.total,
                    "search succeeded"
                );
                SearchOutcome::Found {
                    subjects: value.subjects,
                    total: value.total,
                    attempts,
                }
            }
            RetryOutcome::Exhausted {
                attempts,
                last_failure,
            } => {
                self.core.stats.exhausted_searches += 1;
                warn!(attempts, last_failure = %last_failure, "search gave up");
                SearchOutcome::NoResult {
                    attempts,
                    last_failure,
                }
            }
        }
    }
}

impl<T, C> SubjectSearch for RegistrySession<T, C>
where
    T: RegistryTransport,
    C: Clock,
{
    fn search(&mut self, query: &Query) -> SearchOutcome {
        RegistrySession::search(self, query)
    }

    fn stats(&self) -> Option<SessionStats> {
        Some(self.core.stats)
    }
}

impl<T: RegistryTransport> SessionCore<T> {
    fn ensure(&mut self, now: DateTime<Utc>) {
        let state = SessionState::of(self.credential.as_ref(), now);
        if state.needs_renewal() {
            debug!(?state, "renewing credential");
            self.bootstrap(now);
        }
    }

    fn bootstrap(&mut self, now: DateTime<Utc>) {
        self.stats.bootstraps += 1;
        self.credential = match self.transport.bootstrap() {
            Ok(reply) => match reply.token.filter(|_| (200..300).contains(&reply.status)) {
                Some(token) => {
                    let expires_at = chrono::Duration::from_std(self.ttl)
                        .ok()
                        .and_then(|d| now.checked_add_signed(d))
                        .unwrap_or(DateTime::<Utc>::MAX_UTC);
                    info!(status = reply.status, %expires_at, "credential obtained");
                    Some(Credential::new(token, expires_at))
                }
                None => {
                    self.stats.bootstrap_failures += 1;
                    warn!(status = reply.status, "bootstrap did not yield a session cookie");
                    None
                }
            },
            Err(e) => {
                self.stats.bootstrap_failures += 1;
                warn!(error = %e, "bootstrap request failed");
                None
            }
        };
    }

    fn attempt<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        body: &str,
        attempt: u32,
    ) -> Result<SearchResponse, AttemptFailure> {
        self.ensure(clock.now());

        self.stats.search_attempts += 1;
        let token = self.credential.as_ref().map(Credential::token);
        debug!(attempt, with_cookie = token.is_some(), "search attempt");
        let reply = match self.transport.search(token, body) {
            Ok(r) => r,
            Err(e) => {
                self.stats.transient_failures += 1;
                warn!(attempt, error = %e, "search request failed");
                return Err(AttemptFailure::Transient(e.to_string()));
            }
        };

        if reply.status == HTTP_UNAUTHORIZED {
            self.stats.auth_rejections += 1;
            self.credential = None;
            warn!(attempt, "credential rejected; discarding");
            return Err(AttemptFailure::AuthRejected);
        }

        if !reply.is_success() {
            self.stats.transient_failures += 1;
            warn!(attempt, status = reply.status, "unexpected search status");
            return Err(AttemptFailure::Transient(format!("http status {}", reply.status)));
        }

        serde_json::from_str::<SearchResponse>(&reply.body).map_err(|e| {
            self.stats.transient_failures += 1;
            warn!(attempt, error = %e, "search response could not be decoded");
            AttemptFailure::Transient(format!("undecodable body: {e}"))
        })
    }
}

