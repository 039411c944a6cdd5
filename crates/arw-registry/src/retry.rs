//! Retry wrapper, decoupled from the network call.
//!
//! [`run_with_retry`] drives attempts of an arbitrary operation. The
//! [`RetryPolicy`] decides how many attempts are allowed and how long to wait
//! after each failure class; the [`Clock`] performs the wait.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Attempt budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Fixed wait after a transient failure.
    pub backoff_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 5,
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    /// Wait before the next attempt, or `None` to retry immediately.
    ///
    /// A rejected credential is renewed rather than waited out.
    pub fn delay_after(&self, failure: &AttemptFailure) -> Option<Duration> {
        match failure {
            AttemptFailure::AuthRejected => None,
            AttemptFailure::Transient(_) => Some(self.backoff()),
        }
    }

    fn budget(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The server refused the credential (HTTP 401).
    AuthRejected,
    /// Network fault, unexpected status, or undecodable body.
    Transient(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::AuthRejected => write!(f, "credential rejected"),
            AttemptFailure::Transient(msg) => write!(f, "transient failure: {msg}"),
        }
    }
}

/// Result of [`run_with_retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Succeeded { value: T, attempts: u32 },
    Exhausted { attempts: u32, last_failure: AttemptFailure },
}

/// Call `op` with the 1-based attempt number until it succeeds or the budget
/// runs out. No wait follows the final attempt.
pub fn run_with_retry<T, C, F>(policy: &RetryPolicy, clock: &C, mut op: F) -> RetryOutcome<T>
where
    C: Clock + ?Sized,
    F: FnMut(u32) -> Result<T, AttemptFailure>,
{
    let budget = policy.budget();
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt) {
            Ok(value) => {
                return RetryOutcome::Succeeded {
                    value,
                    attempts: attempt,
                }
            }
            Err(failure) => {
                if attempt >= budget {
                    return RetryOutcome::Exhausted {
                        attempts: attempt,
                        last_failure: failure,
                    };
                }
                if let Some(wait) = policy.delay_after(&failure) {
                    clock.sleep(wait);
                }
            }
        }
    }
}
