//! arw-registry
//!
//! Session client for the economic-subject registry search.
//!
//! - One [`RegistrySession`] holds at most one short-lived credential (the
//!   `GN-TOKEN-CSP` cookie) and renews it on expiry or rejection
//! - Every `search` runs under a [`RetryPolicy`]; exhausting it yields
//!   [`SearchOutcome::NoResult`], never an error
//! - Network access sits behind [`RegistryTransport`]; time behind [`Clock`]
//!
//! Single-threaded and blocking. The session is passed by `&mut`; there is no
//! global client state.

mod clock;
mod credential;
mod retry;
mod session;
mod transport;

pub use clock::{Clock, SystemClock};
pub use credential::{Credential, SessionState, DEFAULT_CREDENTIAL_TTL_SECS};
pub use retry::{run_with_retry, AttemptFailure, RetryOutcome, RetryPolicy};
pub use session::{RegistrySession, SearchOutcome, SessionStats, SubjectSearch};
pub use transport::{
    cookie_value, BootstrapReply, HttpTransport, RegistryEndpoints, RegistryTransport,
    SearchReply, TransportError,
};
