use std::fmt;

use chrono::{DateTime, Utc};

/// Validity window granted to a freshly bootstrapped token.
pub const DEFAULT_CREDENTIAL_TTL_SECS: u64 = 3600;

/// Session token plus the instant after which it must be treated as absent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Valid up to and including `expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}

// Token value never reaches logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lifecycle position of a session's credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No credential held (never bootstrapped, bootstrap failed, or rejected).
    Uninitialized,
    /// Credential present and not past its expiry.
    Valid,
    /// Credential present but past its expiry. Renewed like `Uninitialized`.
    Expired,
}

impl SessionState {
    pub fn of(credential: Option<&Credential>, now: DateTime<Utc>) -> Self {
        match credential {
            None => SessionState::Uninitialized,
            Some(c) if c.is_valid_at(now) => SessionState::Valid,
            Some(_) => SessionState::Expired,
        }
    }

    pub fn needs_renewal(&self) -> bool {
        !matches!(self, SessionState::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn state_transitions_with_time() {
        let c = Credential::new("tok", t0() + Duration::seconds(3600));
        assert_eq!(SessionState::of(None, t0()), SessionState::Uninitialized);
        assert_eq!(SessionState::of(Some(&c), t0()), SessionState::Valid);
        assert_eq!(
            SessionState::of(Some(&c), t0() + Duration::seconds(3600)),
            SessionState::Valid
        );
        assert_eq!(
            SessionState::of(Some(&c), t0() + Duration::seconds(3601)),
            SessionState::Expired
        );
    }

    #[test]
    fn debug_redacts_token() {
        let c = Credential::new("super-secret-cookie", t0());
        let s = format!("{c:?}");
        assert!(!s.contains("super-secret-cookie"));
        assert!(s.contains("redacted"));
    }
}
