use std::time::Duration;

use chrono::{DateTime, Utc};

/// Wall time and blocking waits, injected so retry backoff and credential
/// expiry can be driven deterministically in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Block the calling thread for `d`.
    fn sleep(&self, d: Duration);
}

/// Real system time and `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, d: Duration) {
        (**self).sleep(d)
    }
}
