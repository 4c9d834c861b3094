use chrono::{DateTime, Utc};
use mockall::automock;

/// Injectable time source so due dates and coverage checks are deterministic
/// under test.
#[automock]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
