use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Source of the current time.
///
/// Schedules are evaluated against the local wall clock while persisted
/// timestamps are UTC, so both views are exposed.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn local_now(&self) -> NaiveDateTime;
}

/// Clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
