use chrono::{DateTime, Local};

/// Source of the current wall-clock time.
///
/// Pure policies always take "now" as a parameter; only orchestrating
/// services read it, and they read it through this trait.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Clock backed by the system time in the local zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
