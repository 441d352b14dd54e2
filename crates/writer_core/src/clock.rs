use std::time::SystemTime;

/// Source of the current wall-clock time.
///
/// Token expiry is computed against this, so tests can swap in a clock they
/// control instead of sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
