//! Time abstraction
//!
//! Every timer in the engine reads an injected [`Clock`] so tests can step
//! time deterministically with [`ManualClock`].

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync + Debug {
    /// Monotonic instant used for every delay and cooldown.
    fn now(&self) -> Instant;

    /// Wall-clock time used to stamp sync events.
    fn system_now(&self) -> SystemTime;

    /// Wall-clock milliseconds since the Unix epoch.
    fn unix_ms(&self) -> u64 {
        self.system_now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Production clock backed by the OS.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug)]
struct ManualState {
    instant: Instant,
    system_time: SystemTime,
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                instant: Instant::now(),
                system_time: SystemTime::now(),
            })),
        }
    }

    /// Start with the wall clock at a fixed Unix timestamp.
    pub fn starting_at_unix_ms(unix_ms: u64) -> Self {
        let clock = Self::new();
        clock.state.lock().system_time =
            UNIX_EPOCH + Duration::from_millis(unix_ms);
        clock
    }

    /// Advance both the monotonic and the wall clock.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.instant += duration;
        state.system_time += duration;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().instant
    }

    fn system_now(&self) -> SystemTime {
        self.state.lock().system_time
    }
}
