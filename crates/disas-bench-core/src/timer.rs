//! Wall-clock measurement around the round loop.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source.
///
/// Production runs use [`MonotonicClock`]; tests drive [`ManualClock`] by hand so
/// the measured span can be checked exactly.
pub trait Clock {
    type Instant: Copy;

    fn now(&self) -> Self::Instant;

    fn between(&self, start: Self::Instant, end: Self::Instant) -> Duration;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn between(&self, start: Instant, end: Instant) -> Duration {
        end.saturating_duration_since(start)
    }
}

/// Clock that only moves when [`advance`](Self::advance) is called.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }
}

impl Clock for ManualClock {
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.now.get()
    }

    fn between(&self, start: Duration, end: Duration) -> Duration {
        end.saturating_sub(start)
    }
}

pub struct Stopwatch<'c, C: Clock> {
    clock: &'c C,
    start: C::Instant,
}

impl<'c, C: Clock> Stopwatch<'c, C> {
    pub fn start(clock: &'c C) -> Self {
        Self {
            clock,
            start: clock.now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.between(self.start, self.clock.now())
    }
}

/// Fractional milliseconds; sub-millisecond precision is kept.
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs() as f64 * 1000.0 + f64::from(d.subsec_nanos()) / 1_000_000.0
}
