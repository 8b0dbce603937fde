//! Simulation time model.
//!
//! # Design
//!
//! The orchestrator advances an integer `Tick` counter.  Telemetry is
//! stamped with absolute `Timestamp`s in **milliseconds**:
//!
//!   now = start + tick * tick_ms
//!
//! Per-agent deadlines (`next`, `breakdownTime`, `shiftEndTime`) are
//! `Timestamp`s too, so they compare directly against `SimClock::now()`.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Absolute simulation time in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Deadline sentinel that every clock reading has already passed: an
    /// agent idling until `IMMEDIATE` leaves on its next tick.
    pub const IMMEDIATE: Timestamp = Timestamp(-1);

    #[inline]
    pub fn millis(self) -> i64 {
        self.0
    }

    /// `self + ms`, rounded to the nearest millisecond and saturating on
    /// overflow.  Non-finite offsets leave `self` unchanged.
    #[inline]
    pub fn after_ms(self, ms: f64) -> Timestamp {
        if !ms.is_finite() {
            return self;
        }
        Timestamp(self.0.saturating_add(ms.round() as i64))
    }

    /// Milliseconds from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Monotonic simulation clock with a fixed tick size.
///
/// Owned by the fleet orchestrator; agents only ever read it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Timestamp of tick 0.
    pub start: Timestamp,
    /// Milliseconds per tick.
    pub tick_ms: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start: Timestamp, tick_ms: u32) -> Self {
        Self {
            start,
            tick_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.offset(1);
    }

    /// Current simulation time.
    #[inline]
    pub fn now(&self) -> Timestamp {
        Timestamp(self.start.0 + self.current_tick.0 as i64 * self.tick_ms as i64)
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> i64 {
        self.now().since(self.start)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed_ms().max(0) / 1000;
        write!(
            f,
            "{} (+{:02}:{:02}:{:02})",
            self.current_tick,
            secs / 3_600,
            (secs % 3_600) / 60,
            secs % 60
        )
    }
}
