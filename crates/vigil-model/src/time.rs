//! Wall-clock time as the session layer sees it.
//!
//! Session timestamps are *wall-clock* milliseconds since the Unix epoch,
//! not monotonic instants — they are persisted across process restarts and
//! compared against records written by an earlier run, so a monotonic clock
//! would be meaningless here.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A point in wall-clock time, in milliseconds since the Unix epoch.
///
/// Newtype over `u64` so a timestamp can't be confused with a duration or
/// any other counter. `#[serde(transparent)]` keeps the persisted form a
/// plain JSON number, matching the on-disk record format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Creates a timestamp from raw epoch milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Raw epoch milliseconds.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Elapsed time since `earlier`. Saturates to zero if `earlier` is in
    /// the future (wall clocks can step backwards; staleness math must not
    /// underflow when they do).
    pub fn since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// This timestamp shifted forward by `d`.
    pub fn plus(self, d: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(d.as_millis() as u64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for the session layer.
///
/// Every staleness and record-age decision goes through this trait, which is
/// the seam that lets tests drive the clock by hand instead of sleeping.
/// Production code uses [`SystemClock`]; tests use [`ManualClock`].
pub trait Clock: Send + Sync + 'static {
    /// The current wall-clock time.
    fn now(&self) -> Timestamp;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A system clock before 1970 is a machine misconfiguration;
        // normalize to the epoch rather than panic.
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Timestamp(since_epoch.as_millis() as u64)
    }
}

/// A manually-advanced clock for tests and demos.
///
/// Interior mutability (an atomic) so the clock can be shared behind an
/// `Arc` and advanced while the component under test holds a reference.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    /// Creates a clock frozen at the given time.
    pub fn at(start: Timestamp) -> Self {
        Self(AtomicU64::new(start.0))
    }

    /// Moves the clock forward by `d`.
    pub fn advance(&self, d: Duration) {
        self.0.fetch_add(d.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute time (may move backwards).
    pub fn set(&self, t: Timestamp) {
        self.0.store(t.0, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.0.load(Ordering::SeqCst))
    }
}

// =========================================================================
// Tests
// =========================================================================
