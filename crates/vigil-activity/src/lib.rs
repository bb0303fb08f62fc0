//! Activity tracking for Vigil: interaction signals, the staleness rule,
//! and a fixed-period idle sweeper.
//!
//! Two signal sources feed the session lifecycle:
//!
//! 1. **Discrete interaction events** ([`Interaction`]) — pointer, key,
//!    scroll, touch. Each one, while the session is fresh, moves
//!    `last_activity_time` forward.
//! 2. **A periodic sweep** ([`IdleSweeper`]) — re-evaluates staleness on a
//!    fixed cadence without manufacturing activity, so a session that sits
//!    untouched still expires.
//!
//! Both paths converge on one canonical predicate,
//! [`IdlePolicy::is_stale`]. There is deliberately no second rule diffing
//! against login time; staleness is inactivity, nothing else.
//!
//! # Integration
//!
//! The sweeper is designed to sit inside the session agent's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         _ = sweeper.wait_for_sweep() => {
//!             controller.check_idle();
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace};
use vigil_model::Timestamp;

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// A discrete user interaction observed by the presentation layer.
///
/// The variants mirror the browser events a presentation layer typically
/// listens for. The lifecycle treats them identically; the type exists so
/// logs can say *which* signal refreshed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    PointerDown,
    KeyDown,
    Scroll,
    TouchStart,
}

impl std::fmt::Display for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PointerDown => "pointer-down",
            Self::KeyDown => "key-down",
            Self::Scroll => "scroll",
            Self::TouchStart => "touch-start",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// IdlePolicy
// ---------------------------------------------------------------------------

/// The staleness rule.
///
/// A session is stale when more than `inactivity_window` has elapsed since
/// the last observed interaction. Strictly greater: a session touched
/// exactly one window ago is still fresh.
#[derive(Debug, Clone, Copy)]
pub struct IdlePolicy {
    /// How long a session may sit without interaction before it is stale.
    ///
    /// Default: 30 minutes.
    pub inactivity_window: Duration,
}

impl Default for IdlePolicy {
    fn default() -> Self {
        Self {
            inactivity_window: Duration::from_secs(30 * 60),
        }
    }
}

impl IdlePolicy {
    /// The canonical staleness predicate. Every staleness decision in the
    /// workspace — interaction path and sweep path alike — goes through
    /// this method.
    pub fn is_stale(&self, last_activity: Timestamp, now: Timestamp) -> bool {
        now.since(last_activity) > self.inactivity_window
    }
}

// ---------------------------------------------------------------------------
// SweepConfig / IdleSweeper
// ---------------------------------------------------------------------------

/// Configuration for the periodic idle sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Interval between sweeps. Zero disables the sweeper entirely —
    /// [`IdleSweeper::wait_for_sweep`] then pends forever, which is the
    /// correct shape for embedding in a `select!` loop that should only
    /// react to commands.
    ///
    /// Default: 60 seconds.
    pub period: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(60),
        }
    }
}

impl SweepConfig {
    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    /// `true` when the sweep loop is turned off (`period == 0`).
    pub fn is_disabled(&self) -> bool {
        self.period.is_zero()
    }
}

/// Fixed-period sweep scheduler.
///
/// One sweeper per session owner. Holding it inside the owning task is
/// what makes the subscription scoped: dropping the task drops the
/// sweeper, and no timer leaks across controller instances.
pub struct IdleSweeper {
    config: SweepConfig,
    /// When the next sweep should fire. `None` when disabled.
    next_sweep: Option<TokioInstant>,
    sweep_count: u64,
    paused: bool,
}

impl IdleSweeper {
    pub fn new(config: SweepConfig) -> Self {
        let next_sweep = if config.is_disabled() {
            debug!("idle sweeper created in disabled mode");
            None
        } else {
            debug!(period_secs = config.period.as_secs(), "idle sweeper created");
            Some(TokioInstant::now() + config.period)
        };

        Self {
            config,
            next_sweep,
            sweep_count: 0,
            paused: false,
        }
    }

    /// A sweeper with the given period and default settings.
    pub fn with_period(period: Duration) -> Self {
        Self::new(SweepConfig::with_period(period))
    }

    /// Waits until the next sweep is due and returns its number (1-based).
    ///
    /// When disabled or paused this future pends forever — it never
    /// resolves on its own, but `tokio::select!` still processes other
    /// branches.
    pub async fn wait_for_sweep(&mut self) -> u64 {
        let next = match self.next_sweep {
            Some(next) if !self.paused => next,
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(next).await;

        self.sweep_count += 1;
        // Schedule from now, not from the missed deadline — if the task
        // was starved there is no value in a burst of catch-up sweeps.
        self.next_sweep = Some(TokioInstant::now() + self.config.period);

        trace!(sweep = self.sweep_count, "idle sweep fired");
        self.sweep_count
    }

    /// Pauses the sweep loop. Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(sweep = self.sweep_count, "idle sweeper paused");
        }
    }

    /// Resumes after a pause, rescheduling a full period out so time spent
    /// paused doesn't produce an immediate sweep.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if !self.config.is_disabled() {
                self.next_sweep = Some(TokioInstant::now() + self.config.period);
            }
            debug!(sweep = self.sweep_count, "idle sweeper resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_disabled(&self) -> bool {
        self.config.is_disabled()
    }

    /// Number of sweeps fired so far.
    pub fn sweep_count(&self) -> u64 {
        self.sweep_count
    }

    /// The configured sweep period.
    pub fn period(&self) -> Duration {
        self.config.period
    }
}
