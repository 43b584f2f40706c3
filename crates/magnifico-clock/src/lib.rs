//! Session clock for Magnifico rooms.
//!
//! A room has at most one outstanding deadline at any time: the pre-start
//! countdown while it gathers players, a draft answer window while the
//! drafts run, and then one move deadline per turn. [`SessionClock`] owns
//! that single deadline. Scheduling a new one replaces the old one,
//! cancelling is idempotent, and a deadline fires at most once.
//!
//! # Integration
//!
//! The clock sits inside a room actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* admissions, decisions, end turn */ }
//!         expired = clock.expired() => {
//!             // advance: start the session, force the turn to end, ...
//!         }
//!     }
//! }
//! ```
//!
//! When nothing is scheduled, [`SessionClock::expired`] pends forever, so
//! the `select!` keeps serving the other branches.

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// What a deadline advances when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlinePurpose {
    /// Close the room and start the session.
    RoomStart,
    /// Stop waiting for draft answers.
    DraftAnswer,
    /// Force the active player's turn to end.
    MoveTimeout,
}

impl fmt::Display for DeadlinePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomStart => write!(f, "RoomStart"),
            Self::DraftAnswer => write!(f, "DraftAnswer"),
            Self::MoveTimeout => write!(f, "MoveTimeout"),
        }
    }
}

/// The one deadline currently scheduled on a clock.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    purpose: DeadlinePurpose,
    at: Instant,
    generation: u64,
}

/// Returned by [`SessionClock::expired`] when a deadline fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    /// What the deadline was for.
    pub purpose: DeadlinePurpose,
    /// The generation returned by the `schedule` call that set it.
    pub generation: u64,
    /// How long after the scheduled instant the clock was polled.
    pub late_by: Duration,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters describing how a clock has been used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockMetrics {
    /// Deadlines scheduled, including replacements.
    pub scheduled: u64,
    /// Deadlines dropped because a newer one replaced them.
    pub replaced: u64,
    /// Deadlines removed by an explicit cancel.
    pub cancelled: u64,
    /// Deadlines that fired.
    pub fired: u64,
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// A single cancellable, replaceable deadline.
///
/// One `SessionClock` per room actor.
#[derive(Debug, Default)]
pub struct SessionClock {
    pending: Option<Deadline>,
    generation: u64,
    metrics: ClockMetrics,
}

impl SessionClock {
    /// Creates a clock with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a deadline `after` from now, replacing any pending one.
    ///
    /// Returns the generation of the new deadline. A zero duration fires on
    /// the next poll of [`expired`](Self::expired).
    pub fn schedule(&mut self, purpose: DeadlinePurpose, after: Duration) -> u64 {
        self.generation += 1;
        if let Some(old) = self.pending.take() {
            self.metrics.replaced += 1;
            debug!(
                replaced = %old.purpose,
                by = %purpose,
                "pending deadline replaced"
            );
        }
        self.pending = Some(Deadline {
            purpose,
            at: Instant::now() + after,
            generation: self.generation,
        });
        self.metrics.scheduled += 1;
        trace!(
            %purpose,
            after_ms = after.as_millis() as u64,
            generation = self.generation,
            "deadline scheduled"
        );
        self.generation
    }

    /// Cancels the pending deadline, if any.
    ///
    /// Returns `true` if a deadline was removed. Cancelling an empty clock,
    /// or a deadline that already fired, is a no-op.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(deadline) => {
                self.metrics.cancelled += 1;
                trace!(purpose = %deadline.purpose, "deadline cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels the pending deadline only if it was scheduled for `purpose`.
    pub fn cancel_if(&mut self, purpose: DeadlinePurpose) -> bool {
        if self.pending() == Some(purpose) {
            self.cancel()
        } else {
            false
        }
    }

    /// The purpose of the pending deadline, if any.
    pub fn pending(&self) -> Option<DeadlinePurpose> {
        self.pending.map(|d| d.purpose)
    }

    /// Time left until the pending deadline fires.
    pub fn remaining(&self) -> Option<Duration> {
        self.pending
            .map(|d| d.at.saturating_duration_since(Instant::now()))
    }

    /// Waits for the pending deadline and consumes it.
    ///
    /// Pends forever when nothing is scheduled. Cancel-safe: if the future
    /// is dropped before the deadline is reached (another `select!` branch
    /// won), the deadline stays pending.
    pub async fn expired(&mut self) -> Expired {
        let Some(deadline) = self.pending else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(deadline.at).await;

        // Nothing awaits past this point, so the take below cannot be
        // interrupted by cancellation.
        self.pending = None;
        self.metrics.fired += 1;
        let late_by = Instant::now().saturating_duration_since(deadline.at);
        debug!(
            purpose = %deadline.purpose,
            generation = deadline.generation,
            "deadline fired"
        );

        Expired {
            purpose: deadline.purpose,
            generation: deadline.generation,
            late_by,
        }
    }

    /// Usage counters.
    pub fn metrics(&self) -> &ClockMetrics {
        &self.metrics
    }
}
