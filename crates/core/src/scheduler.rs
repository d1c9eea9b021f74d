//! Timer scheduling interface
//!
//! The session never sleeps or reads a clock. It tells its [`Scheduler`]
//! which [`TimerKind`] to arm, re-arm or cancel, and the host calls
//! `GameSession::on_tick` when one fires. At most one timer per kind is
//! armed; arming a kind again replaces the previous one.
//!
//! [`ManualScheduler`] is a virtual clock for tests, benches and the
//! headless runner.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::trace;

use crate::types::TimerKind;

/// Host-supplied timer mechanism
pub trait Scheduler {
    /// Fire `kind` once after `delay`
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind);

    /// Fire `kind` every `interval` until cancelled
    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind);

    /// Disarm `kind`; a no-op if it is not armed
    fn cancel(&mut self, kind: TimerKind);

    /// Time left before `kind` next fires, `None` when it is not armed
    fn remaining(&self, kind: TimerKind) -> Option<Duration>;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) {
        (**self).schedule_once(delay, kind)
    }

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) {
        (**self).schedule_repeating(interval, kind)
    }

    fn cancel(&mut self, kind: TimerKind) {
        (**self).cancel(kind)
    }

    fn remaining(&self, kind: TimerKind) -> Option<Duration> {
        (**self).remaining(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    deadline: Duration,
    period: Option<Duration>,
    /// Arming order, breaks deadline ties
    seq: u64,
}

/// Deterministic virtual-clock scheduler
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    timers: BTreeMap<TimerKind, Armed>,
    next_seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers.contains_key(&kind)
    }

    /// Absolute deadline of an armed timer
    pub fn deadline(&self, kind: TimerKind) -> Option<Duration> {
        self.timers.get(&kind).map(|t| t.deadline)
    }

    /// Period of an armed repeating timer
    pub fn period(&self, kind: TimerKind) -> Option<Duration> {
        self.timers.get(&kind).and_then(|t| t.period)
    }

    /// Kinds currently armed
    pub fn armed(&self) -> Vec<TimerKind> {
        self.timers.keys().copied().collect()
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration, period: Option<Duration>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(
            kind,
            Armed {
                deadline: self.now + delay,
                period,
                seq,
            },
        );
    }

    /// Take the earliest timer due at or before `until`
    ///
    /// The clock moves to that timer's deadline. One-shot timers are removed;
    /// repeating timers are re-armed one period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        let (&kind, &armed) = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.seq))?;

        self.now = self.now.max(armed.deadline);
        match armed.period {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.timers.insert(
                    kind,
                    Armed {
                        deadline: armed.deadline + period,
                        period: Some(period),
                        seq,
                    },
                );
            }
            None => {
                self.timers.remove(&kind);
            }
        }
        Some(kind)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) {
        trace!(?kind, delay_ms = delay.as_millis() as u64, "schedule once");
        self.arm(kind, delay, None);
    }

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) {
        // A zero period would fire forever at one instant.
        let interval = interval.max(Duration::from_millis(1));
        trace!(?kind, interval_ms = interval.as_millis() as u64, "schedule repeating");
        self.arm(kind, interval, Some(interval));
    }

    fn cancel(&mut self, kind: TimerKind) {
        if self.timers.remove(&kind).is_some() {
            trace!(?kind, "cancel");
        }
    }

    fn remaining(&self, kind: TimerKind) -> Option<Duration> {
        self.deadline(kind).map(|d| d.saturating_sub(self.now))
    }
}
