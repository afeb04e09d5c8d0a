use std::time::{Duration, Instant};

/// Re-armable periodic timer driven by explicit `now` values.
///
/// Arming does not need a clock reading: the first [`Ticker::poll`] after [`Ticker::arm`] anchors
/// the schedule and the first tick fires one interval later. Each firing reschedules relative to
/// the `now` it fired at, so ticks missed by a slow caller collapse into one instead of bursting.
/// Disarming only prevents future ticks.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    armed: bool,
    next_due: Option<Instant>,
}

impl Ticker {
    /// Create a disarmed ticker. Zero intervals are bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            armed: false,
            next_due: None,
        }
    }

    /// Current period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` between [`Ticker::arm`] and [`Ticker::disarm`].
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Instant of the next tick, once anchored.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Start ticking; re-arming an armed ticker restarts its period.
    pub fn arm(&mut self) {
        self.armed = true;
        self.next_due = None;
    }

    /// Stop ticking.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.next_due = None;
    }

    /// Change the period and schedule the next tick one new period after `now`.
    pub fn reschedule(&mut self, now: Instant, interval: Duration) {
        self.interval = interval.max(Duration::from_millis(1));
        if self.armed {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Return `true` when a tick is due at `now`. Fires at most once per call.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.armed {
            return false;
        }
        match self.next_due {
            None => {
                self.next_due = Some(now + self.interval);
                false
            }
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ticker.rs"]
mod tests;
