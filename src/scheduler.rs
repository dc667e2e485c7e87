// ============================================================================
// TIMER QUEUE
// ============================================================================

// Single-threaded timer queue with at most one pending timer per appliance.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::appliance::Appliance;

/// Identifies one scheduled callback. A fresh handle is issued on every
/// `schedule`, so a stale handle never matches a newer timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    handle: TimerHandle,
    deadline: Instant,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: BTreeMap<Appliance, Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the appliance's timer, replacing any pending one.
    pub fn schedule(&mut self, appliance: Appliance, deadline: Instant) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        if let Some(old) = self.timers.insert(appliance, Timer { handle, deadline }) {
            tracing::debug!(%appliance, ?old.handle, "replaced pending timer");
        }
        handle
    }

    /// Disarms the appliance's timer. Returns the cancelled handle, if any.
    pub fn cancel(&mut self, appliance: Appliance) -> Option<TimerHandle> {
        self.timers.remove(&appliance).map(|timer| timer.handle)
    }

    pub fn handle(&self, appliance: Appliance) -> Option<TimerHandle> {
        self.timers.get(&appliance).map(|timer| timer.handle)
    }

    pub fn is_scheduled(&self, appliance: Appliance) -> bool {
        self.timers.contains_key(&appliance)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    /// Removes and returns the earliest timer that is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Appliance> {
        let (appliance, _) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| timer.deadline)?;
        let appliance = *appliance;
        self.timers.remove(&appliance);
        Some(appliance)
    }
}
