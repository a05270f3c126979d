//! Phase-advance timers.
//!
//! # Responsibilities
//! - Hold at most one pending timer per mount record
//! - Report the earliest deadline so a driver knows how long to sleep
//! - Tell live firings apart from firings whose timer was replaced or cancelled
//!
//! # Design Decisions
//! - Pure data structure: no tasks are spawned, callers pass `now` explicitly.
//!   Firing order and test timing are fully deterministic
//! - Re-arming a key replaces its timer; the old id becomes stale

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::transition::record::InstanceKey;

/// Identity of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    deadline: Instant,
}

/// Result of claiming a due timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFiring {
    /// The timer was still current and has been consumed.
    Live,
    /// The timer was cancelled or replaced before it fired.
    Stale,
}

impl TimerFiring {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerFiring::Live => "live",
            TimerFiring::Stale => "stale",
        }
    }
}

/// Pending timers for one level.
#[derive(Debug)]
pub struct TransitionScheduler {
    timeout: Duration,
    pending: HashMap<InstanceKey, PendingTimer>,
    next_id: u64,
}

impl TransitionScheduler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pending: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arm a timer for `key`, due one timeout after `stamp`. Replaces any
    /// timer already armed for the key.
    pub fn arm(&mut self, key: InstanceKey, stamp: Instant) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert(
            key,
            PendingTimer {
                id,
                deadline: stamp + self.timeout,
            },
        );
        id
    }

    pub fn cancel(&mut self, key: &InstanceKey) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn is_armed(&self, key: &InstanceKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn deadline(&self, key: &InstanceKey) -> Option<Instant> {
        self.pending.get(key).map(|t| t.deadline)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|t| t.deadline).min()
    }

    /// Timers due at `now`, earliest first (ties broken by arm order).
    pub fn due(&self, now: Instant) -> Vec<(InstanceKey, TimerId)> {
        let mut due: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(key, t)| (key.clone(), t.deadline, t.id))
            .collect();
        due.sort_by_key(|(_, deadline, id)| (*deadline, *id));
        due.into_iter().map(|(key, _, id)| (key, id)).collect()
    }

    /// Claim a due timer. Only the currently armed id for `key` is live.
    pub fn take(&mut self, key: &InstanceKey, id: TimerId) -> TimerFiring {
        match self.pending.get(key) {
            Some(timer) if timer.id == id => {
                self.pending.remove(key);
                TimerFiring::Live
            }
            _ => TimerFiring::Stale,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> InstanceKey {
        InstanceKey::derive(name, Duration::ZERO, 0)
    }

    #[test]
    fn test_arm_replaces_previous_timer() {
        let t0 = Instant::now();
        let mut scheduler = TransitionScheduler::new(Duration::from_millis(100));

        let first = scheduler.arm(key("/a"), t0);
        let second = scheduler.arm(key("/a"), t0 + Duration::from_millis(10));
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.next_deadline(), Some(t0 + Duration::from_millis(110)));

        assert_eq!(scheduler.take(&key("/a"), first), TimerFiring::Stale);
        assert_eq!(scheduler.take(&key("/a"), second), TimerFiring::Live);
        assert_eq!(scheduler.take(&key("/a"), second), TimerFiring::Stale);
    }

    #[test]
    fn test_due_is_ordered_by_deadline() {
        let t0 = Instant::now();
        let mut scheduler = TransitionScheduler::new(Duration::from_millis(100));
        scheduler.arm(key("/late"), t0 + Duration::from_millis(20));
        scheduler.arm(key("/early"), t0);
        scheduler.arm(key("/future"), t0 + Duration::from_millis(500));

        let due: Vec<_> = scheduler
            .due(t0 + Duration::from_millis(120))
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(due, vec![key("/early"), key("/late")]);
    }

    #[test]
    fn test_cancel_and_clear() {
        let t0 = Instant::now();
        let mut scheduler = TransitionScheduler::new(Duration::ZERO);
        let id = scheduler.arm(key("/a"), t0);
        assert!(scheduler.is_armed(&key("/a")));
        assert!(scheduler.cancel(&key("/a")));
        assert!(!scheduler.cancel(&key("/a")));
        assert_eq!(scheduler.take(&key("/a"), id), TimerFiring::Stale);

        scheduler.arm(key("/b"), t0);
        scheduler.clear();
        assert_eq!(scheduler.next_deadline(), None);
    }
}
