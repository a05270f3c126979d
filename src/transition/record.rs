//! Mount records.
//!
//! # Responsibilities
//! - Remember the location a record was created for
//! - Track the record's phase and the instant it was last stamped
//! - Own the nested level rendered by the record, if any

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::transition::level::RouteLevel;
use crate::transition::phase::Phase;

/// Identity of a mount record, unique within its level's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceKey(String);

impl InstanceKey {
    /// Derive a key from the location, the creation offset within the level and
    /// a per-level sequence number.
    pub(crate) fn derive(location: &str, offset: Duration, sequence: u64) -> Self {
        Self(format!("{}_{}_{}", location, offset.as_millis(), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One active or animating view at a level.
pub struct MountRecord {
    location: String,
    key: InstanceKey,
    phase: Phase,
    created_at: Instant,
    stamped_at: Instant,
    nested: Option<Box<RouteLevel>>,
}

impl MountRecord {
    pub(crate) fn new(
        location: &str,
        key: InstanceKey,
        phase: Phase,
        now: Instant,
        nested: Option<Box<RouteLevel>>,
    ) -> Self {
        Self {
            location: location.to_string(),
            key,
            phase,
            created_at: now,
            stamped_at: now,
            nested,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When the current phase's timeout started counting.
    pub fn stamped_at(&self) -> Instant {
        self.stamped_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stamped_at)
    }

    pub fn nested(&self) -> Option<&RouteLevel> {
        self.nested.as_deref()
    }

    pub(crate) fn nested_mut(&mut self) -> Option<&mut RouteLevel> {
        self.nested.as_deref_mut()
    }

    /// Follow a descendant-only location change without transitioning.
    pub(crate) fn follow(&mut self, location: &str) {
        self.location = location.to_string();
    }

    /// Force a live record into `Exiting` and restamp it. Returns false if the
    /// record was already leaving.
    pub(crate) fn force_exit(&mut self, now: Instant) -> bool {
        if !self.phase.is_live() {
            return false;
        }
        self.phase = Phase::Exiting;
        self.stamped_at = now;
        true
    }

    /// Move to the successor phase if the timeout has elapsed since the stamp.
    pub(crate) fn advance_if_due(&mut self, now: Instant, timeout: Duration) -> Option<Phase> {
        let next = self.phase.successor();
        if next == self.phase || self.elapsed(now) < timeout {
            return None;
        }
        self.phase = next;
        Some(next)
    }
}

impl fmt::Debug for MountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountRecord")
            .field("location", &self.location)
            .field("key", &self.key)
            .field("phase", &self.phase)
            .field("has_nested", &self.nested.is_some())
            .finish()
    }
}
