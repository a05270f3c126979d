//! Ordered mount records for one level.
//!
//! # Responsibilities
//! - Keep records in creation order, newest last
//! - Guarantee at most one live record, always the newest
//! - Apply forced exits and timer advances, drop records that reached `Exited`

use std::time::{Duration, Instant};

use crate::transition::phase::Phase;
use crate::transition::record::{InstanceKey, MountRecord};

/// Records of a single level, oldest first.
#[derive(Debug, Default)]
pub struct TransitionRecordStore {
    records: Vec<MountRecord>,
}

impl TransitionRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record. Every older record must already be leaving.
    pub(crate) fn push(&mut self, record: MountRecord) {
        debug_assert!(
            self.records.iter().all(|r| !r.phase().is_live()),
            "only the newest record may be live"
        );
        self.records.push(record);
    }

    pub fn last(&self) -> Option<&MountRecord> {
        self.records.last()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut MountRecord> {
        self.records.last_mut()
    }

    /// The newest record if it is still live.
    pub fn live(&self) -> Option<&MountRecord> {
        self.last().filter(|r| r.phase().is_live())
    }

    /// Force the newest record into `Exiting`. Returns its key when it changed.
    pub(crate) fn force_exit_last(&mut self, now: Instant) -> Option<InstanceKey> {
        let last = self.records.last_mut()?;
        last.force_exit(now).then(|| last.key().clone())
    }

    /// Advance every record whose timeout elapsed. Returns the keys that moved
    /// together with the phase they moved to.
    pub(crate) fn advance_due(&mut self, now: Instant, timeout: Duration) -> Vec<(InstanceKey, Phase)> {
        self.records
            .iter_mut()
            .filter_map(|record| {
                record
                    .advance_if_due(now, timeout)
                    .map(|phase| (record.key().clone(), phase))
            })
            .collect()
    }

    /// Remove every `Exited` record, preserving the order of the rest.
    pub(crate) fn drop_exited(&mut self) -> Vec<MountRecord> {
        let (exited, kept) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.phase() == Phase::Exited);
        self.records = kept;
        exited
    }

    pub fn get(&self, key: &InstanceKey) -> Option<&MountRecord> {
        self.records.iter().find(|r| r.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MountRecord> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut MountRecord> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn take_all(&mut self) -> Vec<MountRecord> {
        std::mem::take(&mut self.records)
    }
}
