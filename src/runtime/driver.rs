//! Single-task route tree driver.
//!
//! # Responsibilities
//! - Apply location changes in arrival order
//! - Sleep until the tree's next timer deadline and advance it
//! - Publish a render snapshot after every change that altered the tree
//!
//! # Design Decisions
//! - One task owns the tree; nothing else mutates it
//! - Shutdown wins over pending work (`biased` select)
//! - The loop also ends once the change channel is closed and no timer is
//!   pending, so scripted runs finish on their own

use std::time::Instant;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};

use crate::navigation::history::LocationChange;
use crate::transition::render::{RenderedView, TickReport};
use crate::transition::tree::RouteTree;

/// The tree's rendered state after a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderSnapshot {
    /// Incremented on every publish.
    pub revision: u64,
    /// Last location routed, if any.
    pub location: Option<String>,
    pub views: Vec<RenderedView>,
    /// Timer activity since the driver started.
    pub totals: TickReport,
}

pub struct TreeDriver {
    tree: RouteTree,
    snapshots: watch::Sender<RenderSnapshot>,
    location: Option<String>,
    totals: TickReport,
    revision: u64,
}

impl TreeDriver {
    pub fn new(tree: RouteTree) -> (Self, watch::Receiver<RenderSnapshot>) {
        let (snapshots, rx) = watch::channel(RenderSnapshot::default());
        let driver = Self {
            tree,
            snapshots,
            location: None,
            totals: TickReport::default(),
            revision: 0,
        };
        (driver, rx)
    }

    /// Drive the tree until shutdown, or until `changes` closes with no timer pending.
    ///
    /// The tree is torn down before returning; the final snapshot is empty.
    pub async fn run(
        mut self,
        mut changes: mpsc::UnboundedReceiver<LocationChange>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> TickReport {
        tracing::info!(timeout_ms = self.tree.timeout().as_millis() as u64, "Route tree driver starting");
        let mut changes_open = true;

        loop {
            let deadline = self.tree.next_deadline();
            if !changes_open && deadline.is_none() {
                tracing::info!("Location source closed and no timers pending");
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Route tree driver received shutdown signal, exiting loop");
                    break;
                }
                change = changes.recv(), if changes_open => match change {
                    Some(change) => self.navigate(&change.current),
                    None => changes_open = false,
                },
                _ = sleep_until(deadline) => self.tick(),
            }
        }

        self.tree.teardown();
        self.publish();
        tracing::info!(
            fired = self.totals.fired,
            stale = self.totals.stale,
            removed = self.totals.removed,
            "Route tree driver stopped"
        );
        self.totals
    }

    fn navigate(&mut self, location: &str) {
        let outcome = self.tree.navigate(location, now());
        tracing::debug!(location, outcome = ?outcome, "Location routed");
        self.location = Some(location.to_string());
        self.publish();
    }

    fn tick(&mut self) {
        let report = self.tree.advance(now());
        if !report.is_empty() {
            self.totals.merge(report);
            self.publish();
        }
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.snapshots.send_replace(RenderSnapshot {
            revision: self.revision,
            location: self.location.clone(),
            views: self.tree.render(),
            totals: self.totals,
        });
    }
}

/// Wall time as seen by the tokio clock, so paused test time applies.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
