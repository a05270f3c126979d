//! One route tree level instance.
//!
//! # Responsibilities
//! - React to location changes: suppress same-branch changes, otherwise push
//!   out the live record and mount a new one
//! - Process due timers and advance record phases
//! - Create a nested level for every record that renders a route container
//! - Render records back into views and params
//!
//! # Design Decisions
//! - A live firing sweeps the whole store, so one timer can settle several records
//! - Nested levels inside leaving records are frozen: no more location changes,
//!   but their timers keep running until the parent record is dropped
//! - Teardown is total: dropping a level clears every timer it owns and drops
//!   its records and their nested levels

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::routing::blueprint::LevelBlueprint;
use crate::routing::coordinator::same_branch;
use crate::transition::phase::Phase;
use crate::transition::record::{InstanceKey, MountRecord};
use crate::transition::render::{RenderedView, TickReport};
use crate::transition::scheduler::{TimerFiring, TransitionScheduler};
use crate::transition::store::TransitionRecordStore;

/// What a location change did to a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationOutcome {
    /// The live record kept its branch; the change went to its nested level.
    SameBranch,
    /// The previous live record (if any) started exiting and a new record was mounted.
    Transitioned {
        exiting: Option<InstanceKey>,
        mounted: InstanceKey,
    },
    /// Nothing resolved; the previous live record (if any) started exiting.
    NoMatch { exiting: Option<InstanceKey> },
}

pub struct RouteLevel {
    blueprint: Arc<LevelBlueprint>,
    store: TransitionRecordStore,
    scheduler: TransitionScheduler,
    mounted_at: Instant,
    sequence: u64,
    depth: usize,
}

impl RouteLevel {
    /// Create an empty level.
    pub fn new(blueprint: Arc<LevelBlueprint>, timeout: Duration, now: Instant, depth: usize) -> Self {
        Self {
            blueprint,
            store: TransitionRecordStore::new(),
            scheduler: TransitionScheduler::new(timeout),
            mounted_at: now,
            sequence: 0,
            depth,
        }
    }

    /// Create a level and route its initial location.
    pub fn mount(
        blueprint: Arc<LevelBlueprint>,
        timeout: Duration,
        location: &str,
        now: Instant,
        depth: usize,
    ) -> Self {
        let mut level = Self::new(blueprint, timeout, now, depth);
        level.on_location_change(location, now);
        level
    }

    pub fn on_location_change(&mut self, location: &str, now: Instant) -> LocationOutcome {
        let blueprint = Arc::clone(&self.blueprint);
        let matcher = blueprint.matcher();
        let resolution = matcher.resolve(location);

        // Same branch only when the validated view is unchanged too; a loose
        // first hit can backtrack to a sibling or the default.
        let same = resolution.as_ref().is_some_and(|hit| {
            self.store.live().is_some_and(|live| {
                same_branch(live.location(), location, matcher).is_same()
                    && matcher
                        .resolve(live.location())
                        .is_some_and(|previous| previous.id() == hit.id())
            })
        });

        if same {
            if let Some(record) = self.store.last_mut() {
                record.follow(location);
                if let Some(nested) = record.nested_mut() {
                    nested.on_location_change(location, now);
                }
            }
            tracing::trace!(depth = self.depth, location, "Same branch, forwarding location");
            return LocationOutcome::SameBranch;
        }

        let exiting = self.store.force_exit_last(now);
        if let Some(key) = &exiting {
            self.scheduler.arm(key.clone(), now);
            metrics::record_transition(Phase::Exiting);
            tracing::debug!(depth = self.depth, key = %key, "Record exiting");
        }

        let Some(resolution) = resolution else {
            metrics::record_no_match();
            tracing::debug!(depth = self.depth, location, "No route matched location");
            return LocationOutcome::NoMatch { exiting };
        };

        let phase = if self.sequence == 0 && !self.blueprint.animate_on_mount() {
            Phase::Entered
        } else {
            Phase::Entering
        };

        let key = InstanceKey::derive(
            location,
            now.saturating_duration_since(self.mounted_at),
            self.sequence,
        );
        self.sequence += 1;

        let nested = resolution.entry.nested().map(|child| {
            Box::new(RouteLevel::mount(
                Arc::clone(child),
                self.scheduler.timeout(),
                location,
                now,
                self.depth + 1,
            ))
        });

        if phase.is_animating() {
            self.scheduler.arm(key.clone(), now);
        }
        self.store
            .push(MountRecord::new(location, key.clone(), phase, now, nested));

        metrics::record_transition(phase);
        metrics::record_records_mounted(self.depth, 1);
        tracing::debug!(
            depth = self.depth,
            key = %key,
            view = %resolution.view(),
            phase = %phase,
            "Record mounted"
        );

        LocationOutcome::Transitioned {
            exiting,
            mounted: key,
        }
    }

    /// Process every timer due at `now`, then the timers of nested levels.
    pub fn advance(&mut self, now: Instant, report: &mut TickReport) {
        for (key, id) in self.scheduler.due(now) {
            let outcome = self.scheduler.take(&key, id);
            metrics::record_timer_firing(outcome);
            match outcome {
                TimerFiring::Stale => {
                    report.stale += 1;
                    tracing::trace!(depth = self.depth, key = %key, "Stale timer ignored");
                }
                TimerFiring::Live => {
                    report.fired += 1;
                    self.sweep(now, report);
                }
            }
        }

        for record in self.store.iter_mut() {
            if let Some(nested) = record.nested_mut() {
                nested.advance(now, report);
            }
        }
    }

    fn sweep(&mut self, now: Instant, report: &mut TickReport) {
        let timeout = self.scheduler.timeout();
        for (key, phase) in self.store.advance_due(now, timeout) {
            // Both successors are stable, nothing left to wait for.
            self.scheduler.cancel(&key);
            report.advanced += 1;
            metrics::record_transition(phase);
            tracing::debug!(depth = self.depth, key = %key, phase = %phase, "Record advanced");
        }

        let removed = self.store.drop_exited();
        if !removed.is_empty() {
            report.removed += removed.len();
            metrics::record_records_removed(self.depth, removed.len());
        }
    }

    /// Views for every record that has not exited, oldest first.
    pub fn render(&self) -> Vec<RenderedView> {
        let matcher = self.blueprint.matcher();
        self.store
            .iter()
            .filter(|record| record.phase() < Phase::Exited)
            .filter_map(|record| {
                let resolution = matcher.resolve(record.location())?;
                Some(RenderedView {
                    view: resolution.view().clone(),
                    phase: record.phase(),
                    location: record.location().to_string(),
                    params: resolution.params,
                    instance_key: record.key().clone(),
                    children: record.nested().map(RouteLevel::render).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Earliest pending deadline in this level or any nested level.
    pub fn next_deadline(&self) -> Option<Instant> {
        let nested = self
            .store
            .iter()
            .filter_map(MountRecord::nested)
            .filter_map(RouteLevel::next_deadline);
        self.scheduler.next_deadline().into_iter().chain(nested).min()
    }

    /// Clear every timer and drop every record, nested levels included.
    pub fn teardown(&mut self) {
        if self.store.is_empty() && self.scheduler.pending_count() == 0 {
            return;
        }
        self.scheduler.clear();
        let records = self.store.take_all();
        tracing::debug!(depth = self.depth, records = records.len(), "Level torn down");
        metrics::record_records_removed(self.depth, records.len());
        drop(records);
    }

    pub fn blueprint(&self) -> &Arc<LevelBlueprint> {
        &self.blueprint
    }

    pub fn store(&self) -> &TransitionRecordStore {
        &self.store
    }

    pub fn scheduler(&self) -> &TransitionScheduler {
        &self.scheduler
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for RouteLevel {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for RouteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLevel")
            .field("depth", &self.depth)
            .field("records", &self.store)
            .field("pending_timers", &self.scheduler.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteDeclaration;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn flat(animate_on_mount: bool) -> Arc<LevelBlueprint> {
        let routes = vec![
            RouteDeclaration::new("/a", "a"),
            RouteDeclaration::new("/b", "b"),
            RouteDeclaration::new("/dynamic/:route", "dynamic"),
        ];
        LevelBlueprint::compile(&routes, animate_on_mount).unwrap()
    }

    fn phases(level: &RouteLevel) -> Vec<(String, Phase)> {
        level
            .store()
            .iter()
            .map(|r| (r.location().to_string(), r.phase()))
            .collect()
    }

    #[test]
    fn test_first_record_honors_animate_on_mount() {
        let t0 = Instant::now();
        let level = RouteLevel::mount(flat(false), TIMEOUT, "/a", t0, 0);
        assert_eq!(phases(&level), vec![("/a".to_string(), Phase::Entered)]);
        assert_eq!(level.next_deadline(), None);

        let level = RouteLevel::mount(flat(true), TIMEOUT, "/a", t0, 0);
        assert_eq!(phases(&level), vec![("/a".to_string(), Phase::Entering)]);
        assert_eq!(level.next_deadline(), Some(t0 + TIMEOUT));
    }

    #[test]
    fn test_change_exits_previous_and_enters_next() {
        let t0 = Instant::now();
        let mut level = RouteLevel::mount(flat(false), TIMEOUT, "/a", t0, 0);

        let t1 = t0 + Duration::from_millis(10);
        let outcome = level.on_location_change("/b", t1);
        assert!(matches!(outcome, LocationOutcome::Transitioned { exiting: Some(_), .. }));
        assert_eq!(
            phases(&level),
            vec![("/a".to_string(), Phase::Exiting), ("/b".to_string(), Phase::Entering)]
        );

        let mut report = TickReport::default();
        level.advance(t1 + Duration::from_millis(99), &mut report);
        assert!(report.is_empty());

        level.advance(t1 + TIMEOUT, &mut report);
        assert_eq!(phases(&level), vec![("/b".to_string(), Phase::Entered)]);
        assert_eq!(report.removed, 1);
        assert_eq!(report.advanced, 2);
        assert_eq!(level.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_same_leaf_refreshes_params() {
        let t0 = Instant::now();
        let mut level = RouteLevel::mount(flat(false), TIMEOUT, "/dynamic/x", t0, 0);
        let outcome = level.on_location_change("/dynamic/y", t0);
        assert_eq!(outcome, LocationOutcome::SameBranch);

        let views = level.render();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].params.get("route"), Some("y"));
        assert_eq!(views[0].phase, Phase::Entered);
    }

    #[test]
    fn test_backtracked_sibling_transitions() {
        let t0 = Instant::now();
        let routes = vec![
            RouteDeclaration::new("/users/:id", "user"),
            RouteDeclaration::new("/users", "user-list"),
        ];
        let blueprint = LevelBlueprint::compile(&routes, false).unwrap();
        let mut level = RouteLevel::mount(blueprint, TIMEOUT, "/users/7", t0, 0);

        let outcome = level.on_location_change("/users", t0);
        assert!(matches!(outcome, LocationOutcome::Transitioned { exiting: Some(_), .. }));

        let views = level.render();
        assert_eq!(views.len(), 2);
        assert_eq!((views[0].view.as_str(), views[0].phase), ("user", Phase::Exiting));
        assert_eq!((views[1].view.as_str(), views[1].phase), ("user-list", Phase::Entering));
        assert_ne!(views[0].instance_key, views[1].instance_key);
    }

    #[test]
    fn test_empty_param_falling_back_transitions() {
        let t0 = Instant::now();
        let routes = vec![
            RouteDeclaration::new("/dynamic/:route", "dynamic"),
            RouteDeclaration::fallback("not-found"),
        ];
        let blueprint = LevelBlueprint::compile(&routes, false).unwrap();
        let mut level = RouteLevel::mount(blueprint, TIMEOUT, "/dynamic/x", t0, 0);

        let outcome = level.on_location_change("/dynamic/", t0);
        assert!(matches!(outcome, LocationOutcome::Transitioned { .. }));

        let views = level.render();
        assert_eq!((views[0].view.as_str(), views[0].phase), ("dynamic", Phase::Exiting));
        assert_eq!(views[0].params.get("route"), Some("x"));
        assert_eq!((views[1].view.as_str(), views[1].phase), ("not-found", Phase::Entering));
    }

    #[test]
    fn test_no_match_exits_without_new_record() {
        let t0 = Instant::now();
        let mut level = RouteLevel::mount(flat(false), TIMEOUT, "/a", t0, 0);
        let outcome = level.on_location_change("/missing", t0);
        assert!(matches!(outcome, LocationOutcome::NoMatch { exiting: Some(_) }));
        assert_eq!(level.store().len(), 1);
        assert_eq!(level.render()[0].phase, Phase::Exiting);

        let mut report = TickReport::default();
        level.advance(t0 + TIMEOUT, &mut report);
        assert!(level.render().is_empty());
        assert!(level.store().is_empty());
    }

    #[test]
    fn test_keys_are_unique_per_level() {
        let t0 = Instant::now();
        let mut level = RouteLevel::mount(flat(false), Duration::ZERO, "/a", t0, 0);
        level.on_location_change("/b", t0);
        level.on_location_change("/a", t0);
        let keys: Vec<_> = level.store().iter().map(|r| r.key().as_str().to_string()).collect();
        assert_eq!(keys, vec!["/a_0_0", "/b_0_1", "/a_0_2"]);
    }

    /// Sums the `depth`-labelled gauge deltas.
    #[derive(Clone, Default)]
    struct DepthGauges(Arc<std::sync::Mutex<std::collections::HashMap<String, f64>>>);

    struct DepthGauge {
        depth: String,
        gauges: DepthGauges,
    }

    impl DepthGauge {
        fn apply(&self, f: impl FnOnce(&mut f64)) {
            let mut gauges = self.gauges.0.lock().unwrap();
            f(gauges.entry(self.depth.clone()).or_default());
        }
    }

    impl ::metrics::GaugeFn for DepthGauge {
        fn increment(&self, value: f64) {
            self.apply(|v| *v += value);
        }

        fn decrement(&self, value: f64) {
            self.apply(|v| *v -= value);
        }

        fn set(&self, value: f64) {
            self.apply(|v| *v = value);
        }
    }

    impl ::metrics::Recorder for DepthGauges {
        fn describe_counter(&self, _: ::metrics::KeyName, _: Option<::metrics::Unit>, _: ::metrics::SharedString) {}
        fn describe_gauge(&self, _: ::metrics::KeyName, _: Option<::metrics::Unit>, _: ::metrics::SharedString) {}
        fn describe_histogram(&self, _: ::metrics::KeyName, _: Option<::metrics::Unit>, _: ::metrics::SharedString) {}

        fn register_counter(&self, _: &::metrics::Key, _: &::metrics::Metadata<'_>) -> ::metrics::Counter {
            ::metrics::Counter::noop()
        }

        fn register_gauge(&self, key: &::metrics::Key, _: &::metrics::Metadata<'_>) -> ::metrics::Gauge {
            let depth = key
                .labels()
                .find(|label| label.key() == "depth")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            ::metrics::Gauge::from_arc(Arc::new(DepthGauge {
                depth,
                gauges: self.clone(),
            }))
        }

        fn register_histogram(&self, _: &::metrics::Key, _: &::metrics::Metadata<'_>) -> ::metrics::Histogram {
            ::metrics::Histogram::noop()
        }
    }

    #[test]
    fn test_mounted_gauge_sums_sibling_levels() {
        let routes = vec![
            RouteDeclaration::new("/a", "a"),
            RouteDeclaration::nested("/nested", "nested", vec![RouteDeclaration::new("one", "one")]),
        ];
        let blueprint = LevelBlueprint::compile(&routes, false).unwrap();
        let gauges = DepthGauges::default();
        let value = |depth: &str| gauges.0.lock().unwrap().get(depth).copied().unwrap_or_default();

        ::metrics::with_local_recorder(&gauges, || {
            let t0 = Instant::now();
            let mut level = RouteLevel::mount(blueprint, TIMEOUT, "/nested/one", t0, 0);
            level.on_location_change("/a", t0 + Duration::from_millis(10));
            level.on_location_change("/nested/one", t0 + Duration::from_millis(20));

            // Two container records, each with its own nested level
            assert_eq!(value("0"), 3.0);
            assert_eq!(value("1"), 2.0);

            let mut report = TickReport::default();
            level.advance(t0 + Duration::from_millis(110), &mut report);
            assert_eq!(report.removed, 1);
            assert_eq!(value("0"), 2.0);
            assert_eq!(value("1"), 1.0);

            level.teardown();
            assert_eq!(value("0"), 0.0);
            assert_eq!(value("1"), 0.0);
        });
    }

    #[test]
    fn test_teardown_clears_everything() {
        let t0 = Instant::now();
        let mut level = RouteLevel::mount(flat(true), TIMEOUT, "/a", t0, 0);
        level.on_location_change("/b", t0);
        assert_eq!(level.scheduler().pending_count(), 2);

        level.teardown();
        assert!(level.store().is_empty());
        assert_eq!(level.next_deadline(), None);
    }
}
