//! Route tree entry point.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::loader::ConfigError;
use crate::config::schema::RouterConfig;
use crate::config::validation::compile_routes;
use crate::routing::blueprint::LevelBlueprint;
use crate::transition::level::{LocationOutcome, RouteLevel};
use crate::transition::render::{RenderedView, TickReport};

/// A compiled route tree and its root level.
///
/// The root level is created on the first navigation, so the first record
/// counts as the initial mount for animate-on-mount purposes.
#[derive(Debug)]
pub struct RouteTree {
    blueprint: Arc<LevelBlueprint>,
    timeout: Duration,
    root: Option<RouteLevel>,
}

impl RouteTree {
    pub fn new(blueprint: Arc<LevelBlueprint>, timeout: Duration) -> Self {
        Self {
            blueprint,
            timeout,
            root: None,
        }
    }

    /// Validate `config` and compile every level of its route tree.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        let blueprint = compile_routes(config)?;
        tracing::info!(
            levels = blueprint.level_count(),
            timeout_ms = config.timeout_ms,
            animate_on_mount = config.animate_on_mount,
            "Route tree compiled"
        );
        Ok(Self::new(blueprint, config.timeout()))
    }

    /// Route a new location through the tree.
    pub fn navigate(&mut self, location: &str, now: Instant) -> LocationOutcome {
        let blueprint = &self.blueprint;
        let timeout = self.timeout;
        self.root
            .get_or_insert_with(|| RouteLevel::new(Arc::clone(blueprint), timeout, now, 0))
            .on_location_change(location, now)
    }

    /// Process every timer due at `now` across the tree.
    pub fn advance(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();
        if let Some(root) = self.root.as_mut() {
            root.advance(now, &mut report);
        }
        report
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.root.as_ref().and_then(RouteLevel::next_deadline)
    }

    /// True when no timer is pending anywhere in the tree.
    pub fn is_idle(&self) -> bool {
        self.next_deadline().is_none()
    }

    pub fn render(&self) -> Vec<RenderedView> {
        self.root.as_ref().map(RouteLevel::render).unwrap_or_default()
    }

    pub fn root(&self) -> Option<&RouteLevel> {
        self.root.as_ref()
    }

    pub fn blueprint(&self) -> &Arc<LevelBlueprint> {
        &self.blueprint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Tear down every level. The next navigation mounts a fresh root.
    pub fn teardown(&mut self) {
        if let Some(mut root) = self.root.take() {
            root.teardown();
        }
    }
}
