//! Configuration schema definitions.
//!
//! This module defines the route-tree configuration file.
//! All types derive Serde traits for deserialization from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a route tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Animation timeout for every phase, in milliseconds. Nested levels inherit it.
    pub timeout_ms: u64,

    /// Whether the first record of a level animates in (`Entering`) or
    /// appears directly as `Entered`.
    pub animate_on_mount: bool,

    /// Base path stripped from incoming pathnames before routing.
    pub base: String,

    /// Ordered route declarations for the root level.
    pub routes: Vec<RouteDeclaration>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            animate_on_mount: false,
            base: "/".to_string(),
            routes: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RouterConfig {
    /// A configuration with default settings for the given root routes.
    pub fn new(routes: Vec<RouteDeclaration>) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_animate_on_mount(mut self, animate_on_mount: bool) -> Self {
        self.animate_on_mount = animate_on_mount;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// One child declaration at a route tree level.
///
/// A declaration with `children` is itself a route-tree level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDeclaration {
    /// Path template, e.g. `/users/:id`. Ignored for the default route.
    #[serde(default)]
    pub path: String,

    /// Name of the view rendered when this route matches.
    pub view: String,

    /// Marks the level's fallback, rendered when nothing else matches.
    #[serde(default)]
    pub default: bool,

    /// Overrides the inherited animate-on-mount flag for a nested level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animate_on_mount: Option<bool>,

    /// Declarations of the nested level, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteDeclaration>>,
}

impl RouteDeclaration {
    /// A plain route.
    pub fn new(path: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: view.into(),
            default: false,
            animate_on_mount: None,
            children: None,
        }
    }

    /// The level's default route.
    pub fn fallback(view: impl Into<String>) -> Self {
        Self {
            default: true,
            ..Self::new("", view)
        }
    }

    /// A route that is itself a route-tree level.
    pub fn nested(
        path: impl Into<String>,
        view: impl Into<String>,
        children: Vec<RouteDeclaration>,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::new(path, view)
        }
    }

    pub fn with_animate_on_mount(mut self, animate_on_mount: bool) -> Self {
        self.animate_on_mount = Some(animate_on_mount);
        self
    }

    /// True when this declaration is a route container.
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Human-readable identifier for diagnostics.
    pub fn label(&self, prefix: Option<&str>) -> String {
        if self.default {
            format!("{}(default:{})", prefix.unwrap_or(""), self.view)
        } else {
            format!("{}{}", prefix.unwrap_or(""), self.path)
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
