//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every template of every level so bad routes fail at load time
//! - Check tree shape: one default per level, containers have children
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function of the config
//! - Runs before any route tree is built from the config

use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::blueprint::LevelBlueprint;
use crate::routing::pattern::TemplateError;

/// A single semantic problem in a route-tree configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route {route}: {source}")]
    Template {
        route: String,
        #[source]
        source: TemplateError,
    },

    #[error("level {level} declares more than one default route")]
    MultipleDefaults { level: String },

    #[error("route {route} is nested but declares no children")]
    EmptyNested { route: String },

    #[error("route {route} has an empty view name")]
    EmptyView { route: String },

    #[error("no routes declared")]
    NoRoutes,

    #[error("base path {0:?} must start with '/'")]
    InvalidBase(String),

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

/// Validate a configuration without keeping the compiled tree.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    compile_routes(config).map(|_| ())
}

/// Validate a configuration and compile its route tree.
pub fn compile_routes(config: &RouterConfig) -> Result<Arc<LevelBlueprint>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    if !config.base.starts_with('/') {
        errors.push(ValidationError::InvalidBase(config.base.clone()));
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let blueprint = LevelBlueprint::build(&config.routes, None, config.animate_on_mount, &mut errors);

    if errors.is_empty() {
        Ok(Arc::new(blueprint))
    } else {
        Err(errors)
    }
}
