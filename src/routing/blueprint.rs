//! Compiled route tree.
//!
//! Every declared level is compiled into a `LevelBlueprint` when the tree is
//! registered. Level instances created later (one per mounted record of a
//! nested container) share their blueprint through `Arc`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::schema::RouteDeclaration;
use crate::config::validation::ValidationError;
use crate::routing::matcher::RouteMatcher;
use crate::routing::params::ViewRef;
use crate::routing::pattern::CompiledPattern;

/// Immutable compiled form of one declared level.
#[derive(Debug)]
pub struct LevelBlueprint {
    prefix: Option<String>,
    animate_on_mount: bool,
    matcher: RouteMatcher,
}

impl LevelBlueprint {
    /// Compile a root level and all of its nested levels.
    pub fn compile(
        routes: &[RouteDeclaration],
        animate_on_mount: bool,
    ) -> Result<Arc<Self>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let blueprint = Self::build(routes, None, animate_on_mount, &mut errors);
        if errors.is_empty() {
            Ok(Arc::new(blueprint))
        } else {
            Err(errors)
        }
    }

    /// Compile `routes` under `prefix`, collecting every error instead of stopping
    /// at the first one. The returned blueprint is only usable when `errors`
    /// stayed empty.
    pub(crate) fn build(
        routes: &[RouteDeclaration],
        prefix: Option<&str>,
        animate_on_mount: bool,
        errors: &mut Vec<ValidationError>,
    ) -> Self {
        let mut matcher = RouteMatcher::new();
        let mut seen = HashSet::new();

        for declaration in routes {
            let label = declaration.label(prefix);

            if declaration.view.trim().is_empty() {
                errors.push(ValidationError::EmptyView { route: label.clone() });
            }

            if matches!(&declaration.children, Some(children) if children.is_empty()) {
                errors.push(ValidationError::EmptyNested { route: label.clone() });
            }
            let children = declaration
                .children
                .as_deref()
                .filter(|children| !children.is_empty());

            let pattern = if declaration.default {
                Ok(CompiledPattern::wildcard(children.is_some()))
            } else {
                CompiledPattern::compile(&declaration.path, prefix, children.is_some())
            };

            let pattern = match pattern {
                Ok(pattern) => pattern,
                Err(source) => {
                    errors.push(ValidationError::Template { route: label, source });
                    continue;
                }
            };

            if !pattern.is_wildcard() && !seen.insert(pattern.as_str().to_string()) {
                tracing::warn!(
                    route = %label,
                    "Route shadowed by an earlier declaration with the same path"
                );
            }

            let child = children.map(|children| {
                // A default container resolves its children under the parent's prefix.
                let child_prefix = if pattern.is_wildcard() {
                    prefix.map(str::to_string)
                } else {
                    Some(pattern.full_path().to_string())
                };
                let child_animate = declaration.animate_on_mount.unwrap_or(animate_on_mount);
                Arc::new(Self::build(
                    children,
                    child_prefix.as_deref(),
                    child_animate,
                    errors,
                ))
            });

            if matcher
                .push(pattern, ViewRef::new(declaration.view.clone()), child)
                .is_none()
            {
                errors.push(ValidationError::MultipleDefaults {
                    level: prefix.unwrap_or("/").to_string(),
                });
            }
        }

        Self {
            prefix: prefix.map(str::to_string),
            animate_on_mount,
            matcher,
        }
    }

    /// Full path of the container this level is nested under; `None` at the root.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn animate_on_mount(&self) -> bool {
        self.animate_on_mount
    }

    pub fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    /// Number of levels in this subtree, this one included.
    pub fn level_count(&self) -> usize {
        1 + self
            .matcher
            .entries()
            .iter()
            .filter_map(|entry| entry.nested())
            .map(|nested| nested.level_count())
            .sum::<usize>()
    }
}
