//! Location resolution for one route tree level.
//!
//! # Responsibilities
//! - Keep compiled patterns in registration order
//! - Resolve a location to the first fully validated pattern plus its params
//! - Fall back to the level's default pattern when nothing else validates
//!
//! # Design Decisions
//! - Greedy scan with backtracking: a regex hit with an empty dynamic capture
//!   is rejected and the scan continues with the next candidate
//! - The default pattern is only consulted after every other candidate,
//!   wherever it was registered
//! - Resolution borrows the matcher immutably, so repeated calls always agree

use std::fmt;
use std::sync::Arc;

use crate::routing::blueprint::LevelBlueprint;
use crate::routing::params::{RouteParams, ViewRef};
use crate::routing::pattern::{CompiledPattern, TemplateError};

/// Identity of a compiled pattern within its level (its registration index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(usize);

impl PatternId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A compiled pattern together with what it renders.
#[derive(Debug)]
pub struct RouteEntry {
    id: PatternId,
    pattern: CompiledPattern,
    view: ViewRef,
    nested: Option<Arc<LevelBlueprint>>,
}

impl RouteEntry {
    pub fn id(&self) -> PatternId {
        self.id
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn view(&self) -> &ViewRef {
        &self.view
    }

    /// The nested level rendered by this entry, if the view is itself a route container.
    pub fn nested(&self) -> Option<&Arc<LevelBlueprint>> {
        self.nested.as_ref()
    }

    pub fn is_container(&self) -> bool {
        self.nested.is_some()
    }
}

/// A successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub entry: &'a RouteEntry,
    pub params: RouteParams,
}

impl Resolution<'_> {
    pub fn id(&self) -> PatternId {
        self.entry.id
    }

    pub fn view(&self) -> &ViewRef {
        &self.entry.view
    }
}

/// Ordered list of compiled patterns for one level.
#[derive(Debug, Default)]
pub struct RouteMatcher {
    entries: Vec<RouteEntry>,
    fallback: Option<PatternId>,
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a plain (non-nested) template at the root of the tree.
    pub fn insert(
        &mut self,
        template: &str,
        view: impl Into<ViewRef>,
    ) -> Result<PatternId, TemplateError> {
        let pattern = CompiledPattern::compile(template, None, false)?;
        Ok(self.append(pattern, view.into(), None))
    }

    /// Register the level's default view. Returns `None` if one already exists.
    pub fn insert_fallback(&mut self, view: impl Into<ViewRef>) -> Option<PatternId> {
        self.push(CompiledPattern::wildcard(false), view.into(), None)
    }

    /// Register an already compiled pattern.
    ///
    /// Returns `None` when `pattern` is a second wildcard for this level.
    pub(crate) fn push(
        &mut self,
        pattern: CompiledPattern,
        view: ViewRef,
        nested: Option<Arc<LevelBlueprint>>,
    ) -> Option<PatternId> {
        if pattern.is_wildcard() && self.fallback.is_some() {
            return None;
        }
        Some(self.append(pattern, view, nested))
    }

    fn append(
        &mut self,
        pattern: CompiledPattern,
        view: ViewRef,
        nested: Option<Arc<LevelBlueprint>>,
    ) -> PatternId {
        let id = PatternId(self.entries.len());
        if pattern.is_wildcard() {
            self.fallback = Some(id);
        }
        self.entries.push(RouteEntry {
            id,
            pattern,
            view,
            nested,
        });
        id
    }

    /// Resolve `location` to a view and its parameters.
    pub fn resolve(&self, location: &str) -> Option<Resolution<'_>> {
        self.candidates()
            .find_map(|entry| {
                validate(entry, location).map(|params| Resolution { entry, params })
            })
            .or_else(|| {
                self.fallback_entry().map(|entry| Resolution {
                    entry,
                    params: RouteParams::new(),
                })
            })
    }

    /// First pattern whose regex accepts `location`, without validating params.
    pub fn first_match(&self, location: &str) -> Option<PatternId> {
        self.candidates()
            .find(|entry| entry.pattern.is_match(location))
            .map(RouteEntry::id)
            .or(self.fallback)
    }

    pub fn entry(&self, id: PatternId) -> Option<&RouteEntry> {
        self.entries.get(id.0)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn candidates(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter().filter(|entry| !entry.pattern.is_wildcard())
    }

    fn fallback_entry(&self) -> Option<&RouteEntry> {
        self.fallback.and_then(|id| self.entry(id))
    }
}

/// Walk the capture groups of a match; any empty named capture rejects it.
fn validate(entry: &RouteEntry, location: &str) -> Option<RouteParams> {
    let captures = entry.pattern.captures(location)?;
    let mut params = RouteParams::new();

    for (index, name) in entry.pattern.param_names().iter().enumerate() {
        let Some(name) = name else { continue };
        match captures.get(index + 1).map(|m| m.as_str()) {
            Some(value) if !value.is_empty() => params.insert(name, value),
            _ => return None,
        }
    }

    Some(params)
}
