//! In-memory location history.
//!
//! # Responsibilities
//! - Hold the full pathnames visited, with a cursor for back/forward
//! - Expose locations relative to the configured base path
//! - Produce a `LocationChange` for every move
//!
//! # Design Decisions
//! - `set_location` drops any forward entries, like a browser push
//! - Base matching is case-insensitive and stops at segment boundaries

use serde::Serialize;

use crate::routing::pattern::{join_path, normalize_path};

/// A location change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationChange {
    pub current: String,
    /// Empty before the first change.
    pub previous: String,
}

/// Browser-like history kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    base: String,
    entries: Vec<String>,
    cursor: usize,
    current: String,
    previous: String,
}

impl MemoryHistory {
    /// Start a history at `initial_pathname`, a full pathname including `base`.
    pub fn new(base: &str, initial_pathname: &str) -> Self {
        let pathname = normalize_path(&format!("/{initial_pathname}"));
        Self {
            base: base.to_string(),
            current: trim_base(&pathname, base),
            previous: String::new(),
            entries: vec![pathname],
            cursor: 0,
        }
    }

    /// Push `path` (relative to the base) and move to it.
    pub fn set_location(&mut self, path: &str) -> LocationChange {
        let pathname = join_path(&self.base, path);
        self.entries.truncate(self.cursor + 1);
        self.entries.push(pathname);
        self.cursor = self.entries.len() - 1;
        self.moved()
    }

    /// Step back one entry, if there is one.
    pub fn back(&mut self) -> Option<LocationChange> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.moved())
    }

    /// Step forward one entry, if there is one.
    pub fn forward(&mut self) -> Option<LocationChange> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.moved())
    }

    /// Current location relative to the base.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Current full pathname, base included.
    pub fn pathname(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn moved(&mut self) -> LocationChange {
        let current = trim_base(&self.entries[self.cursor], &self.base);
        self.previous = std::mem::replace(&mut self.current, current);
        tracing::debug!(current = %self.current, previous = %self.previous, "Location changed");
        LocationChange {
            current: self.current.clone(),
            previous: self.previous.clone(),
        }
    }
}

/// Strip `base` from the front of `pathname`.
///
/// The result always starts with `/`. A pathname outside the base is returned
/// normalized but otherwise unchanged.
pub fn trim_base(pathname: &str, base: &str) -> String {
    let pathname = normalize_path(&format!("/{pathname}"));
    let base = join_path("", base);
    if base == "/" {
        return pathname;
    }

    let within_base = pathname
        .get(..base.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(&base))
        && matches!(pathname[base.len()..].chars().next(), None | Some('/'));

    if within_base {
        normalize_path(&format!("/{}", &pathname[base.len()..]))
    } else {
        pathname
    }
}
