//! Branch continuity between two locations at one level.
//!
//! When only a descendant of the matched branch changes, the level itself must
//! not transition; the nested level under the live record handles it instead.

use crate::routing::matcher::RouteMatcher;

/// Whether two locations resolve to the same pattern at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchContinuity {
    Same,
    Different,
    /// One side did not resolve. Treated as `Different`.
    Indeterminate,
}

impl BranchContinuity {
    /// Only a positive `Same` suppresses a transition; an indeterminate answer
    /// lets the transition proceed.
    pub fn is_same(self) -> bool {
        matches!(self, Self::Same)
    }
}

/// Compare the pattern identities `previous` and `current` resolve to.
///
/// Uses the first regex hit in registration order (default last) without
/// validating dynamic params.
pub fn same_branch(previous: &str, current: &str, matcher: &RouteMatcher) -> BranchContinuity {
    match (matcher.first_match(previous), matcher.first_match(current)) {
        (Some(prev), Some(curr)) if prev == curr => BranchContinuity::Same,
        (Some(_), Some(_)) => BranchContinuity::Different,
        _ => BranchContinuity::Indeterminate,
    }
}
