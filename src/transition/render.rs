//! Render output and timer reports.

use serde::Serialize;

use crate::routing::params::{RouteParams, ViewRef};
use crate::transition::phase::Phase;
use crate::transition::record::InstanceKey;

/// One view to mount, with its animation phase and nested views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub view: ViewRef,
    pub phase: Phase,
    pub location: String,
    pub params: RouteParams,
    pub instance_key: InstanceKey,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedView>,
}

/// Depth-first search for the first rendered view named `view`.
pub fn find_view<'a>(views: &'a [RenderedView], view: &str) -> Option<&'a RenderedView> {
    views.iter().find_map(|rendered| {
        if rendered.view.as_str() == view {
            Some(rendered)
        } else {
            find_view(&rendered.children, view)
        }
    })
}

/// What a round of timer processing did across a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Live timer firings.
    pub fired: usize,
    /// Firings whose timer had been replaced or cancelled.
    pub stale: usize,
    /// Records that moved to a new phase.
    pub advanced: usize,
    /// Records dropped after reaching `Exited`.
    pub removed: usize,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: TickReport) {
        self.fired += other.fired;
        self.stale += other.stale;
        self.advanced += other.advanced;
        self.removed += other.removed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str, children: Vec<RenderedView>) -> RenderedView {
        RenderedView {
            view: ViewRef::new(name),
            phase: Phase::Entered,
            location: "/".to_string(),
            params: RouteParams::new(),
            instance_key: InstanceKey::derive("/", std::time::Duration::ZERO, 0),
            children,
        }
    }

    #[test]
    fn test_find_view_searches_children() {
        let tree = vec![view("home", vec![]), view("nested", vec![view("one", vec![])])];
        assert_eq!(find_view(&tree, "one").unwrap().view.as_str(), "one");
        assert!(find_view(&tree, "two").is_none());
    }

    #[test]
    fn test_rendered_view_json_shape() {
        let json = serde_json::to_value(view("home", vec![])).unwrap();
        assert_eq!(json["phase"], "entered");
        assert_eq!(json["instance_key"], "/_0_0");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_report_merge() {
        let mut total = TickReport::default();
        assert!(total.is_empty());
        total.merge(TickReport { fired: 1, stale: 2, advanced: 3, removed: 1 });
        total.merge(TickReport { fired: 1, ..Default::default() });
        assert_eq!(total.fired, 2);
        assert_eq!(total.stale, 2);
    }
}
