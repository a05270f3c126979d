//! Shared utilities for integration tests.

use std::time::Duration;

use transition_router::{Phase, RenderedView, RouteDeclaration, RouteTree, RouterConfig};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Root routes plus one nested container.
#[allow(dead_code)]
pub fn routes() -> Vec<RouteDeclaration> {
    vec![
        RouteDeclaration::new("/", "home"),
        RouteDeclaration::new("/a", "a"),
        RouteDeclaration::new("/b", "b"),
        RouteDeclaration::new("/c", "c"),
        RouteDeclaration::new("/dynamic/:route", "dynamic"),
        RouteDeclaration::nested(
            "/nested",
            "nested",
            vec![
                RouteDeclaration::new("route-one", "route-one"),
                RouteDeclaration::new("route-two", "route-two"),
            ],
        ),
    ]
}

#[allow(dead_code)]
pub fn tree(timeout_ms: u64, animate_on_mount: bool) -> RouteTree {
    let config = RouterConfig::new(routes())
        .with_timeout_ms(timeout_ms)
        .with_animate_on_mount(animate_on_mount);
    RouteTree::from_config(&config).unwrap()
}

#[allow(dead_code)]
pub fn tree_with_fallback(timeout_ms: u64) -> RouteTree {
    let mut routes = routes();
    routes.push(RouteDeclaration::fallback("not-found"));
    RouteTree::from_config(&RouterConfig::new(routes).with_timeout_ms(timeout_ms)).unwrap()
}

/// `(view, phase)` pairs for one level of rendered views.
#[allow(dead_code)]
pub fn phases(views: &[RenderedView]) -> Vec<(&str, Phase)> {
    views.iter().map(|v| (v.view.as_str(), v.phase)).collect()
}
