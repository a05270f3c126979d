//! Route matching and mount/unmount transition state machine.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──▶ config ──▶ routing (compiled blueprints)
//!                                   │
//!   navigation ──LocationChange──▶ transition::RouteTree
//!   (MemoryHistory)                 │   per level: matcher + store + scheduler
//!                                   │   nested levels per container record
//!                                   ▼
//!                      runtime::TreeDriver ──▶ RenderSnapshot (watch)
//!
//!   Cross-cutting: observability (tracing, metrics), lifecycle (shutdown)
//! ```

// Core subsystems
pub mod config;
pub mod routing;
pub mod transition;

// Location sources and async glue
pub mod navigation;
pub mod runtime;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::schema::{RouteDeclaration, RouterConfig};
pub use error::RouterError;
pub use lifecycle::Shutdown;
pub use routing::{RouteMatcher, RouteParams, ViewRef};
pub use transition::{Phase, RenderedView, RouteTree, TickReport};
