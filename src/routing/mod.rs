//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at registration):
//!     RouteDeclaration[] (ordered, per level)
//!     → pattern.rs (template → anchored regex + param names)
//!     → matcher.rs (ordered patterns, one optional default)
//!     → blueprint.rs (one immutable LevelBlueprint per declared level)
//!
//! Location Resolution:
//!     location
//!     → matcher.rs (greedy scan, reject empty dynamic captures)
//!     → Return: view + params, default view, or no match
//!
//! Branch Continuity:
//!     previous location, new location
//!     → coordinator.rs (compare first-hit pattern identity)
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once, immutable at runtime
//! - Deterministic: same input always resolves the same way
//! - First match wins (registration order), default consulted last
//! - Matching is case-insensitive; captured values keep their case

pub mod blueprint;
pub mod coordinator;
pub mod matcher;
pub mod params;
pub mod pattern;

pub use blueprint::LevelBlueprint;
pub use coordinator::{same_branch, BranchContinuity};
pub use matcher::{PatternId, Resolution, RouteEntry, RouteMatcher};
pub use params::{RouteParams, ViewRef};
pub use pattern::{CompiledPattern, TemplateError};
