//! Async runtime glue.
//!
//! # Data Flow
//! ```text
//! mpsc<LocationChange> ─┐
//! sleep_until(deadline) ├─→ TreeDriver (single task) → RouteTree
//! broadcast shutdown  ──┘        │
//!                                └─→ watch<RenderSnapshot>
//! ```

pub mod driver;

pub use driver::{RenderSnapshot, TreeDriver};
