//! Location sources.
//!
//! # Data Flow
//! ```text
//! MemoryHistory::set_location / back / forward
//!     → trim_base(pathname, base)
//!     → LocationChange { current, previous }
//!     → RouteTree::navigate(current) (directly or via the driver channel)
//!
//! ReplayScript (TOML [[step]] list) → timed set_location calls
//! ```

pub mod history;
pub mod script;

pub use history::{trim_base, LocationChange, MemoryHistory};
pub use script::{ReplayScript, ReplayStep};
