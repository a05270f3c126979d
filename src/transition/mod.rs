//! Mount/unmount transition state machine.
//!
//! # Data Flow
//! ```text
//! RouteTree::navigate(location, now)
//!     → RouteLevel::on_location_change
//!         → same_branch? → forward to the live record's nested level
//!         → otherwise: store.force_exit_last + store.push, scheduler.arm
//!
//! RouteTree::advance(now)
//!     → scheduler.due(now) → take (live/stale)
//!         → store.advance_due + drop_exited → nested levels advance
//!
//! RouteTree::render()
//!     → each non-exited record resolved → RenderedView (children recursive)
//! ```

pub mod level;
pub mod phase;
pub mod record;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod tree;

pub use level::{LocationOutcome, RouteLevel};
pub use phase::Phase;
pub use record::{InstanceKey, MountRecord};
pub use render::{find_view, RenderedView, TickReport};
pub use scheduler::{TimerFiring, TimerId, TransitionScheduler};
pub use store::TransitionRecordStore;
pub use tree::RouteTree;
