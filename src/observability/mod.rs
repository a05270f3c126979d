//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transition levels produce:
//!     → tracing events (transitions at debug, stale timers at trace)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - No recorder is installed here; without one every metric call is a no-op
//! - Log filtering follows `RUST_LOG` first, then the configured level

pub mod logging;
pub mod metrics;
