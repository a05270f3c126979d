//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber once
//! - Let `RUST_LOG` override the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber filtered to `level` for this crate.
///
/// Returns false when a global subscriber was already set (tests, embedding hosts).
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("transition_router={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
