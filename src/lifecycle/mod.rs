//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscribed driver leaves its loop → tree teardown
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) → Shutdown::trigger
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
