//! OS signal handling.

use crate::lifecycle::shutdown::Shutdown;

/// Wait for Ctrl-C and trigger `shutdown`. Returns early if shutdown was
/// triggered some other way.
pub async fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    let mut rx = shutdown.subscribe();
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => {
                    tracing::info!("Received Ctrl-C");
                    shutdown.trigger();
                }
                Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        }
        _ = rx.recv() => {}
    }
}
