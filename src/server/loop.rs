// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight ones

use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the media server
///
/// Returns once `shutdown` is notified and either every connection has
/// closed or `performance.shutdown_timeout` has elapsed. Idle keep-alive
/// connections are closed immediately; connections with a response in
/// flight finish it first. Accept errors (e.g. EMFILE) are logged and the
/// loop keeps going.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before waiting on the stragglers
    drop(listener);

    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    match tokio::time::timeout(grace, graceful.shutdown()).await {
        Ok(()) => logger::log_info("All connections closed"),
        Err(_) => logger::log_warning(&format!(
            "Shutdown timeout after {}s, {} connection(s) still open",
            grace.as_secs(),
            active_connections.load(Ordering::SeqCst)
        )),
    }

    Ok(())
}
