// Server module entry
// Listener setup, the accept loop, per-connection serving and signal handling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::{AppState, Config};
use crate::logger;

/// Serve media on an already bound listener until `shutdown` is notified
///
/// Used directly by tests that bind an ephemeral port.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    start_server_loop(listener, state, active_connections, shutdown).await
}

/// Bind the configured address, install signal handlers and serve
pub async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;
    let state = Arc::new(AppState::new(config));

    if !state.library.root().is_dir() {
        logger::log_warning(&format!(
            "Media root {} is not a directory, every lookup will be 404",
            state.library.root().display()
        ));
    }

    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&listener.local_addr()?, config);
    serve(listener, state, Arc::clone(&signals.shutdown)).await?;
    logger::log_info("Server stopped");
    Ok(())
}
