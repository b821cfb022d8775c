// Server loop module
// Accepts connections until shutdown, then drains open connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::{wait_for_shutdown, Shutdown};
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept loop
///
/// Returns once shutdown is triggered and open connections have closed,
/// or `performance.shutdown_timeout` has elapsed.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Shutdown>) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let mut stop = shutdown.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            shutdown.subscribe(),
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = wait_for_shutdown(&mut stop) => break,
        }
    }

    drop(listener);
    logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));

    let timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = drain(&active_connections, timeout).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait for the connection count to reach zero; returns what is left at the deadline
async fn drain(active_connections: &AtomicUsize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let open = active_connections.load(Ordering::SeqCst);
        if open == 0 || tokio::time::Instant::now() >= deadline {
            return open;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        assert_eq!(drain(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let active = AtomicUsize::new(2);
        assert_eq!(drain(&active, Duration::from_millis(60)).await, 2);
    }
}
