// Connection handling module
// Accepts a single TCP connection and serves HTTP/1.1 on it

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;

use super::signal::wait_for_shutdown;
use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing `max_connections`.
///
/// The counter is incremented before the limit check, so concurrent accepts
/// cannot both slip under the limit.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: watch::Receiver<bool>,
) {
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown,
    );
}

/// Upper bound on a connection's lifetime
///
/// `max(read_timeout, write_timeout)`, raised to `keep_alive_timeout` when
/// keep-alive is on so idle connections stay open that long.
pub fn connection_timeout(perf: &PerformanceConfig) -> Duration {
    let io_timeout = std::cmp::max(perf.read_timeout, perf.write_timeout);
    Duration::from_secs(std::cmp::max(io_timeout, perf.keep_alive_timeout))
}

/// Serve one connection in a spawned task.
///
/// The whole connection is bounded by `connection_timeout`.
/// On shutdown, in-flight requests finish and keep-alive stops.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let perf = &state.config.performance;
        let keep_alive = perf.keep_alive_timeout > 0;
        let timeout_duration = connection_timeout(perf);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        );

        let serve = async move {
            tokio::pin!(conn);
            tokio::select! {
                result = conn.as_mut() => result,
                () = wait_for_shutdown(&mut shutdown) => {
                    conn.as_mut().graceful_shutdown();
                    conn.await
                }
            }
        };

        match tokio::time::timeout(timeout_duration, serve).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) if keep_alive => logger::log_debug(&format!(
                "Closing connection from {peer_addr} after {} seconds",
                timeout_duration.as_secs()
            )),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_keep_alive_extends_connection_lifetime() {
        let perf = Config::defaults().unwrap().performance;
        assert_eq!(connection_timeout(&perf), Duration::from_secs(75));
    }

    #[test]
    fn test_without_keep_alive_io_timeouts_apply() {
        let mut perf = Config::defaults().unwrap().performance;
        perf.keep_alive_timeout = 0;
        perf.read_timeout = 10;
        perf.write_timeout = 45;
        assert_eq!(connection_timeout(&perf), Duration::from_secs(45));
    }
}
