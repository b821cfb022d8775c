// Server module entry
// Listener setup, connection handling, accept loop and signals

pub mod connection;
pub mod listener;
pub mod serve;
pub mod signal;

pub use listener::create_listener;
pub use serve::serve;
pub use signal::{start_signal_handler, Shutdown};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::task::JoinHandle;

    async fn start(config: Config) -> (SocketAddr, Arc<Shutdown>, JoinHandle<()>) {
        let listener = create_listener("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config).unwrap());
        let shutdown = Arc::new(Shutdown::new());
        let handle = tokio::spawn(serve(listener, state, Arc::clone(&shutdown)));
        (addr, shutdown, handle)
    }

    async fn exchange(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        // Keep what arrived even if the server resets after answering early
        let mut response = Vec::new();
        let mut buf = [0u8; 4096];
        while let Ok(n) = stream.read(&mut buf).await {
            if n == 0 {
                break;
            }
            response.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&response).into_owned()
    }

    #[tokio::test]
    async fn test_serves_pages_and_shuts_down() {
        let (addr, shutdown, handle) = start(Config::defaults().unwrap()).await;

        let response = exchange(
            addr,
            "GET /components/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains("server: rnx-demo"));
        assert!(response.contains("<td>Alice</td>"));

        let response = exchange(
            addr,
            "GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404"), "{response}");

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_form_post_over_socket() {
        let (addr, shutdown, handle) = start(Config::defaults().unwrap()).await;

        let body = "name=Ada+Lovelace&email=ada%40example.com&message=Hello";
        let request = format!(
            "POST /form/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let response = exchange(addr, &request).await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains("Thank you, Ada Lovelace!"));

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = Config::defaults().unwrap();
        config.http.max_body_size = 16;
        let (addr, shutdown, handle) = start(config).await;

        // Headers only: the declared length alone must trigger the limit
        let request = "POST /form/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
                       Content-Type: application/x-www-form-urlencoded\r\n\
                       Content-Length: 64\r\n\r\n";
        let response = exchange(addr, request).await;
        assert!(response.starts_with("HTTP/1.1 413"), "{response}");

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_chunked_body_over_limit_rejected() {
        let mut config = Config::defaults().unwrap();
        config.http.max_body_size = 16;
        let (addr, shutdown, handle) = start(config).await;

        // No Content-Length: the limit trips while the body is collected
        let chunk = format!("name={}", "x".repeat(27));
        let request = format!(
            "POST /form/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Transfer-Encoding: chunked\r\n\r\n{:x}\r\n{chunk}\r\n0\r\n\r\n",
            chunk.len()
        );
        let response = exchange(addr, &request).await;
        assert!(response.starts_with("HTTP/1.1 413"), "{response}");

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_connections_over_cap_are_dropped() {
        let mut config = Config::defaults().unwrap();
        config.performance.max_connections = Some(0);
        let (addr, shutdown, handle) = start(config).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        // The server may already have closed the socket; only the lack of a
        // response matters
        let _ = stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await;
        let mut response = Vec::new();
        let _ = stream.read_to_end(&mut response).await;
        assert!(response.is_empty(), "{}", String::from_utf8_lossy(&response));

        shutdown.trigger();
        handle.await.unwrap();
    }
}
