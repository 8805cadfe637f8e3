//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::AtomicU32;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use site_server::config::SiteConfig;
use site_server::lifecycle::Shutdown;
use site_server::HttpServer;

/// Write a minimal static site into `dir` and return a config rooted there.
///
/// Security headers stay enabled; the admin key is fixed so tests can
/// authenticate against the logs API.
pub fn site_config(dir: &std::path::Path) -> SiteConfig {
    std::fs::write(
        dir.join("index.html"),
        "<html><body>landing page body</body></html>",
    )
    .expect("write landing page");
    std::fs::write(
        dir.join("admin.html"),
        "<html><body>admin page body</body></html>",
    )
    .expect("write admin page");
    std::fs::write(dir.join("output.css"), "body { margin: 0 }").expect("write stylesheet");

    let mut config = SiteConfig::default();
    config.site.root = dir.to_path_buf();
    config.admin.api_key = "test-admin-key".to_string();
    config
}

/// Start the server on an ephemeral port.
///
/// The returned `Shutdown` must be kept alive for the duration of the
/// test: dropping it signals the server to stop.
pub async fn spawn_server(config: SiteConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}

/// A reqwest client that never pools or proxies, for test isolation.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .expect("build test client")
}

/// Start a mock HTTP backend answering every request with a fixed status.
///
/// Returns the bound address and a counter of requests received.
#[allow(dead_code)]
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    tokio::spawn(async move {
                        // Drain the request before answering so the peer
                        // never sees a reset mid-write.
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;

                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            401 => "401 Unauthorized",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}
