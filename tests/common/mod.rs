//! Shared utilities for integration testing.
//!
//! Provides a programmable mock of the cloud provider: one TCP server that
//! answers the token, metadata-document, instance-delete, and
//! instance-metadata endpoints, recording every request it sees.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Token the mock identity service hands out.
pub const TEST_TOKEN: &str = "scoped-token-abc";

/// Instance id the mock metadata document reports.
pub const TEST_INSTANCE: &str = "instance-1234";

/// Handle to a running mock provider.
pub struct MockCloud {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCloud {
    /// Every request seen so far, as "METHOD path" strings; requests that
    /// carried an auth token are suffixed with " token=<value>".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded requests starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn auth_url(&self) -> String {
        format!("http://{}/v2.0", self.addr)
    }

    pub fn compute_url(&self) -> String {
        format!("http://{}/v2", self.addr)
    }

    pub fn metadata_url(&self) -> String {
        format!("http://{}/openstack/2012-08-10/meta_data.json", self.addr)
    }
}

/// Start a mock provider on an ephemeral port.
pub async fn start_mock_cloud() -> MockCloud {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some((method, path, token)) = read_request(&mut socket).await else {
                            return;
                        };
                        let call = match token {
                            Some(token) => format!("{} {} token={}", method, path, token),
                            None => format!("{} {}", method, path),
                        };
                        recorded.lock().unwrap().push(call);

                        let (status, body) = route(&method, &path);
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
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

    MockCloud { addr, calls }
}

fn route(method: &str, path: &str) -> (&'static str, String) {
    match (method, path) {
        ("POST", p) if p.ends_with("/tokens") => (
            "200 OK",
            format!(r#"{{"access":{{"token":{{"id":"{}"}}}}}}"#, TEST_TOKEN),
        ),
        ("GET", p) if p.ends_with("meta_data.json") => {
            ("200 OK", format!(r#"{{"uuid":"{}"}}"#, TEST_INSTANCE))
        }
        ("POST", p) if p.ends_with("/metadata") => ("200 OK", "{}".to_string()),
        ("DELETE", p) if p.contains("/servers/") => ("204 No Content", String::new()),
        _ => ("404 Not Found", String::new()),
    }
}

/// Read one HTTP request, consuming its body; returns (method, path, token).
async fn read_request(socket: &mut TcpStream) -> Option<(String, String, Option<String>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut request_line = head.lines().next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let header = |name: &str| {
        head.lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim().to_string())
    };
    let content_length = header("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    let token = header("x-auth-token");

    // Drain the body so the client never sees a reset while sending.
    let mut body_read = buf.len() - (header_end + 4);
    while body_read < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body_read += n;
    }

    Some((method, path, token))
}
